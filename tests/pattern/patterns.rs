//! Integration tests for the pattern algebra
//!
//! Covers variable contribution rules, DNF and negation-DNF derivation, and
//! canonical rendering.

use proptest::prelude::*;
use trellis_foundation::ErrorKind;
use trellis_pattern::{Conjunction, Disjunction, Negation, Pattern, and, not, or, var};

fn isa(name: &str, label: &str) -> Pattern {
    Pattern::from(var(name).unwrap().isa(label))
}

// =============================================================================
// Variable Contribution
// =============================================================================

fn named_syntax(vars: &[trellis_pattern::Variable]) -> Vec<String> {
    vars.iter()
        .filter(|v| v.is_named())
        .map(|v| v.reference().syntax())
        .collect()
}

#[test]
fn conjunction_unions_variable_and_nested_conjunction_children() {
    let conjunction = and(vec![
        isa("x", "person"),
        Pattern::Conjunction(and(vec![isa("y", "person")])),
    ]);
    assert_eq!(named_syntax(&conjunction.variables()), vec!["$x", "$y"]);
}

#[test]
fn conjunction_ignores_disjunction_and_negation_children() {
    let conjunction = and(vec![
        isa("x", "person"),
        Pattern::Disjunction(or(vec![isa("y", "person")])),
        Pattern::Negation(not(isa("z", "person"))),
    ]);
    assert_eq!(named_syntax(&conjunction.variables()), vec!["$x"]);
}

#[test]
fn disjunction_intersects_branch_variables() {
    // branch A binds {$x, $y}; branch B binds {$x, $z}; only $x survives
    let branch_a = Pattern::Conjunction(and(vec![isa("x", "person"), isa("y", "person")]));
    let branch_b = Pattern::Conjunction(and(vec![isa("x", "person"), isa("z", "person")]));
    let disjunction = or(vec![branch_a, branch_b]);
    assert_eq!(named_syntax(&disjunction.variables()), vec!["$x"]);
}

#[test]
fn negation_passes_through_inner_variables() {
    let negation = not(Pattern::Conjunction(and(vec![
        isa("x", "person"),
        isa("y", "person"),
    ])));
    assert_eq!(named_syntax(&negation.variables()), vec!["$x", "$y"]);
}

// =============================================================================
// DNF
// =============================================================================

#[test]
fn variable_dnf_is_singleton_conjunction() {
    let dnf = isa("x", "person").to_dnf();
    assert_eq!(dnf.patterns().len(), 1);
    let conjunct = dnf.patterns()[0].as_conjunction().unwrap();
    assert_eq!(conjunct.patterns().len(), 1);
    assert!(conjunct.patterns()[0].is_variable());
}

#[test]
fn distribution_is_a_cross_product() {
    // { {a} or {b}; c; {d} or {e}; } => 4 disjuncts, order preserved
    let conjunction = and(vec![
        Pattern::Disjunction(or(vec![isa("a", "person"), isa("b", "person")])),
        isa("c", "person"),
        Pattern::Disjunction(or(vec![isa("d", "person"), isa("e", "person")])),
    ]);
    let dnf = conjunction.to_dnf();
    assert_eq!(dnf.patterns().len(), 4);

    let rendered: Vec<String> = dnf
        .patterns()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered[0],
        "{ $a isa person; $c isa person; $d isa person; }"
    );
    assert_eq!(
        rendered[3],
        "{ $b isa person; $c isa person; $e isa person; }"
    );
}

#[test]
fn dnf_flattens_nested_disjunctions() {
    let nested = or(vec![
        Pattern::Disjunction(or(vec![isa("a", "person"), isa("b", "person")])),
        isa("c", "person"),
    ]);
    let dnf = nested.to_dnf();
    assert_eq!(dnf.patterns().len(), 3);
}

#[test]
fn structurally_equal_disjuncts_collapse() {
    let twice = or(vec![isa("a", "person"), isa("a", "person")]);
    assert_eq!(twice.patterns().len(), 1);

    let dnf = or(vec![
        Pattern::Conjunction(and(vec![isa("a", "person")])),
        Pattern::Conjunction(and(vec![isa("a", "person")])),
    ])
    .to_dnf();
    assert_eq!(dnf.patterns().len(), 1);
}

#[test]
fn negation_dnf_eliminates_double_negation() {
    let inner = isa("x", "person");
    let double = Pattern::Negation(not(Pattern::Negation(not(inner.clone()))));
    assert_eq!(double.to_negation_dnf(), inner.to_negation_dnf());
}

#[test]
fn negation_dnf_wraps_other_negations() {
    let negation = Pattern::Negation(not(Pattern::Conjunction(and(vec![
        isa("x", "person"),
        isa("y", "person"),
    ]))));
    let dnf = negation.to_negation_dnf();
    assert_eq!(dnf.patterns().len(), 1);
    let conjunct = dnf.patterns()[0].as_conjunction().unwrap();
    assert_eq!(conjunct.patterns().len(), 1);
    let rewrapped = conjunct.patterns()[0].as_negation().unwrap();
    // inner form is itself normalized
    assert!(rewrapped.pattern().is_conjunction());
}

#[test]
fn negation_dnf_distributes_around_negations() {
    // { not {a}; {b} or {c}; } => two disjuncts each carrying the negation
    let conjunction = and(vec![
        Pattern::Negation(not(isa("a", "person"))),
        Pattern::Disjunction(or(vec![isa("b", "person"), isa("c", "person")])),
    ]);
    let dnf = conjunction.to_negation_dnf();
    assert_eq!(dnf.patterns().len(), 2);
    for disjunct in dnf.patterns() {
        let conjunct = disjunct.as_conjunction().unwrap();
        assert!(conjunct.patterns()[0].is_negation());
    }
}

// =============================================================================
// Casts and Rendering
// =============================================================================

#[test]
fn cast_errors_name_source_and_target() {
    let disjunction = Pattern::Disjunction(or(vec![isa("x", "person")]));
    let err = disjunction.as_negation().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidCast { .. }));
    assert_eq!(
        err.to_string(),
        "'disjunction' cannot be narrowed to 'negation'"
    );
}

#[test]
fn canonical_rendering_matches_grammar() {
    let conjunction = and(vec![isa("x", "person"), isa("y", "company")]);
    assert_eq!(
        conjunction.to_string(),
        "{ $x isa person; $y isa company; }"
    );

    let disjunction = or(vec![
        Pattern::Conjunction(and(vec![isa("x", "person")])),
        Pattern::Conjunction(and(vec![isa("x", "company")])),
    ]);
    assert_eq!(
        disjunction.to_string(),
        "{ $x isa person; } or { $x isa company; }"
    );

    let negation = not(isa("x", "person"));
    assert_eq!(negation.to_string(), "not { $x isa person }");
}

#[test]
fn rendering_is_stable_across_reconstruction() {
    let build = || {
        and(vec![
            isa("x", "person"),
            Pattern::Disjunction(or(vec![isa("y", "person"), isa("y", "company")])),
        ])
    };
    assert_eq!(build().to_string(), build().to_string());
    assert_eq!(build(), build());
}

// =============================================================================
// Properties
// =============================================================================

fn leaf() -> impl Strategy<Value = Pattern> {
    (0u32..8).prop_map(|i| isa(&format!("v{i}"), "person"))
}

fn pattern_tree() -> impl Strategy<Value = Pattern> {
    leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..3)
                .prop_map(|ps| Pattern::Conjunction(Conjunction::new(ps))),
            prop::collection::vec(inner, 1..3)
                .prop_map(|ps| Pattern::Disjunction(Disjunction::new(ps))),
        ]
    })
}

proptest! {
    #[test]
    fn dnf_is_idempotent(pattern in pattern_tree()) {
        let once = pattern.to_dnf();
        let twice = Pattern::Disjunction(once.clone()).to_dnf();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dnf_disjuncts_are_flat_conjunctions_of_variables(pattern in pattern_tree()) {
        for disjunct in pattern.to_dnf().patterns() {
            let conjunct = disjunct.as_conjunction().unwrap();
            prop_assert!(conjunct.patterns().iter().all(Pattern::is_variable));
        }
    }

    #[test]
    fn dnf_has_no_duplicate_disjuncts(pattern in pattern_tree()) {
        let dnf = pattern.to_dnf();
        let disjuncts = dnf.patterns();
        for (i, a) in disjuncts.iter().enumerate() {
            for b in disjuncts.iter().skip(i + 1) {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn negation_of_leaf_normalizes_to_wrapped_negation(leaf in leaf()) {
        let dnf = Pattern::Negation(Negation::new(leaf)).to_negation_dnf();
        prop_assert_eq!(dnf.patterns().len(), 1);
        let conjunct = dnf.patterns()[0].as_conjunction().unwrap();
        prop_assert!(conjunct.patterns()[0].is_negation());
    }
}
