//! Integration tests for rule validation
//!
//! The rule examples here mirror realistic schema definitions: implied
//! attributes and inferred relations.

use trellis_foundation::ErrorKind;
use trellis_pattern::{Pattern, and, not, or, rule, var};

fn isa(name: &str, label: &str) -> Pattern {
    Pattern::from(var(name).unwrap().isa(label))
}

// =============================================================================
// Valid Rules
// =============================================================================

#[test]
fn has_conclusion_with_bound_variable() {
    let result = rule("unnamed-person")
        .when(and(vec![isa("x", "person")]))
        .then(var("x").unwrap().has("name", "unnamed"));
    let built = result.unwrap();
    assert_eq!(built.label(), "unnamed-person");
    assert_eq!(
        built.to_string(),
        "rule unnamed-person: when { $x isa person; } then { $x has name \"unnamed\"; }"
    );
}

#[test]
fn relation_conclusion_with_all_variables_bound() {
    let when = and(vec![
        isa("x", "person"),
        isa("y", "person"),
        Pattern::from(
            var("m")
                .unwrap()
                .rel_role("spouse", var("x").unwrap())
                .with_rel_role("spouse", var("y").unwrap()),
        ),
    ]);
    let result = rule("marriage-inference")
        .when(when)
        .then(
            var("m")
                .unwrap()
                .rel_role("partner", var("x").unwrap())
                .with_rel_role("partner", var("y").unwrap())
                .with_isa("partnership")
                .unwrap(),
        );
    assert!(result.is_ok());
}

#[test]
fn single_negation_in_when_is_fine() {
    let result = rule("not-married")
        .when(and(vec![
            isa("x", "person"),
            Pattern::Negation(not(Pattern::from(
                var("m").unwrap().rel_role("spouse", var("x").unwrap()),
            ))),
        ]))
        .then(var("x").unwrap().has("single", true));
    assert!(result.is_ok());
}

// =============================================================================
// Invalid Rules
// =============================================================================

#[test]
fn missing_when_patterns() {
    let err = rule("empty")
        .when(and(vec![]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleWhenMissingPatterns { .. }));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn nested_negation_in_when() {
    // not { not { $x isa person; }; };
    let nested = Pattern::Negation(not(Pattern::Conjunction(and(vec![Pattern::Negation(
        not(Pattern::Conjunction(and(vec![isa("x", "person")]))),
    )]))));
    let err = rule("double-negative")
        .when(and(vec![isa("x", "person"), nested]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleWhenNestedNegation { .. }));
}

#[test]
fn disjunction_in_when() {
    let err = rule("disjunctive")
        .when(and(vec![Pattern::Disjunction(or(vec![
            isa("x", "person"),
            isa("x", "company"),
        ]))]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::RuleWhenContainsDisjunction { .. }
    ));
}

#[test]
fn disjunction_nested_under_negation_in_when() {
    let err = rule("hidden-disjunction")
        .when(and(vec![
            isa("x", "person"),
            Pattern::Negation(not(Pattern::Disjunction(or(vec![
                isa("x", "employee"),
                isa("x", "contractor"),
            ])))),
        ]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::RuleWhenContainsDisjunction { .. }
    ));
}

#[test]
fn then_shape_must_be_has_or_isa_relation() {
    let err = rule("bad-shape")
        .when(and(vec![isa("x", "person")]))
        .then(var("x").unwrap().isa("person"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleThenMalformed { .. }));

    let err = rule("too-many")
        .when(and(vec![isa("x", "person")]))
        .then(
            var("x")
                .unwrap()
                .isa("person")
                .with_has("name", "unnamed")
                .with_has("age", 1),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleThenMalformed { .. }));
}

#[test]
fn ambiguous_has_assignment() {
    // both an explicit attribute type and a named attribute variable
    let err = rule("ambiguous")
        .when(and(vec![isa("x", "person"), isa("n", "name")]))
        .then(var("x").unwrap().has_var("name", var("n").unwrap()))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleThenAmbiguousHas { .. }));
}

#[test]
fn unbound_then_variable() {
    // then mentions $y; when binds only $x
    let err = rule("marriage")
        .when(and(vec![isa("x", "person")]))
        .then(
            var("m")
                .unwrap()
                .rel_role("spouse", var("x").unwrap())
                .with_rel_role("spouse", var("y").unwrap())
                .with_isa("marriage")
                .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleThenUnboundVariable { .. }));
}

#[test]
fn rule_variable_itself_must_be_bound() {
    let err = rule("unbound-rule-var")
        .when(and(vec![isa("x", "person"), isa("y", "person")]))
        .then(
            var("m")
                .unwrap()
                .rel_role("spouse", var("x").unwrap())
                .with_rel_role("spouse", var("y").unwrap())
                .with_isa("marriage")
                .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleThenUnboundVariable { .. }));
}

// =============================================================================
// Staged Construction
// =============================================================================

#[test]
fn completed_rules_are_immutable_values() {
    let first = rule("r")
        .when(and(vec![isa("x", "person")]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap();
    let second = rule("r")
        .when(and(vec![isa("x", "person")]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap();
    assert_eq!(first, second);

    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(first);
    set.insert(second);
    assert_eq!(set.len(), 1);
}

#[test]
fn validation_runs_at_then_not_before() {
    // the incomplete stage accepts an empty when; the error surfaces at then()
    let incomplete = rule("late-failure").when(and(vec![]));
    let err = incomplete
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RuleWhenMissingPatterns { .. }));
}
