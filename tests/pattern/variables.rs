//! Integration tests for the variable model

use trellis_foundation::ErrorKind;
use trellis_pattern::{Reference, UnboundVariable, Variable, type_, var};

// =============================================================================
// Identity
// =============================================================================

#[test]
fn named_variables_keep_identity_across_composition() {
    let first = var("x").unwrap().isa("person");
    let second = var("x").unwrap().isa("person");
    assert_eq!(first, second);
    assert_eq!(first.reference(), &Reference::named("x").unwrap());
}

#[test]
fn anonymous_variables_render_underscore() {
    let v = UnboundVariable::anonymous().isa("person");
    assert_eq!(v.to_string(), "$_ isa person");
}

#[test]
fn hidden_type_variables_come_from_labels() {
    let t = type_("person");
    assert!(t.reference().is_label());
    assert_eq!(t.to_string(), "person");
}

// =============================================================================
// Singular Constraint Multiplicity
// =============================================================================

#[test]
fn two_abstract_constraints_fail() {
    let err = type_("person")
        .with_abstract()
        .unwrap()
        .with_abstract()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConstraintRepetition { .. }));
}

#[test]
fn abstract_plus_sub_succeeds() {
    let t = type_("person")
        .with_abstract()
        .unwrap()
        .with_sub("entity")
        .unwrap();
    assert!(t.abstractness().is_some());
    assert!(t.sub().is_some());
    assert_eq!(t.to_string(), "person abstract, sub entity");
}

#[test]
fn two_isa_constraints_fail() {
    let err = var("x")
        .unwrap()
        .isa("person")
        .with_isa("company")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConstraintRepetition { .. }));
}

// =============================================================================
// Variable Extraction
// =============================================================================

#[test]
fn constraint_referenced_variables_are_reachable() {
    let v = var("x")
        .unwrap()
        .isa("person")
        .with_has_var("name", var("n").unwrap());
    let vars = Variable::Thing(v).variables();
    let named: Vec<String> = vars
        .iter()
        .filter(|v| v.is_named())
        .map(|v| v.reference().syntax())
        .collect();
    assert_eq!(named, vec!["$n"]);
}

#[test]
fn narrowing_mismatch_is_an_error() {
    let v = Variable::Type(type_("person"));
    let err = v.as_thing().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidCast { .. }));
}
