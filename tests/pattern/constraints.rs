//! Integration tests for the constraint system

use trellis_foundation::{Comparator, ErrorKind, Value, ValueType};
use trellis_pattern::{
    Operand, RegexConstraint, RelationConstraint, RolePlayer, ValueOperation, type_, var,
};

// =============================================================================
// Regex
// =============================================================================

#[test]
fn unterminated_regex_is_a_syntax_error() {
    let err = RegexConstraint::new("(unterminated").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
    let msg = err.to_string();
    assert!(msg.contains("(unterminated"));
}

#[test]
fn regex_attaches_to_attribute_types() {
    let t = type_("name")
        .with_value_type(ValueType::String)
        .unwrap()
        .with_regex("^[A-Z][a-z]+$")
        .unwrap();
    assert_eq!(
        t.to_string(),
        "name value string, regex \"^[A-Z][a-z]+$\""
    );
}

#[test]
fn second_regex_is_a_repetition() {
    let err = type_("name")
        .with_regex("^a$")
        .unwrap()
        .with_regex("^b$")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConstraintRepetition { .. }));
}

// =============================================================================
// Value Operations
// =============================================================================

#[test]
fn comparison_printing_covers_all_comparators() {
    let cases = [
        (Comparator::Eq, "= 5"),
        (Comparator::Neq, "!= 5"),
        (Comparator::Gt, "> 5"),
        (Comparator::Gte, ">= 5"),
        (Comparator::Lt, "< 5"),
        (Comparator::Lte, "<= 5"),
    ];
    for (comparator, expected) in cases {
        let op =
            ValueOperation::comparison(comparator, Operand::Value(Value::Long(5))).unwrap();
        assert_eq!(op.to_string(), expected);
    }
}

#[test]
fn substring_and_pattern_comparators_require_strings() {
    assert!(
        ValueOperation::comparison(Comparator::Contains, Operand::Value(Value::Long(5)))
            .is_err()
    );
    assert!(
        ValueOperation::comparison(Comparator::Like, Operand::Value(Value::Boolean(true)))
            .is_err()
    );
    assert!(
        ValueOperation::comparison(Comparator::Contains, Operand::Value(Value::from("x")))
            .is_ok()
    );
}

#[test]
fn attribute_comparisons_attach_to_variables() {
    let v = var("a").unwrap().compare(Comparator::Gt, 30).unwrap();
    assert_eq!(v.to_string(), "$a > 30");

    let v = var("a")
        .unwrap()
        .compare_var(Comparator::Neq, var("b").unwrap())
        .unwrap();
    assert_eq!(v.to_string(), "$a != $b");
}

// =============================================================================
// Relation Scoping (two-phase)
// =============================================================================

#[test]
fn role_players_scope_when_isa_arrives_last() {
    let v = var("m")
        .unwrap()
        .rel_role("wife", var("x").unwrap())
        .with_rel_role("husband", var("y").unwrap())
        .with_isa("marriage")
        .unwrap();
    assert_eq!(
        v.to_string(),
        "$m (marriage:wife: $x, marriage:husband: $y) isa marriage"
    );
}

#[test]
fn role_players_scope_when_isa_arrives_first() {
    let v = var("m")
        .unwrap()
        .isa("marriage")
        .with_rel_role("wife", var("x").unwrap())
        .with_rel_role("husband", var("y").unwrap());
    assert_eq!(
        v.to_string(),
        "$m (marriage:wife: $x, marriage:husband: $y) isa marriage"
    );
}

#[test]
fn role_player_order_is_preserved() {
    let v = var("m")
        .unwrap()
        .rel_role("husband", var("y").unwrap())
        .with_rel_role("wife", var("x").unwrap())
        .with_isa("marriage")
        .unwrap();
    assert_eq!(
        v.to_string(),
        "$m (marriage:husband: $y, marriage:wife: $x) isa marriage"
    );
}

#[test]
fn relation_scope_is_supplied_once() {
    let relation = RelationConstraint::of(RolePlayer::with_role("wife", var("x").unwrap()))
        .with_scope("marriage")
        .with_scope("partnership");
    assert_eq!(relation.scope(), Some("marriage"));
}

// =============================================================================
// Type Constraint Printing
// =============================================================================

#[test]
fn full_type_definition_prints_in_insertion_order() {
    let t = type_("marriage")
        .with_sub("relation")
        .unwrap()
        .with_relates("wife")
        .with_relates("husband");
    assert_eq!(
        t.to_string(),
        "marriage sub relation, relates wife, relates husband"
    );
}

#[test]
fn owns_key_prints_annotation() {
    let t = type_("person").with_owns_key("email").with_owns("name");
    assert_eq!(t.to_string(), "person owns email @key, owns name");
}

#[test]
fn plays_prints_scoped_role() {
    let t = type_("person").with_plays("marriage", "spouse");
    assert_eq!(t.to_string(), "person plays marriage:spouse");
}

#[test]
fn relates_override_prints_as() {
    let t = type_("hetero-marriage")
        .with_sub("marriage")
        .unwrap()
        .with_relates_as("husband", "spouse");
    assert_eq!(
        t.to_string(),
        "hetero-marriage sub marriage, relates husband as spouse"
    );
}
