//! Integration tests for the define/insert query surface

use trellis_foundation::{ErrorKind, ValueType};
use trellis_pattern::{Definable, and, define, insert, rule, type_, var};

#[test]
fn define_schema_with_types_and_rule() {
    let person = type_("person")
        .with_sub("entity")
        .unwrap()
        .with_owns("name")
        .with_plays("marriage", "spouse");
    let name = type_("name").with_value_type(ValueType::String).unwrap();
    let unnamed = rule("unnamed-person")
        .when(and(vec![var("x").unwrap().isa("person").into()]))
        .then(var("x").unwrap().has("name", "unnamed"))
        .unwrap();

    let query = define(vec![
        Definable::from(person),
        Definable::from(name),
        Definable::from(unnamed),
    ])
    .unwrap();

    assert_eq!(
        query.to_string(),
        "define\n\
         person sub entity, owns name, plays marriage:spouse;\n\
         name value string;\n\
         rule unnamed-person: when { $x isa person; } then { $x has name \"unnamed\"; };"
    );
}

#[test]
fn define_rejects_empty_lists() {
    let err = define(vec![]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingPatterns));
}

#[test]
fn insert_renders_each_variable() {
    let query = insert(vec![
        var("x").unwrap().isa("person").with_has("name", "alice"),
        var("m")
            .unwrap()
            .rel_role("spouse", var("x").unwrap())
            .with_isa("marriage")
            .unwrap(),
    ])
    .unwrap();

    assert_eq!(
        query.to_string(),
        "insert\n\
         $x isa person, has name \"alice\";\n\
         $m (marriage:spouse: $x) isa marriage;"
    );
}

#[test]
fn insert_rejects_empty_lists() {
    let err = insert(vec![]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingPatterns));
}

#[test]
fn queries_compare_structurally() {
    let build = || {
        define(vec![Definable::from(
            type_("person").with_owns("name"),
        )])
        .unwrap()
    };
    assert_eq!(build(), build());
}
