//! Integration tests for error types
//!
//! Every error carries enough context to pinpoint the offending value: the
//! variable reference, the constraint kind and values, or the rule label.

use trellis_foundation::{Error, ErrorKind};

#[test]
fn constraint_repetition_message_is_complete() {
    let err = Error::constraint_repetition(
        "$person".to_string(),
        "sub",
        "sub entity".to_string(),
        "sub relation".to_string(),
    );
    let msg = err.to_string();
    assert!(msg.contains("$person"));
    assert!(msg.contains("'sub'"));
    assert!(msg.contains("sub entity"));
    assert!(msg.contains("sub relation"));
}

#[test]
fn invalid_iid_shows_expected_format() {
    let err = Error::invalid_iid("1234".to_string(), "^0x[0-9a-f]+$");
    let msg = err.to_string();
    assert!(msg.contains("1234"));
    assert!(msg.contains("0x"));
}

#[test]
fn invalid_variable_name_shows_expected_format() {
    let err = Error::invalid_variable_name("bad name".to_string(), "^[a-zA-Z0-9][a-zA-Z0-9_-]*$");
    assert!(err.to_string().contains("bad name"));
}

#[test]
fn rule_error_kinds_are_distinct() {
    let label = || "my-rule".to_string();
    let kinds = [
        ErrorKind::RuleWhenMissingPatterns { label: label() },
        ErrorKind::RuleWhenNestedNegation { label: label() },
        ErrorKind::RuleWhenContainsDisjunction { label: label() },
        ErrorKind::RuleThenMalformed {
            label: label(),
            then: "$x".to_string(),
        },
        ErrorKind::RuleThenAmbiguousHas {
            label: label(),
            then: "$x".to_string(),
        },
        ErrorKind::RuleThenUnboundVariable { label: label() },
    ];
    for kind in &kinds {
        assert!(kind.to_string().contains("my-rule"));
    }
    // messages are pairwise distinct
    for (i, a) in kinds.iter().enumerate() {
        for b in kinds.iter().skip(i + 1) {
            assert_ne!(a.to_string(), b.to_string());
        }
    }
}

#[test]
fn errors_compare_structurally() {
    assert_eq!(
        Error::invalid_cast("conjunction", "negation"),
        Error::invalid_cast("conjunction", "negation")
    );
    assert_ne!(
        Error::invalid_cast("conjunction", "negation"),
        Error::invalid_cast("disjunction", "negation")
    );
}
