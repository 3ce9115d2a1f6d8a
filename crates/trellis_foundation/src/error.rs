//! Error types for Trellis AST construction and validation.
//!
//! Uses `thiserror` for ergonomic error definition. Every error here is
//! raised eagerly, at the point a value is constructed or validated; no
//! partially-built pattern state is observable after a failure.

use thiserror::Error;

/// Result alias used throughout Trellis.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Trellis operations.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a constraint repetition error for a singular constraint kind.
    #[must_use]
    pub fn constraint_repetition(
        variable: String,
        kind: &'static str,
        existing: String,
        repeated: String,
    ) -> Self {
        Self::new(ErrorKind::ConstraintRepetition {
            variable,
            kind,
            existing,
            repeated,
        })
    }

    /// Creates an invalid narrowing-cast error.
    #[must_use]
    pub fn invalid_cast(from: &'static str, to: &'static str) -> Self {
        Self::new(ErrorKind::InvalidCast { from, to })
    }

    /// Creates a missing-patterns error.
    #[must_use]
    pub fn missing_patterns() -> Self {
        Self::new(ErrorKind::MissingPatterns)
    }

    /// Creates an invalid IID error.
    #[must_use]
    pub fn invalid_iid(iid: String, expected: &'static str) -> Self {
        Self::new(ErrorKind::InvalidIid { iid, expected })
    }

    /// Creates an invalid variable name error.
    #[must_use]
    pub fn invalid_variable_name(name: String, expected: &'static str) -> Self {
        Self::new(ErrorKind::InvalidVariableName { name, expected })
    }

    /// Creates an invalid regex error from a compilation failure.
    #[must_use]
    pub fn invalid_regex(pattern: String, reason: String) -> Self {
        Self::new(ErrorKind::InvalidRegex { pattern, reason })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A singular constraint kind was attached twice to the same variable.
    #[error(
        "the variable '{variable}' contains illegally repeating '{kind}' constraints: '{existing}' and '{repeated}'"
    )]
    ConstraintRepetition {
        /// The variable the constraints were attached to.
        variable: String,
        /// The singular constraint kind that repeated.
        kind: &'static str,
        /// The constraint already present.
        existing: String,
        /// The constraint whose addition was rejected.
        repeated: String,
    },

    /// A capability-narrowing cast was requested on a value that does not
    /// support it.
    #[error("'{from}' cannot be narrowed to '{to}'")]
    InvalidCast {
        /// The kind of the value being cast.
        from: &'static str,
        /// The kind that was requested.
        to: &'static str,
    },

    /// A query or pattern list was constructed without any patterns.
    #[error("the query has not been provided with any patterns")]
    MissingPatterns,

    /// An IID literal did not match the required format.
    #[error("invalid IID '{iid}'; IIDs must match '{expected}'")]
    InvalidIid {
        /// The rejected IID literal.
        iid: String,
        /// The regular expression IIDs must match.
        expected: &'static str,
    },

    /// A variable name did not match the required format.
    #[error("invalid variable name '{name}'; variable names must match '{expected}'")]
    InvalidVariableName {
        /// The rejected name.
        name: String,
        /// The regular expression names must match.
        expected: &'static str,
    },

    /// A regex constraint literal failed to compile.
    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex {
        /// The rejected pattern.
        pattern: String,
        /// The compiler's diagnostic.
        reason: String,
    },

    /// A rule's `when` clause contained no patterns.
    #[error("rule '{label}': 'when' must contain at least one pattern")]
    RuleWhenMissingPatterns {
        /// The rule's label.
        label: String,
    },

    /// A rule's `when` clause nested a negation inside another negation.
    #[error("rule '{label}': 'when' contains a negation nested inside another negation")]
    RuleWhenNestedNegation {
        /// The rule's label.
        label: String,
    },

    /// A rule's `when` clause contained a disjunction.
    #[error("rule '{label}': 'when' must not contain a disjunction")]
    RuleWhenContainsDisjunction {
        /// The rule's label.
        label: String,
    },

    /// A rule's `then` clause was not a single `has` nor an `isa` plus a
    /// relation.
    #[error(
        "rule '{label}': 'then' must be a single 'has' constraint, or an 'isa' and a relation; got '{then}'"
    )]
    RuleThenMalformed {
        /// The rule's label.
        label: String,
        /// The rendered `then` variable.
        then: String,
    },

    /// A rule's `then` `has` supplied both an attribute type label and a
    /// named attribute variable.
    #[error(
        "rule '{label}': 'then' cannot assign both an attribute type and a named attribute variable: '{then}'"
    )]
    RuleThenAmbiguousHas {
        /// The rule's label.
        label: String,
        /// The rendered `then` variable.
        then: String,
    },

    /// A named variable in a rule's `then` was not bound in its `when`.
    #[error("rule '{label}': 'then' refers to named variables that are not bound in 'when'")]
    RuleThenUnboundVariable {
        /// The rule's label.
        label: String,
    },
}
