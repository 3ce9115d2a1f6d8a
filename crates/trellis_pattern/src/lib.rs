//! Variables, constraints, pattern algebra, and rule validation for Trellis.
//!
//! This crate is the in-memory representation of Trellis query syntax:
//! - [`reference`] - Variable identity (named, anonymous, label-derived)
//! - [`variable`] - The variable model and builder entry points
//! - [`constraint`] - Type-level and instance-level constraints
//! - [`pattern`] - Conjunction/disjunction/negation algebra with DNF
//! - [`rule`] - Staged `when`/`then` rule construction and validation
//! - [`query`] - The define/insert query surface
//!
//! All finished values are immutable and renderable back to source syntax;
//! the canonical string form is the only externally observable
//! serialization.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod pattern;
pub mod query;
pub mod reference;
pub mod rule;
pub mod thing_variable;
pub mod type_variable;
pub mod variable;

pub use constraint::{
    AbstractConstraint, HasConstraint, IidConstraint, IsaConstraint, LabelConstraint,
    NeqConstraint, Operand, OwnsConstraint, PlaysConstraint, RegexConstraint, RelatesConstraint,
    RelationConstraint, RolePlayer, SubConstraint, ThenConstraint, ThingConstraint,
    TypeConstraint, ValueConstraint, ValueOperation, ValueTypeConstraint, WhenConstraint,
};
pub use pattern::{Conjunction, Disjunction, Negation, Pattern};
pub use query::{Definable, DefineQuery, InsertQuery};
pub use reference::Reference;
pub use rule::{IncompleteRule, Rule, RuleBuilder};
pub use thing_variable::ThingVariable;
pub use type_variable::TypeVariable;
pub use variable::{UnboundVariable, Variable};

use trellis_foundation::Result;

/// Creates a named variable.
///
/// # Errors
/// Returns an error if the name is not a valid variable name.
pub fn var(name: impl Into<String>) -> Result<UnboundVariable> {
    UnboundVariable::named(name)
}

/// Creates a user-written anonymous variable (`$_`).
#[must_use]
pub const fn anonymous_var() -> UnboundVariable {
    UnboundVariable::anonymous()
}

/// Creates a hidden variable for builder-internal use.
#[must_use]
pub const fn hidden_var() -> UnboundVariable {
    UnboundVariable::hidden()
}

/// Creates a hidden type variable from a label.
#[must_use]
pub fn type_(label: impl Into<String>) -> TypeVariable {
    UnboundVariable::hidden().type_(label)
}

/// Creates a conjunction over the given patterns.
#[must_use]
pub fn and(patterns: Vec<Pattern>) -> Conjunction {
    Conjunction::new(patterns)
}

/// Creates a disjunction over the given patterns.
#[must_use]
pub fn or(patterns: Vec<Pattern>) -> Disjunction {
    Disjunction::new(patterns)
}

/// Creates a negation of the given pattern.
#[must_use]
pub fn not(pattern: Pattern) -> Negation {
    Negation::new(pattern)
}

/// Starts building a rule with the given label.
#[must_use]
pub fn rule(label: impl Into<String>) -> RuleBuilder {
    Rule::builder(label)
}

/// Creates a define query.
///
/// # Errors
/// Returns an error if the list is empty.
pub fn define(definables: Vec<Definable>) -> Result<DefineQuery> {
    DefineQuery::new(definables)
}

/// Creates an insert query.
///
/// # Errors
/// Returns an error if the list is empty.
pub fn insert(variables: Vec<ThingVariable>) -> Result<InsertQuery> {
    InsertQuery::new(variables)
}
