//! Trellis - Pattern algebra and canonical syntax for a graph query language
//!
//! This crate re-exports both layers of the Trellis core for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: trellis_pattern    — Variables, constraints, patterns, rules
//! Layer 1: trellis_foundation — Tokens, errors, literal values
//! ```
//!
//! The core is consumed by a grammar-driven parser (building patterns
//! bottom-up through the constructors here) and by execution and tooling
//! layers (reading variables, normal forms, and canonical renderings).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use trellis_foundation::{
    Command, Comparator, ComparatorFamily, ConstraintKeyword, Error, ErrorKind, Literal,
    Operator, Punctuation, Result, Schema, Value, ValueType, escape_regex, format_datetime,
    quote_string,
};
pub use trellis_pattern::{
    AbstractConstraint, Conjunction, Definable, DefineQuery, Disjunction, HasConstraint,
    IidConstraint, IncompleteRule, InsertQuery, IsaConstraint, LabelConstraint, Negation,
    NeqConstraint, Operand, OwnsConstraint, Pattern, PlaysConstraint, Reference, RegexConstraint,
    RelatesConstraint, RelationConstraint, RolePlayer, Rule, RuleBuilder, SubConstraint,
    ThenConstraint, ThingConstraint, ThingVariable, TypeConstraint, TypeVariable,
    UnboundVariable, ValueConstraint, ValueOperation, ValueTypeConstraint, Variable,
    WhenConstraint, and, anonymous_var, define, hidden_var, insert, not, or, rule, type_, var,
};
