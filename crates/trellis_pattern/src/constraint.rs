//! The constraint system.
//!
//! Constraints are immutable assertions attached to variables, polymorphic
//! over the variable kind: [`type_::TypeConstraint`] for type variables and
//! [`thing::ThingConstraint`] for instance variables. Each constraint
//! contributes referenced variables, renders canonical syntax, and
//! participates in structural equality and hashing.

pub mod thing;
pub mod type_;

pub use thing::{
    HasConstraint, IidConstraint, IsaConstraint, NeqConstraint, Operand, RelationConstraint,
    RolePlayer, ThingConstraint, ValueConstraint, ValueOperation,
};
pub use type_::{
    AbstractConstraint, LabelConstraint, OwnsConstraint, PlaysConstraint, RegexConstraint,
    RelatesConstraint, SubConstraint, ThenConstraint, TypeConstraint, ValueTypeConstraint,
    WhenConstraint,
};
