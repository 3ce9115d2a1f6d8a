//! The variable model.
//!
//! [`UnboundVariable`] is a bare reference: the entry point the parser (or a
//! query builder) starts from. Attaching the first constraint converts it
//! into a [`TypeVariable`] or [`ThingVariable`]; [`Variable`] is the closed
//! sum over the two bound kinds.

use std::fmt;

use trellis_foundation::{Comparator, Error, Result, Value};

use crate::constraint::thing::{
    HasConstraint, IidConstraint, IsaConstraint, NeqConstraint, Operand, RelationConstraint,
    RolePlayer, ThingConstraint, ValueConstraint, ValueOperation,
};
use crate::constraint::type_::{LabelConstraint, TypeConstraint};
use crate::reference::Reference;
use crate::thing_variable::ThingVariable;
use crate::type_variable::TypeVariable;

/// A bound variable: a type variable or an instance (thing) variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    /// A type variable.
    Type(TypeVariable),
    /// An instance variable.
    Thing(ThingVariable),
}

impl Variable {
    /// Returns this variable's binding identity.
    #[must_use]
    pub const fn reference(&self) -> &Reference {
        match self {
            Self::Type(var) => var.reference(),
            Self::Thing(var) => var.reference(),
        }
    }

    /// Returns true if this variable carries a user-supplied name.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.reference().is_named()
    }

    /// Returns true for type variables.
    #[must_use]
    pub const fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// Returns true for thing variables.
    #[must_use]
    pub const fn is_thing(&self) -> bool {
        matches!(self, Self::Thing(_))
    }

    /// Narrows to the type variable.
    ///
    /// # Errors
    /// Returns an invalid-cast error if this is a thing variable.
    pub fn as_type(&self) -> Result<&TypeVariable> {
        match self {
            Self::Type(var) => Ok(var),
            Self::Thing(_) => Err(Error::invalid_cast("thing variable", "type variable")),
        }
    }

    /// Narrows to the thing variable.
    ///
    /// # Errors
    /// Returns an invalid-cast error if this is a type variable.
    pub fn as_thing(&self) -> Result<&ThingVariable> {
        match self {
            Self::Thing(var) => Ok(var),
            Self::Type(_) => Err(Error::invalid_cast("type variable", "thing variable")),
        }
    }

    /// Returns the variables referenced by this variable's constraints.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Self::Type(var) => var.variables(),
            Self::Thing(var) => var.variables(),
        }
    }
}

impl From<TypeVariable> for Variable {
    fn from(var: TypeVariable) -> Self {
        Self::Type(var)
    }
}

impl From<ThingVariable> for Variable {
    fn from(var: ThingVariable) -> Self {
        Self::Thing(var)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(var) => var.fmt(f),
            Self::Thing(var) => var.fmt(f),
        }
    }
}

/// A variable with no constraints yet.
///
/// The parser builds patterns bottom-up: it creates an unbound variable for
/// each `$x`, then converts it by attaching the first constraint. Conversion
/// consumes the unbound variable, so a reference can only be bound once per
/// occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnboundVariable {
    reference: Reference,
}

impl UnboundVariable {
    /// Creates a named variable.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid variable name.
    pub fn named(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            reference: Reference::named(name)?,
        })
    }

    /// Creates a user-written anonymous variable (`$_`).
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            reference: Reference::anonymous(true),
        }
    }

    /// Creates a hidden variable for internal use by builders.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            reference: Reference::anonymous(false),
        }
    }

    /// Returns this variable's binding identity.
    #[must_use]
    pub const fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Converts to a type variable with no constraints.
    #[must_use]
    pub fn to_type(self) -> TypeVariable {
        TypeVariable::new(self.reference)
    }

    /// Converts to a thing variable with no constraints.
    #[must_use]
    pub fn to_thing(self) -> ThingVariable {
        ThingVariable::new(self.reference)
    }

    /// Converts to a type variable carrying the given constraint.
    ///
    /// A hidden variable receiving a label constraint becomes a
    /// label-referenced type variable, so that structurally equal hidden
    /// types compare equal.
    #[must_use]
    pub fn constrain_type(self, constraint: TypeConstraint) -> TypeVariable {
        let reference = match &constraint {
            TypeConstraint::Label(label) if !self.reference.is_visible() => {
                Reference::label(label.scoped_label())
            }
            _ => self.reference,
        };
        TypeVariable::with_constraint(reference, constraint)
    }

    /// Converts to a thing variable carrying the given constraint.
    #[must_use]
    pub fn constrain_thing(self, constraint: ThingConstraint) -> ThingVariable {
        ThingVariable::with_constraint(self.reference, constraint)
    }

    // =========================================================================
    // Type variable builders
    // =========================================================================

    /// Attaches a type label: `type person`.
    #[must_use]
    pub fn type_(self, label: impl Into<String>) -> TypeVariable {
        self.constrain_type(TypeConstraint::Label(LabelConstraint::new(label)))
    }

    /// Attaches a scoped type label: `type marriage:wife`.
    #[must_use]
    pub fn type_scoped(self, scope: impl Into<String>, label: impl Into<String>) -> TypeVariable {
        self.constrain_type(TypeConstraint::Label(LabelConstraint::scoped(scope, label)))
    }

    // =========================================================================
    // Thing variable builders
    // =========================================================================

    /// Attaches an `isa` constraint with a type label.
    #[must_use]
    pub fn isa(self, label: impl Into<String>) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Isa(IsaConstraint::from_label(label, false)))
    }

    /// Attaches an `isa!` (direct type) constraint.
    #[must_use]
    pub fn isa_explicit(self, label: impl Into<String>) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Isa(IsaConstraint::from_label(label, true)))
    }

    /// Attaches an `isa` constraint referencing a type variable.
    #[must_use]
    pub fn isa_var(self, type_var: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Isa(IsaConstraint::from_var(
            type_var, false,
        )))
    }

    /// Attaches an `iid` constraint.
    ///
    /// # Errors
    /// Returns an error if the IID literal is malformed.
    pub fn iid(self, iid: impl Into<String>) -> Result<ThingVariable> {
        Ok(self.constrain_thing(ThingConstraint::Iid(IidConstraint::new(iid)?)))
    }

    /// Attaches an inequality constraint: `!= $other`.
    #[must_use]
    pub fn neq(self, other: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Neq(NeqConstraint::from_var(other)))
    }

    /// Attaches a value assignment, making this an attribute variable.
    #[must_use]
    pub fn assign(self, value: impl Into<Value>) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Value(ValueConstraint::new(
            ValueOperation::assign(value),
        )))
    }

    /// Attaches a value comparison against a literal.
    ///
    /// # Errors
    /// Returns an error if the comparator does not accept the operand (e.g.
    /// `like` with a non-string).
    pub fn compare(self, comparator: Comparator, value: impl Into<Value>) -> Result<ThingVariable> {
        let operation = ValueOperation::comparison(comparator, Operand::Value(value.into()))?;
        Ok(self.constrain_thing(ThingConstraint::Value(ValueConstraint::new(operation))))
    }

    /// Attaches a value comparison against another variable.
    ///
    /// # Errors
    /// Returns an error if the comparator does not accept variables.
    pub fn compare_var(self, comparator: Comparator, other: UnboundVariable) -> Result<ThingVariable> {
        let operand = Operand::Variable(Box::new(other.to_thing()));
        let operation = ValueOperation::comparison(comparator, operand)?;
        Ok(self.constrain_thing(ThingConstraint::Value(ValueConstraint::new(operation))))
    }

    /// Attaches a `has` constraint with an attribute type and value.
    #[must_use]
    pub fn has(self, label: impl Into<String>, value: impl Into<Value>) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Has(HasConstraint::from_value(label, value)))
    }

    /// Attaches a `has` constraint with an attribute type and a variable.
    #[must_use]
    pub fn has_var(self, label: impl Into<String>, attribute: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Has(HasConstraint::from_var(
            label, attribute,
        )))
    }

    /// Attaches a `has` constraint with only an attribute variable.
    #[must_use]
    pub fn has_attribute(self, attribute: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Has(HasConstraint::from_attribute(
            attribute,
        )))
    }

    /// Starts a relation with an untyped role player: `($x)`.
    #[must_use]
    pub fn rel(self, player: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Relation(RelationConstraint::of(
            RolePlayer::new(player),
        )))
    }

    /// Starts a relation with a typed role player: `(wife: $x)`.
    #[must_use]
    pub fn rel_role(self, role: impl Into<String>, player: UnboundVariable) -> ThingVariable {
        self.constrain_thing(ThingConstraint::Relation(RelationConstraint::of(
            RolePlayer::with_role(role, player),
        )))
    }
}

impl fmt::Display for UnboundVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference.syntax())
    }
}
