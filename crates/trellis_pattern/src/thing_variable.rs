//! Instance (thing) variables.
//!
//! A thing variable owns a reference plus at most one each of `iid`, `isa`,
//! inequality, value, and relation constraints, and an ordered list of `has`
//! constraints. The printed form follows the variable's anchor: a relation
//! variable leads with its role-player tuple, an attribute variable with its
//! value operation, and a plain thing with `isa`/`iid`/`!=`.
//!
//! Relation scope is two-phase: role players may be declared before the
//! relation's type is known, and an `isa` carrying a label retroactively
//! scopes them (and scopes later arrivals immediately), whichever order the
//! constraints land in.

use std::fmt;

use trellis_foundation::{Error, Result, Value};

use crate::constraint::thing::{
    HasConstraint, IidConstraint, IsaConstraint, NeqConstraint, RelationConstraint, RolePlayer,
    ThingConstraint, ValueConstraint,
};
use crate::reference::Reference;
use crate::variable::{UnboundVariable, Variable};

/// An instance variable: a reference plus instance-level constraints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThingVariable {
    reference: Reference,
    iid: Option<IidConstraint>,
    isa: Option<IsaConstraint>,
    neq: Option<NeqConstraint>,
    value: Option<ValueConstraint>,
    relation: Option<RelationConstraint>,
    has: Vec<HasConstraint>,
}

impl ThingVariable {
    pub(crate) const fn new(reference: Reference) -> Self {
        Self {
            reference,
            iid: None,
            isa: None,
            neq: None,
            value: None,
            relation: None,
            has: Vec::new(),
        }
    }

    pub(crate) fn with_constraint(reference: Reference, constraint: ThingConstraint) -> Self {
        let var = Self::new(reference);
        match constraint {
            ThingConstraint::Iid(c) => Self { iid: Some(c), ..var },
            ThingConstraint::Isa(c) => Self { isa: Some(c), ..var },
            ThingConstraint::Neq(c) => Self { neq: Some(c), ..var },
            ThingConstraint::Value(c) => Self {
                value: Some(c),
                ..var
            },
            ThingConstraint::Relation(c) => Self {
                relation: Some(c),
                ..var
            },
            ThingConstraint::Has(c) => Self {
                has: vec![c],
                ..var
            },
        }
    }

    /// Returns this variable's binding identity.
    #[must_use]
    pub const fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Returns the `iid` constraint, if present.
    #[must_use]
    pub const fn iid(&self) -> Option<&IidConstraint> {
        self.iid.as_ref()
    }

    /// Returns the `isa` constraint, if present.
    #[must_use]
    pub const fn isa(&self) -> Option<&IsaConstraint> {
        self.isa.as_ref()
    }

    /// Returns the inequality constraint, if present.
    #[must_use]
    pub const fn neq(&self) -> Option<&NeqConstraint> {
        self.neq.as_ref()
    }

    /// Returns the value constraint, if present.
    #[must_use]
    pub const fn value(&self) -> Option<&ValueConstraint> {
        self.value.as_ref()
    }

    /// Returns the relation constraint, if present.
    #[must_use]
    pub const fn relation(&self) -> Option<&RelationConstraint> {
        self.relation.as_ref()
    }

    /// Returns the `has` constraints in insertion order.
    #[must_use]
    pub fn has(&self) -> &[HasConstraint] {
        &self.has
    }

    /// Returns the number of attached constraints.
    #[must_use]
    pub fn constraint_count(&self) -> usize {
        usize::from(self.iid.is_some())
            + usize::from(self.isa.is_some())
            + usize::from(self.neq.is_some())
            + usize::from(self.value.is_some())
            + usize::from(self.relation.is_some())
            + self.has.len()
    }

    /// Attaches a constraint, dispatching on its kind.
    ///
    /// # Errors
    /// Returns a constraint-repetition error if a singular constraint of the
    /// same kind is already present.
    pub fn constrain(self, constraint: ThingConstraint) -> Result<Self> {
        match constraint {
            ThingConstraint::Iid(c) => self.constrain_iid(c),
            ThingConstraint::Isa(c) => self.constrain_isa(c),
            ThingConstraint::Neq(c) => self.constrain_neq(c),
            ThingConstraint::Value(c) => self.constrain_value(c),
            ThingConstraint::Relation(c) => self.constrain_relation(c),
            ThingConstraint::Has(c) => Ok(self.constrain_has(c)),
        }
    }

    /// Attaches an `iid` constraint.
    ///
    /// # Errors
    /// Returns a repetition error if one is already present.
    pub fn constrain_iid(mut self, iid: IidConstraint) -> Result<Self> {
        if let Some(existing) = &self.iid {
            return Err(self.repetition_error("iid", existing.to_string(), iid.to_string()));
        }
        self.iid = Some(iid);
        Ok(self)
    }

    /// Attaches an `isa` constraint.
    ///
    /// If the constraint carries a type label and a relation constraint is
    /// already present, the label becomes the relation's scope so that role
    /// players print in scoped form.
    ///
    /// # Errors
    /// Returns a repetition error if one is already present.
    pub fn constrain_isa(mut self, isa: IsaConstraint) -> Result<Self> {
        if let Some(existing) = &self.isa {
            return Err(self.repetition_error("isa", existing.to_string(), isa.to_string()));
        }
        if let Some(label) = isa.type_label() {
            let label = label.to_string();
            if let Some(relation) = self.relation.take() {
                self.relation = Some(relation.with_scope(&label));
            }
        }
        self.isa = Some(isa);
        Ok(self)
    }

    /// Attaches an inequality constraint.
    ///
    /// # Errors
    /// Returns a repetition error if one is already present.
    pub fn constrain_neq(mut self, neq: NeqConstraint) -> Result<Self> {
        if let Some(existing) = &self.neq {
            return Err(self.repetition_error("neq", existing.to_string(), neq.to_string()));
        }
        self.neq = Some(neq);
        Ok(self)
    }

    /// Attaches a value constraint.
    ///
    /// # Errors
    /// Returns a repetition error if one is already present.
    pub fn constrain_value(mut self, value: ValueConstraint) -> Result<Self> {
        if let Some(existing) = &self.value {
            return Err(self.repetition_error("value", existing.to_string(), value.to_string()));
        }
        self.value = Some(value);
        Ok(self)
    }

    /// Attaches a relation constraint.
    ///
    /// If an `isa` with a type label is already present, the relation is
    /// scoped immediately.
    ///
    /// # Errors
    /// Returns a repetition error if one is already present.
    pub fn constrain_relation(mut self, relation: RelationConstraint) -> Result<Self> {
        if let Some(existing) = &self.relation {
            return Err(self.repetition_error(
                "relation",
                existing.to_string(),
                relation.to_string(),
            ));
        }
        let relation = match self.isa_label() {
            Some(label) => relation.with_scope(&label),
            None => relation,
        };
        self.relation = Some(relation);
        Ok(self)
    }

    /// Appends a role player, creating the relation constraint if absent.
    #[must_use]
    pub fn constrain_role_player(mut self, role_player: RolePlayer) -> Self {
        let relation = self
            .relation
            .take()
            .unwrap_or_else(RelationConstraint::empty)
            .with_player(role_player);
        let relation = match self.isa_label() {
            Some(label) if !relation.has_scope() => relation.with_scope(&label),
            _ => relation,
        };
        self.relation = Some(relation);
        self
    }

    /// Appends a `has` constraint.
    #[must_use]
    pub fn constrain_has(mut self, has: HasConstraint) -> Self {
        self.has.push(has);
        self
    }

    fn isa_label(&self) -> Option<String> {
        self.isa
            .as_ref()
            .and_then(IsaConstraint::type_label)
            .map(ToString::to_string)
    }

    fn repetition_error(&self, kind: &'static str, existing: String, repeated: String) -> Error {
        Error::constraint_repetition(self.reference.syntax(), kind, existing, repeated)
    }

    /// Returns the variables referenced by the attached constraints.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = Vec::new();
        if let Some(isa) = &self.isa {
            vars.extend(isa.variables());
        }
        if let Some(neq) = &self.neq {
            vars.extend(neq.variables());
        }
        if let Some(value) = &self.value {
            vars.extend(value.variables());
        }
        if let Some(relation) = &self.relation {
            vars.extend(relation.variables());
        }
        for has in &self.has {
            vars.extend(has.variables());
        }
        vars
    }

    // =========================================================================
    // Builder sugar
    // =========================================================================

    /// Adds an `isa` constraint with a type label.
    ///
    /// # Errors
    /// Returns an error if an isa constraint is already present.
    pub fn with_isa(self, label: impl Into<String>) -> Result<Self> {
        self.constrain_isa(IsaConstraint::from_label(label, false))
    }

    /// Adds an `isa!` constraint with a type label.
    ///
    /// # Errors
    /// Returns an error if an isa constraint is already present.
    pub fn with_isa_explicit(self, label: impl Into<String>) -> Result<Self> {
        self.constrain_isa(IsaConstraint::from_label(label, true))
    }

    /// Adds a `has` constraint with an attribute type and value.
    #[must_use]
    pub fn with_has(self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constrain_has(HasConstraint::from_value(label, value))
    }

    /// Adds a `has` constraint with an attribute type and a variable.
    #[must_use]
    pub fn with_has_var(self, label: impl Into<String>, attribute: UnboundVariable) -> Self {
        self.constrain_has(HasConstraint::from_var(label, attribute))
    }

    /// Adds an untyped role player: `($x)`.
    #[must_use]
    pub fn with_rel(self, player: UnboundVariable) -> Self {
        self.constrain_role_player(RolePlayer::new(player))
    }

    /// Adds a typed role player: `(wife: $x)`.
    #[must_use]
    pub fn with_rel_role(self, role: impl Into<String>, player: UnboundVariable) -> Self {
        self.constrain_role_player(RolePlayer::with_role(role, player))
    }
}

impl fmt::Display for ThingVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments: Vec<String> = Vec::new();
        if self.reference.is_visible() {
            segments.push(self.reference.syntax());
        }

        let mut tail: Vec<String> = Vec::new();
        if let Some(relation) = &self.relation {
            segments.push(relation.to_string());
            if let Some(isa) = &self.isa {
                tail.push(isa.to_string());
            }
        } else if let Some(value) = &self.value {
            segments.push(value.to_string());
            if let Some(isa) = &self.isa {
                tail.push(isa.to_string());
            }
        } else if let Some(isa) = &self.isa {
            tail.push(isa.to_string());
        } else if let Some(iid) = &self.iid {
            tail.push(iid.to_string());
        } else if let Some(neq) = &self.neq {
            tail.push(neq.to_string());
        }

        tail.extend(self.has.iter().map(ToString::to_string));
        if !tail.is_empty() {
            segments.push(tail.join(", "));
        }

        f.write_str(&segments.join(" "))
    }
}
