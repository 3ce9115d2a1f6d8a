//! Type variables.
//!
//! A type variable owns a reference and an insertion-ordered list of type
//! constraints. Singular constraint kinds (label, sub, abstract, value,
//! regex, when, then) may appear at most once; owns/plays/relates repeat
//! freely. Printing follows insertion order.

use std::fmt;

use trellis_foundation::{Error, Result, ValueType};

use crate::constraint::type_::{
    AbstractConstraint, LabelConstraint, OwnsConstraint, PlaysConstraint, RegexConstraint,
    RelatesConstraint, SubConstraint, ThenConstraint, TypeConstraint, ValueTypeConstraint,
    WhenConstraint,
};
use crate::pattern::Conjunction;
use crate::reference::Reference;
use crate::variable::{UnboundVariable, Variable};

/// A type variable: a reference plus type-level constraints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    reference: Reference,
    constraints: Vec<TypeConstraint>,
}

impl TypeVariable {
    pub(crate) const fn new(reference: Reference) -> Self {
        Self {
            reference,
            constraints: Vec::new(),
        }
    }

    pub(crate) fn with_constraint(reference: Reference, constraint: TypeConstraint) -> Self {
        Self {
            reference,
            constraints: vec![constraint],
        }
    }

    /// Returns this variable's binding identity.
    #[must_use]
    pub const fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Returns the attached constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[TypeConstraint] {
        &self.constraints
    }

    /// Attaches a constraint.
    ///
    /// Adding a label retroactively scopes any `relates` constraints already
    /// attached; adding a `relates` when the label is already known scopes
    /// it immediately.
    ///
    /// # Errors
    /// Returns a constraint-repetition error if a singular constraint of the
    /// same kind is already present.
    pub fn constrain(mut self, constraint: TypeConstraint) -> Result<Self> {
        if constraint.is_singular() {
            if let Some(existing) = self
                .constraints
                .iter()
                .find(|c| c.kind() == constraint.kind())
            {
                return Err(Error::constraint_repetition(
                    self.reference.syntax(),
                    constraint.kind(),
                    existing.to_string(),
                    constraint.to_string(),
                ));
            }
        }

        // A relates arriving after the label is scoped on entry
        let scope = self.label().map(|label| label.label().to_string());
        let constraint = match (constraint, scope) {
            (TypeConstraint::Relates(relates), Some(scope)) => {
                TypeConstraint::Relates(relates.with_scope(&scope))
            }
            (constraint, _) => constraint,
        };

        // A label arriving after relates constraints scopes them retroactively
        if let TypeConstraint::Label(label) = &constraint {
            let scope = label.label().to_string();
            self.constraints = self
                .constraints
                .into_iter()
                .map(|c| match c {
                    TypeConstraint::Relates(relates) => {
                        TypeConstraint::Relates(relates.with_scope(&scope))
                    }
                    other => other,
                })
                .collect();
        }

        self.constraints.push(constraint);
        Ok(self)
    }

    /// Returns the label constraint, if present.
    #[must_use]
    pub fn label(&self) -> Option<&LabelConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Label(label) => Some(label),
            _ => None,
        })
    }

    /// Returns the sub constraint, if present.
    #[must_use]
    pub fn sub(&self) -> Option<&SubConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Sub(sub) => Some(sub),
            _ => None,
        })
    }

    /// Returns the abstract constraint, if present.
    #[must_use]
    pub fn abstractness(&self) -> Option<&AbstractConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Abstract(a) => Some(a),
            _ => None,
        })
    }

    /// Returns the value-type constraint, if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&ValueTypeConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::ValueType(vt) => Some(vt),
            _ => None,
        })
    }

    /// Returns the regex constraint, if present.
    #[must_use]
    pub fn regex(&self) -> Option<&RegexConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Regex(r) => Some(r),
            _ => None,
        })
    }

    /// Returns the rule-when constraint, if present.
    #[must_use]
    pub fn when(&self) -> Option<&WhenConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::When(w) => Some(w),
            _ => None,
        })
    }

    /// Returns the rule-then constraint, if present.
    #[must_use]
    pub fn then(&self) -> Option<&ThenConstraint> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Then(t) => Some(t),
            _ => None,
        })
    }

    /// Returns the owns constraints in insertion order.
    #[must_use]
    pub fn owns(&self) -> Vec<&OwnsConstraint> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TypeConstraint::Owns(owns) => Some(owns),
                _ => None,
            })
            .collect()
    }

    /// Returns the plays constraints in insertion order.
    #[must_use]
    pub fn plays(&self) -> Vec<&PlaysConstraint> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TypeConstraint::Plays(plays) => Some(plays),
                _ => None,
            })
            .collect()
    }

    /// Returns the relates constraints in insertion order.
    #[must_use]
    pub fn relates(&self) -> Vec<&RelatesConstraint> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TypeConstraint::Relates(relates) => Some(relates),
                _ => None,
            })
            .collect()
    }

    /// Returns the variables referenced by the attached constraints.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.constraints
            .iter()
            .flat_map(TypeConstraint::variables)
            .collect()
    }

    // =========================================================================
    // Builder sugar
    // =========================================================================

    /// Adds a `sub` constraint.
    ///
    /// # Errors
    /// Returns an error if a sub constraint is already present.
    pub fn with_sub(self, label: impl Into<String>) -> Result<Self> {
        self.constrain(TypeConstraint::Sub(SubConstraint::from_label(label, false)))
    }

    /// Adds a `sub!` (direct supertype) constraint.
    ///
    /// # Errors
    /// Returns an error if a sub constraint is already present.
    pub fn with_sub_explicit(self, label: impl Into<String>) -> Result<Self> {
        self.constrain(TypeConstraint::Sub(SubConstraint::from_label(label, true)))
    }

    /// Adds an `abstract` constraint.
    ///
    /// # Errors
    /// Returns an error if an abstract constraint is already present.
    pub fn with_abstract(self) -> Result<Self> {
        self.constrain(TypeConstraint::Abstract(AbstractConstraint))
    }

    /// Adds a `value` constraint.
    ///
    /// # Errors
    /// Returns an error if a value-type constraint is already present.
    pub fn with_value_type(self, value_type: ValueType) -> Result<Self> {
        self.constrain(TypeConstraint::ValueType(ValueTypeConstraint::new(
            value_type,
        )))
    }

    /// Adds a `regex` constraint, compiling the pattern.
    ///
    /// # Errors
    /// Returns an error if the pattern is malformed or a regex constraint is
    /// already present.
    pub fn with_regex(self, pattern: &str) -> Result<Self> {
        self.constrain(TypeConstraint::Regex(RegexConstraint::new(pattern)?))
    }

    /// Adds an `owns` constraint.
    #[must_use]
    pub fn with_owns(self, label: impl Into<String>) -> Self {
        self.constrain_repeatable(TypeConstraint::Owns(OwnsConstraint::from_label(label, false)))
    }

    /// Adds an `owns ... @key` constraint.
    #[must_use]
    pub fn with_owns_key(self, label: impl Into<String>) -> Self {
        self.constrain_repeatable(TypeConstraint::Owns(OwnsConstraint::from_label(label, true)))
    }

    /// Adds an `owns ... as ...` constraint.
    #[must_use]
    pub fn with_owns_as(
        self,
        label: impl Into<String>,
        overridden: impl Into<String>,
    ) -> Self {
        self.constrain_repeatable(TypeConstraint::Owns(OwnsConstraint::from_label_overridden(
            label, overridden, false,
        )))
    }

    /// Adds a `plays` constraint with a scoped role.
    #[must_use]
    pub fn with_plays(self, relation: impl Into<String>, role: impl Into<String>) -> Self {
        self.constrain_repeatable(TypeConstraint::Plays(PlaysConstraint::from_scoped(
            relation, role,
        )))
    }

    /// Adds a `relates` constraint.
    #[must_use]
    pub fn with_relates(self, role: impl Into<String>) -> Self {
        self.constrain_repeatable(TypeConstraint::Relates(RelatesConstraint::from_label(role)))
    }

    /// Adds a `relates ... as ...` constraint.
    #[must_use]
    pub fn with_relates_as(
        self,
        role: impl Into<String>,
        overridden: impl Into<String>,
    ) -> Self {
        self.constrain_repeatable(TypeConstraint::Relates(RelatesConstraint::from_label_overridden(
            role, overridden,
        )))
    }

    /// Adds a rule `when` constraint.
    ///
    /// # Errors
    /// Returns an error if a when constraint is already present.
    pub fn with_when(self, when: Conjunction) -> Result<Self> {
        self.constrain(TypeConstraint::When(WhenConstraint::new(when)))
    }

    /// Adds a rule `then` constraint.
    ///
    /// # Errors
    /// Returns an error if a then constraint is already present.
    pub fn with_then(self, then: Conjunction) -> Result<Self> {
        self.constrain(TypeConstraint::Then(ThenConstraint::new(then)))
    }

    fn constrain_repeatable(self, constraint: TypeConstraint) -> Self {
        debug_assert!(!constraint.is_singular());
        match self.constrain(constraint) {
            Ok(var) => var,
            Err(_) => unreachable!("repeatable constraints cannot collide"),
        }
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reference.is_visible() {
            f.write_str(&self.reference.syntax())?;
            if !self.constraints.is_empty() {
                let rendered: Vec<String> =
                    self.constraints.iter().map(ToString::to_string).collect();
                write!(f, " {}", rendered.join(", "))?;
            }
            Ok(())
        } else if let Some(label) = self.label() {
            f.write_str(&label.scoped_label())?;
            let rest: Vec<String> = self
                .constraints
                .iter()
                .filter(|c| !matches!(c, TypeConstraint::Label(_)))
                .map(ToString::to_string)
                .collect();
            if !rest.is_empty() {
                write!(f, " {}", rest.join(", "))?;
            }
            Ok(())
        } else {
            // Only reached when debugging nested hidden variables
            f.write_str(&self.reference.syntax())
        }
    }
}

/// Creates a hidden type variable from a label.
pub(crate) fn hidden_type(label: impl Into<String>) -> TypeVariable {
    UnboundVariable::hidden().type_(label)
}

/// Creates a hidden type variable from a scoped label.
pub(crate) fn hidden_type_scoped(
    scope: impl Into<String>,
    label: impl Into<String>,
) -> TypeVariable {
    UnboundVariable::hidden().type_scoped(scope, label)
}
