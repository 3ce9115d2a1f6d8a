//! Instance-level constraints.
//!
//! Singular kinds: iid, isa, inequality, value, relation. The repeatable
//! kind is `has`. A relation constraint owns an ordered role-player list and
//! a scope (the relation's type label) that may arrive after the players
//! do; see [`RelationConstraint::with_scope`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use trellis_foundation::{Comparator, ComparatorFamily, ConstraintKeyword, Error, Result, Value};

use crate::constraint::type_::LabelConstraint;
use crate::thing_variable::ThingVariable;
use crate::type_variable::{TypeVariable, hidden_type, hidden_type_scoped};
use crate::variable::{UnboundVariable, Variable};

/// A constraint attachable to an instance variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ThingConstraint {
    /// `iid 0x1a2f`
    Iid(IidConstraint),
    /// `isa person`
    Isa(IsaConstraint),
    /// `!= $x`
    Neq(NeqConstraint),
    /// `= 42`, `> 42`, `contains "a"`, `like "..."`
    Value(ValueConstraint),
    /// `(wife: $x, husband: $y)`
    Relation(RelationConstraint),
    /// `has name "alice"`
    Has(HasConstraint),
}

impl ThingConstraint {
    /// Returns the keyword name of this constraint kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Iid(_) => "iid",
            Self::Isa(_) => "isa",
            Self::Neq(_) => "neq",
            Self::Value(_) => "value",
            Self::Relation(_) => "relation",
            Self::Has(_) => "has",
        }
    }

    /// Returns true if at most one constraint of this kind may be attached
    /// to a variable.
    #[must_use]
    pub const fn is_singular(&self) -> bool {
        !matches!(self, Self::Has(_))
    }

    /// Returns the variables this constraint references.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Self::Iid(_) => Vec::new(),
            Self::Isa(isa) => isa.variables(),
            Self::Neq(neq) => neq.variables(),
            Self::Value(value) => value.variables(),
            Self::Relation(relation) => relation.variables(),
            Self::Has(has) => has.variables(),
        }
    }
}

impl fmt::Display for ThingConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iid(c) => c.fmt(f),
            Self::Isa(c) => c.fmt(f),
            Self::Neq(c) => c.fmt(f),
            Self::Value(c) => c.fmt(f),
            Self::Relation(c) => c.fmt(f),
            Self::Has(c) => c.fmt(f),
        }
    }
}

/// The pattern IID literals must match.
pub const IID_PATTERN: &str = "^0x[0-9a-f]+$";

fn iid_validator() -> &'static Regex {
    static VALIDATOR: OnceLock<Regex> = OnceLock::new();
    VALIDATOR.get_or_init(|| Regex::new(IID_PATTERN).expect("IID pattern is valid"))
}

/// A concept identity constraint: `iid 0x1a2f`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IidConstraint {
    iid: String,
}

impl IidConstraint {
    /// Creates an IID constraint, validating the literal.
    ///
    /// # Errors
    /// Returns an error if the literal does not match [`IID_PATTERN`].
    pub fn new(iid: impl Into<String>) -> Result<Self> {
        let iid = iid.into();
        if !iid_validator().is_match(&iid) {
            return Err(Error::invalid_iid(iid, IID_PATTERN));
        }
        Ok(Self { iid })
    }

    /// Returns the IID literal.
    #[must_use]
    pub fn iid(&self) -> &str {
        &self.iid
    }
}

impl fmt::Display for IidConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ConstraintKeyword::Iid, self.iid)
    }
}

/// A type constraint on an instance: `isa person` or `isa! person`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IsaConstraint {
    type_: TypeVariable,
    explicit: bool,
}

impl IsaConstraint {
    /// Creates an isa constraint from a type label.
    #[must_use]
    pub fn from_label(label: impl Into<String>, explicit: bool) -> Self {
        Self {
            type_: hidden_type(label),
            explicit,
        }
    }

    /// Creates an isa constraint from a type variable.
    #[must_use]
    pub fn from_var(type_: UnboundVariable, explicit: bool) -> Self {
        Self {
            type_: type_.to_type(),
            explicit,
        }
    }

    /// Returns the type variable.
    #[must_use]
    pub const fn type_(&self) -> &TypeVariable {
        &self.type_
    }

    /// Returns the type label, when the type is referenced by label.
    #[must_use]
    pub fn type_label(&self) -> Option<&str> {
        self.type_.label().map(LabelConstraint::label)
    }

    /// Returns true for `isa!` (direct type only).
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub(crate) fn variables(&self) -> Vec<Variable> {
        vec![Variable::Type(self.type_.clone())]
    }
}

impl fmt::Display for IsaConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.explicit {
            ConstraintKeyword::IsaX
        } else {
            ConstraintKeyword::Isa
        };
        write!(f, "{keyword} {}", self.type_)
    }
}

/// An inequality constraint between instances: `!= $x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NeqConstraint {
    variable: Box<ThingVariable>,
}

impl NeqConstraint {
    /// Creates an inequality constraint against another variable.
    #[must_use]
    pub fn from_var(variable: UnboundVariable) -> Self {
        Self {
            variable: Box::new(variable.to_thing()),
        }
    }

    /// Returns the compared variable.
    #[must_use]
    pub fn variable(&self) -> &ThingVariable {
        &self.variable
    }

    pub(crate) fn variables(&self) -> Vec<Variable> {
        vec![Variable::Thing((*self.variable).clone())]
    }
}

impl fmt::Display for NeqConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            Comparator::Neq,
            self.variable.reference().syntax()
        )
    }
}

/// A value constraint on an attribute: an assignment or a comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueConstraint {
    operation: ValueOperation,
}

impl ValueConstraint {
    /// Creates a value constraint.
    #[must_use]
    pub const fn new(operation: ValueOperation) -> Self {
        Self { operation }
    }

    /// Returns the value operation.
    #[must_use]
    pub const fn operation(&self) -> &ValueOperation {
        &self.operation
    }

    pub(crate) fn variables(&self) -> Vec<Variable> {
        self.operation.variables()
    }
}

impl fmt::Display for ValueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.operation.fmt(f)
    }
}

/// The right-hand side of a value operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A literal value.
    Value(Value),
    /// Another variable.
    Variable(Box<ThingVariable>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => value.fmt(f),
            Self::Variable(variable) => f.write_str(&variable.reference().syntax()),
        }
    }
}

/// A value assignment or comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueOperation {
    /// A bare value to assert or insert: prints just the value.
    Assignment(Value),
    /// A comparison: prints `<comparator> <operand>`.
    Comparison {
        /// The comparator.
        comparator: Comparator,
        /// The right-hand operand.
        operand: Operand,
    },
}

impl ValueOperation {
    /// Creates an assignment operation.
    #[must_use]
    pub fn assign(value: impl Into<Value>) -> Self {
        Self::Assignment(value.into())
    }

    /// Creates a comparison operation, validating operand compatibility.
    ///
    /// # Errors
    /// Returns an invalid-cast error when the comparator cannot take the
    /// operand: `like` requires a string pattern; `contains` requires a
    /// string or a variable.
    pub fn comparison(comparator: Comparator, operand: Operand) -> Result<Self> {
        let rejected = match (&operand, comparator.family()) {
            (Operand::Variable(_), _) if !comparator.accepts_variable() => {
                Some("variable operand")
            }
            (Operand::Value(value), ComparatorFamily::SubString | ComparatorFamily::Pattern)
                if value.as_str().is_none() =>
            {
                Some(value.value_type().as_str())
            }
            _ => None,
        };
        if let Some(from) = rejected {
            return Err(Error::invalid_cast(from, comparator.as_str()));
        }
        Ok(Self::Comparison {
            comparator,
            operand,
        })
    }

    /// Returns the effective comparator (assignments compare with `=`).
    #[must_use]
    pub const fn comparator(&self) -> Comparator {
        match self {
            Self::Assignment(_) => Comparator::Eq,
            Self::Comparison { comparator, .. } => *comparator,
        }
    }

    /// Returns true for assignments.
    #[must_use]
    pub const fn is_assignment(&self) -> bool {
        matches!(self, Self::Assignment(_))
    }

    fn variables(&self) -> Vec<Variable> {
        match self {
            Self::Comparison {
                operand: Operand::Variable(variable),
                ..
            } => vec![Variable::Thing((**variable).clone())],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ValueOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignment(value) => value.fmt(f),
            Self::Comparison {
                comparator: Comparator::Like,
                operand: Operand::Value(Value::String(pattern)),
            } => {
                write!(
                    f,
                    "{} \"{}\"",
                    Comparator::Like,
                    trellis_foundation::escape_regex(pattern)
                )
            }
            Self::Comparison {
                comparator,
                operand,
            } => write!(f, "{comparator} {operand}"),
        }
    }
}

/// A relation's role-player tuple: `(wife: $x, husband: $y)`.
///
/// The scope is the relation's type label. It may be absent while the
/// pattern is under construction and is supplied exactly once, by the
/// enclosing variable's `isa`; players added afterwards are scoped on
/// entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationConstraint {
    scope: Option<String>,
    role_players: Vec<RolePlayer>,
}

impl RelationConstraint {
    pub(crate) const fn empty() -> Self {
        Self {
            scope: None,
            role_players: Vec::new(),
        }
    }

    /// Creates a relation constraint with one role player.
    #[must_use]
    pub fn of(role_player: RolePlayer) -> Self {
        Self {
            scope: None,
            role_players: vec![role_player],
        }
    }

    /// Creates a relation constraint from a role-player list.
    #[must_use]
    pub fn new(role_players: Vec<RolePlayer>) -> Self {
        Self {
            scope: None,
            role_players,
        }
    }

    /// Returns a copy with the given role player appended.
    ///
    /// If the scope is already known the new player's role is scoped on
    /// entry.
    #[must_use]
    pub fn with_player(mut self, role_player: RolePlayer) -> Self {
        let role_player = match &self.scope {
            Some(scope) => role_player.scoped(scope),
            None => role_player,
        };
        self.role_players.push(role_player);
        self
    }

    /// Returns a copy scoped to the given relation label.
    ///
    /// Applies only when no scope is set yet; each role declared by a plain
    /// label is rebuilt as `scope:role`. Re-application is a no-op.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        if self.scope.is_some() {
            return self;
        }
        self.role_players = self
            .role_players
            .into_iter()
            .map(|rp| rp.scoped(scope))
            .collect();
        self.scope = Some(scope.to_string());
        self
    }

    /// Returns true once the relation's type label is known.
    #[must_use]
    pub const fn has_scope(&self) -> bool {
        self.scope.is_some()
    }

    /// Returns the scope, if known.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns the role players in insertion order.
    #[must_use]
    pub fn role_players(&self) -> &[RolePlayer] {
        &self.role_players
    }

    pub(crate) fn variables(&self) -> Vec<Variable> {
        let mut vars = Vec::new();
        for rp in &self.role_players {
            if let Some(role) = rp.role_type() {
                vars.push(Variable::Type(role.clone()));
            }
            vars.push(Variable::Thing(rp.player().clone()));
        }
        vars
    }
}

impl fmt::Display for RelationConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let players: Vec<String> = self.role_players.iter().map(ToString::to_string).collect();
        write!(f, "({})", players.join(", "))
    }
}

/// A (role, player) pair inside a relation constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RolePlayer {
    role_type: Option<TypeVariable>,
    player: ThingVariable,
}

impl RolePlayer {
    /// Creates an untyped role player.
    #[must_use]
    pub fn new(player: UnboundVariable) -> Self {
        Self {
            role_type: None,
            player: player.to_thing(),
        }
    }

    /// Creates a role player with a role label.
    #[must_use]
    pub fn with_role(role: impl Into<String>, player: UnboundVariable) -> Self {
        Self {
            role_type: Some(hidden_type(role)),
            player: player.to_thing(),
        }
    }

    /// Creates a role player with a role type variable.
    #[must_use]
    pub fn with_role_var(role: UnboundVariable, player: UnboundVariable) -> Self {
        Self {
            role_type: Some(role.to_type()),
            player: player.to_thing(),
        }
    }

    pub(crate) fn scoped(self, scope: &str) -> Self {
        let role_type = self.role_type.map(|role| {
            let unscoped = role
                .label()
                .filter(|label| label.scope().is_none())
                .map(|label| label.label().to_string());
            match unscoped {
                Some(label) => hidden_type_scoped(scope, label),
                None => role,
            }
        });
        Self {
            role_type,
            player: self.player,
        }
    }

    /// Returns the role type, if declared.
    #[must_use]
    pub const fn role_type(&self) -> Option<&TypeVariable> {
        self.role_type.as_ref()
    }

    /// Returns the player variable.
    #[must_use]
    pub const fn player(&self) -> &ThingVariable {
        &self.player
    }
}

impl fmt::Display for RolePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(role) = &self.role_type {
            write!(f, "{role}: ")?;
        }
        self.player.fmt(f)
    }
}

/// An attribute-ownership assertion: `has name "alice"` / `has name $n`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HasConstraint {
    type_: Option<TypeVariable>,
    attribute: Box<ThingVariable>,
}

impl HasConstraint {
    /// Creates a has constraint from an attribute type and a value.
    #[must_use]
    pub fn from_value(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            type_: Some(hidden_type(label)),
            attribute: Box::new(UnboundVariable::hidden().assign(value)),
        }
    }

    /// Creates a has constraint from an attribute type and a value
    /// operation: `has age > 30`.
    #[must_use]
    pub fn from_operation(label: impl Into<String>, operation: ValueOperation) -> Self {
        Self {
            type_: Some(hidden_type(label)),
            attribute: Box::new(
                UnboundVariable::hidden()
                    .constrain_thing(ThingConstraint::Value(ValueConstraint::new(operation))),
            ),
        }
    }

    /// Creates a has constraint from an attribute type and a variable.
    #[must_use]
    pub fn from_var(label: impl Into<String>, attribute: UnboundVariable) -> Self {
        Self {
            type_: Some(hidden_type(label)),
            attribute: Box::new(attribute.to_thing()),
        }
    }

    /// Creates a has constraint with only an attribute variable.
    #[must_use]
    pub fn from_attribute(attribute: UnboundVariable) -> Self {
        Self {
            type_: None,
            attribute: Box::new(attribute.to_thing()),
        }
    }

    /// Returns the attribute type label, if declared.
    #[must_use]
    pub fn type_label(&self) -> Option<&str> {
        self.type_
            .as_ref()
            .and_then(TypeVariable::label)
            .map(LabelConstraint::label)
    }

    /// Returns the attribute variable.
    #[must_use]
    pub fn attribute(&self) -> &ThingVariable {
        &self.attribute
    }

    pub(crate) fn variables(&self) -> Vec<Variable> {
        vec![Variable::Thing((*self.attribute).clone())]
    }
}

impl fmt::Display for HasConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ConstraintKeyword::Has)?;
        if let Some(label) = self.type_label() {
            write!(f, " {label}")?;
        }
        if self.attribute.reference().is_visible() {
            write!(f, " {}", self.attribute.reference().syntax())
        } else if let Some(value) = self.attribute.value() {
            write!(f, " {value}")
        } else {
            Ok(())
        }
    }
}
