//! Type-level constraints.
//!
//! Singular kinds: label, sub, abstract, value, regex, when, then.
//! Repeatable kinds: owns, plays, relates. Role types inside relates/plays
//! are hidden type variables carrying (possibly scoped) labels; relates
//! supports two-phase scoping because a role can be declared before its
//! relation type is known.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use trellis_foundation::{ConstraintKeyword, Error, Result, ValueType, escape_regex};

use crate::pattern::Conjunction;
use crate::type_variable::{TypeVariable, hidden_type, hidden_type_scoped};
use crate::variable::{UnboundVariable, Variable};

/// A constraint attachable to a type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeConstraint {
    /// `type person`
    Label(LabelConstraint),
    /// `sub entity`
    Sub(SubConstraint),
    /// `abstract`
    Abstract(AbstractConstraint),
    /// `value long`
    ValueType(ValueTypeConstraint),
    /// `regex "..."`
    Regex(RegexConstraint),
    /// `owns name`
    Owns(OwnsConstraint),
    /// `plays marriage:wife`
    Plays(PlaysConstraint),
    /// `relates wife`
    Relates(RelatesConstraint),
    /// `when { ...; }`
    When(WhenConstraint),
    /// `then { ...; }`
    Then(ThenConstraint),
}

impl TypeConstraint {
    /// Returns the keyword name of this constraint kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Label(_) => "type",
            Self::Sub(_) => "sub",
            Self::Abstract(_) => "abstract",
            Self::ValueType(_) => "value",
            Self::Regex(_) => "regex",
            Self::Owns(_) => "owns",
            Self::Plays(_) => "plays",
            Self::Relates(_) => "relates",
            Self::When(_) => "when",
            Self::Then(_) => "then",
        }
    }

    /// Returns true if at most one constraint of this kind may be attached
    /// to a variable.
    #[must_use]
    pub const fn is_singular(&self) -> bool {
        !matches!(self, Self::Owns(_) | Self::Plays(_) | Self::Relates(_))
    }

    /// Returns the variables this constraint references.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Self::Label(_)
            | Self::Abstract(_)
            | Self::ValueType(_)
            | Self::Regex(_)
            | Self::When(_)
            | Self::Then(_) => Vec::new(),
            Self::Sub(sub) => vec![Variable::Type(sub.supertype().clone())],
            Self::Owns(owns) => {
                let mut vars = vec![Variable::Type(owns.attribute().clone())];
                if let Some(overridden) = owns.overridden() {
                    vars.push(Variable::Type(overridden.clone()));
                }
                vars
            }
            Self::Plays(plays) => {
                let mut vars = vec![Variable::Type(plays.role().clone())];
                if let Some(relation) = plays.relation() {
                    vars.push(Variable::Type(relation.clone()));
                }
                if let Some(overridden) = plays.overridden() {
                    vars.push(Variable::Type(overridden.clone()));
                }
                vars
            }
            Self::Relates(relates) => {
                let mut vars = vec![Variable::Type(relates.role().clone())];
                if let Some(overridden) = relates.overridden() {
                    vars.push(Variable::Type(overridden.clone()));
                }
                vars
            }
        }
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(c) => c.fmt(f),
            Self::Sub(c) => c.fmt(f),
            Self::Abstract(c) => c.fmt(f),
            Self::ValueType(c) => c.fmt(f),
            Self::Regex(c) => c.fmt(f),
            Self::Owns(c) => c.fmt(f),
            Self::Plays(c) => c.fmt(f),
            Self::Relates(c) => c.fmt(f),
            Self::When(c) => c.fmt(f),
            Self::Then(c) => c.fmt(f),
        }
    }
}

/// A type label, optionally scoped to a relation (`marriage:wife`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelConstraint {
    scope: Option<String>,
    label: String,
}

impl LabelConstraint {
    /// Creates an unscoped label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            scope: None,
            label: label.into(),
        }
    }

    /// Creates a scoped label.
    #[must_use]
    pub fn scoped(scope: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            label: label.into(),
        }
    }

    /// Returns the label without its scope.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the scope, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns `scope:label`, or just the label when unscoped.
    #[must_use]
    pub fn scoped_label(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{scope}:{}", self.label),
            None => self.label.clone(),
        }
    }
}

impl fmt::Display for LabelConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            ConstraintKeyword::Type,
            self.scoped_label()
        )
    }
}

/// A supertype constraint: `sub entity` or `sub! entity`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubConstraint {
    supertype: TypeVariable,
    explicit: bool,
}

impl SubConstraint {
    /// Creates a sub constraint from a type label.
    #[must_use]
    pub fn from_label(label: impl Into<String>, explicit: bool) -> Self {
        Self {
            supertype: hidden_type(label),
            explicit,
        }
    }

    /// Creates a sub constraint from a scoped type label.
    #[must_use]
    pub fn from_scoped(
        scope: impl Into<String>,
        label: impl Into<String>,
        explicit: bool,
    ) -> Self {
        Self {
            supertype: hidden_type_scoped(scope, label),
            explicit,
        }
    }

    /// Creates a sub constraint from a type variable.
    #[must_use]
    pub fn from_var(supertype: UnboundVariable, explicit: bool) -> Self {
        Self {
            supertype: supertype.to_type(),
            explicit,
        }
    }

    /// Returns the supertype variable.
    #[must_use]
    pub const fn supertype(&self) -> &TypeVariable {
        &self.supertype
    }

    /// Returns true for `sub!` (direct supertype only).
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }
}

impl fmt::Display for SubConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.explicit {
            ConstraintKeyword::SubX
        } else {
            ConstraintKeyword::Sub
        };
        write!(f, "{keyword} {}", self.supertype)
    }
}

/// An abstractness marker: `abstract`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AbstractConstraint;

impl fmt::Display for AbstractConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ConstraintKeyword::Abstract.fmt(f)
    }
}

/// An attribute value-type constraint: `value long`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueTypeConstraint {
    value_type: ValueType,
}

impl ValueTypeConstraint {
    /// Creates a value-type constraint.
    #[must_use]
    pub const fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }

    /// Returns the value type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl fmt::Display for ValueTypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ConstraintKeyword::ValueType, self.value_type)
    }
}

/// A compiled regex constraint: `regex "..."`.
#[derive(Clone, Debug)]
pub struct RegexConstraint {
    regex: Regex,
}

impl RegexConstraint {
    /// Compiles a regex constraint.
    ///
    /// # Errors
    /// Returns an [`trellis_foundation::ErrorKind::InvalidRegex`] syntax
    /// error if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        match Regex::new(pattern) {
            Ok(regex) => Ok(Self { regex }),
            Err(err) => Err(Error::invalid_regex(pattern.to_string(), err.to_string())),
        }
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the compiled regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }
}

// Equality and hashing are over the source pattern; the compiled automaton
// is derived state.
impl PartialEq for RegexConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Eq for RegexConstraint {}

impl Hash for RegexConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern().hash(state);
    }
}

impl fmt::Display for RegexConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\"",
            ConstraintKeyword::Regex,
            escape_regex(self.pattern())
        )
    }
}

/// An attribute ownership constraint: `owns name as identifier @key`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnsConstraint {
    attribute: TypeVariable,
    overridden: Option<TypeVariable>,
    is_key: bool,
}

impl OwnsConstraint {
    /// Creates an owns constraint from an attribute type label.
    #[must_use]
    pub fn from_label(label: impl Into<String>, is_key: bool) -> Self {
        Self {
            attribute: hidden_type(label),
            overridden: None,
            is_key,
        }
    }

    /// Creates an owns constraint overriding an inherited attribute type.
    #[must_use]
    pub fn from_label_overridden(
        label: impl Into<String>,
        overridden: impl Into<String>,
        is_key: bool,
    ) -> Self {
        Self {
            attribute: hidden_type(label),
            overridden: Some(hidden_type(overridden)),
            is_key,
        }
    }

    /// Creates an owns constraint from an attribute type variable.
    #[must_use]
    pub fn from_var(attribute: UnboundVariable, is_key: bool) -> Self {
        Self {
            attribute: attribute.to_type(),
            overridden: None,
            is_key,
        }
    }

    /// Returns the owned attribute type.
    #[must_use]
    pub const fn attribute(&self) -> &TypeVariable {
        &self.attribute
    }

    /// Returns the overridden attribute type, if any.
    #[must_use]
    pub const fn overridden(&self) -> Option<&TypeVariable> {
        self.overridden.as_ref()
    }

    /// Returns true for key ownership (`@key`).
    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.is_key
    }
}

impl fmt::Display for OwnsConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ConstraintKeyword::Owns, self.attribute)?;
        if let Some(overridden) = &self.overridden {
            write!(f, " {} {overridden}", ConstraintKeyword::As)?;
        }
        if self.is_key {
            write!(f, " {}", ConstraintKeyword::Key)?;
        }
        Ok(())
    }
}

/// A role-playing constraint: `plays marriage:wife`.
///
/// The role type carries a scoped label; the relation type variable is
/// derived from the scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaysConstraint {
    role: TypeVariable,
    relation: Option<TypeVariable>,
    overridden: Option<TypeVariable>,
}

impl PlaysConstraint {
    /// Creates a plays constraint from a relation and role label.
    #[must_use]
    pub fn from_scoped(relation: impl Into<String>, role: impl Into<String>) -> Self {
        let relation = relation.into();
        Self {
            role: hidden_type_scoped(relation.clone(), role),
            relation: Some(hidden_type(relation)),
            overridden: None,
        }
    }

    /// Creates a plays constraint overriding an inherited role.
    #[must_use]
    pub fn from_scoped_overridden(
        relation: impl Into<String>,
        role: impl Into<String>,
        overridden: impl Into<String>,
    ) -> Self {
        let relation = relation.into();
        Self {
            role: hidden_type_scoped(relation.clone(), role),
            relation: Some(hidden_type(relation)),
            overridden: Some(hidden_type(overridden)),
        }
    }

    /// Creates a plays constraint from a role type variable.
    #[must_use]
    pub fn from_var(role: UnboundVariable) -> Self {
        Self {
            role: role.to_type(),
            relation: None,
            overridden: None,
        }
    }

    /// Returns the role type.
    #[must_use]
    pub const fn role(&self) -> &TypeVariable {
        &self.role
    }

    /// Returns the relation type derived from the role's scope, if any.
    #[must_use]
    pub const fn relation(&self) -> Option<&TypeVariable> {
        self.relation.as_ref()
    }

    /// Returns the overridden role type, if any.
    #[must_use]
    pub const fn overridden(&self) -> Option<&TypeVariable> {
        self.overridden.as_ref()
    }
}

impl fmt::Display for PlaysConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ConstraintKeyword::Plays, self.role)?;
        if let Some(overridden) = &self.overridden {
            write!(f, " {} {overridden}", ConstraintKeyword::As)?;
        }
        Ok(())
    }
}

/// A role-definition constraint: `relates wife as partner`.
///
/// The role is declared by its bare label; the owning relation's label,
/// once known, scopes the role via [`RelatesConstraint::with_scope`]. The
/// printed form always shows the bare role label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelatesConstraint {
    role: TypeVariable,
    overridden: Option<TypeVariable>,
}

impl RelatesConstraint {
    /// Creates a relates constraint from a role label.
    #[must_use]
    pub fn from_label(role: impl Into<String>) -> Self {
        Self {
            role: hidden_type(role),
            overridden: None,
        }
    }

    /// Creates a relates constraint overriding an inherited role.
    #[must_use]
    pub fn from_label_overridden(
        role: impl Into<String>,
        overridden: impl Into<String>,
    ) -> Self {
        Self {
            role: hidden_type(role),
            overridden: Some(hidden_type(overridden)),
        }
    }

    /// Creates a relates constraint from a role type variable.
    #[must_use]
    pub fn from_var(role: UnboundVariable) -> Self {
        Self {
            role: role.to_type(),
            overridden: None,
        }
    }

    /// Returns a copy with role labels scoped to the given relation label.
    ///
    /// Only roles declared by a plain, unscoped label are rebuilt; an
    /// already-scoped role (or a role referenced by variable) is left as is.
    #[must_use]
    pub fn with_scope(self, scope: &str) -> Self {
        Self {
            role: scope_role(self.role, scope),
            overridden: self.overridden.map(|o| scope_role(o, scope)),
        }
    }

    /// Returns the role type.
    #[must_use]
    pub const fn role(&self) -> &TypeVariable {
        &self.role
    }

    /// Returns the overridden role type, if any.
    #[must_use]
    pub const fn overridden(&self) -> Option<&TypeVariable> {
        self.overridden.as_ref()
    }
}

fn scope_role(role: TypeVariable, scope: &str) -> TypeVariable {
    let unscoped = role
        .label()
        .filter(|label| label.scope().is_none())
        .map(|label| label.label().to_string());
    match unscoped {
        Some(label) => hidden_type_scoped(scope, label),
        None => role,
    }
}

fn bare_role_syntax(role: &TypeVariable) -> String {
    role.label()
        .map_or_else(|| role.to_string(), |label| label.label().to_string())
}

impl fmt::Display for RelatesConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            ConstraintKeyword::Relates,
            bare_role_syntax(&self.role)
        )?;
        if let Some(overridden) = &self.overridden {
            write!(
                f,
                " {} {}",
                ConstraintKeyword::As,
                bare_role_syntax(overridden)
            )?;
        }
        Ok(())
    }
}

/// A rule body carried as a schema constraint: `when { ...; }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WhenConstraint {
    pattern: Conjunction,
}

impl WhenConstraint {
    /// Creates a when constraint.
    #[must_use]
    pub const fn new(pattern: Conjunction) -> Self {
        Self { pattern }
    }

    /// Returns the condition conjunction.
    #[must_use]
    pub const fn pattern(&self) -> &Conjunction {
        &self.pattern
    }
}

impl fmt::Display for WhenConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when {}", self.pattern)
    }
}

/// A rule conclusion carried as a schema constraint: `then { ...; }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThenConstraint {
    pattern: Conjunction,
}

impl ThenConstraint {
    /// Creates a then constraint.
    #[must_use]
    pub const fn new(pattern: Conjunction) -> Self {
        Self { pattern }
    }

    /// Returns the conclusion conjunction.
    #[must_use]
    pub const fn pattern(&self) -> &Conjunction {
        &self.pattern
    }
}

impl fmt::Display for ThenConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "then {}", self.pattern)
    }
}
