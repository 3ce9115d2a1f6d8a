//! Definition and insertion queries.
//!
//! The query surface carried by the core: `define` over type variables and
//! rules, and `insert` over instance variables. Both validate non-emptiness
//! at construction and render the canonical multi-line form.

use std::fmt;

use trellis_foundation::{Command, Error, Result};

use crate::rule::Rule;
use crate::thing_variable::ThingVariable;
use crate::type_variable::TypeVariable;

/// Something definable in a schema: a type variable or a rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Definable {
    /// A type definition.
    Type(TypeVariable),
    /// A rule definition.
    Rule(Rule),
}

impl From<TypeVariable> for Definable {
    fn from(variable: TypeVariable) -> Self {
        Self::Type(variable)
    }
}

impl From<Rule> for Definable {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl fmt::Display for Definable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(variable) => variable.fmt(f),
            Self::Rule(rule) => rule.fmt(f),
        }
    }
}

/// A `define` query over a non-empty list of definables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DefineQuery {
    definables: Vec<Definable>,
}

impl DefineQuery {
    /// Creates a define query.
    ///
    /// # Errors
    /// Returns a missing-patterns error if the list is empty.
    pub fn new(definables: Vec<Definable>) -> Result<Self> {
        if definables.is_empty() {
            return Err(Error::missing_patterns());
        }
        Ok(Self { definables })
    }

    /// Returns the definables in order.
    #[must_use]
    pub fn definables(&self) -> &[Definable] {
        &self.definables
    }
}

impl fmt::Display for DefineQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, Command::Define, &self.definables)
    }
}

/// An `insert` query over a non-empty list of instance variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InsertQuery {
    variables: Vec<ThingVariable>,
}

impl InsertQuery {
    /// Creates an insert query.
    ///
    /// # Errors
    /// Returns a missing-patterns error if the list is empty.
    pub fn new(variables: Vec<ThingVariable>) -> Result<Self> {
        if variables.is_empty() {
            return Err(Error::missing_patterns());
        }
        Ok(Self { variables })
    }

    /// Returns the inserted variables in order.
    #[must_use]
    pub fn variables(&self) -> &[ThingVariable] {
        &self.variables
    }
}

impl fmt::Display for InsertQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, Command::Insert, &self.variables)
    }
}

fn write_query<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    command: Command,
    items: &[T],
) -> fmt::Result {
    write!(f, "{command}")?;
    if items.len() > 1 {
        writeln!(f)?;
    } else {
        write!(f, " ")?;
    }
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    write!(f, "{};", rendered.join(";\n"))
}
