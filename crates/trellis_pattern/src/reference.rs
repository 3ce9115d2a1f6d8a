//! Variable identity.
//!
//! A [`Reference`] is a variable's binding name: user-supplied (`$x`),
//! anonymous (`$_`), or derived from a type label for the hidden type
//! variables the builders create internally. Two references are equal iff
//! they have the same variant and the same underlying name.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use trellis_foundation::{Error, Result};

/// The pattern user-supplied variable names must match.
pub const VARIABLE_NAME_PATTERN: &str = "^[a-zA-Z0-9][a-zA-Z0-9_-]*$";

fn name_validator() -> &'static Regex {
    static VALIDATOR: OnceLock<Regex> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        Regex::new(VARIABLE_NAME_PATTERN).expect("variable name pattern is valid")
    })
}

/// A variable's binding identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A user-supplied name, stable across a query.
    Named(String),
    /// A system-generated binding with no user-visible name.
    Anonymous {
        /// Whether the variable was written by the user (`$_`) or created
        /// internally by a builder.
        visible: bool,
    },
    /// An identity derived from a type label, used for hidden type
    /// variables.
    Label(String),
}

impl Reference {
    /// Creates a named reference, validating the name.
    ///
    /// # Errors
    /// Returns [`trellis_foundation::ErrorKind::InvalidVariableName`] if the
    /// name does not match [`VARIABLE_NAME_PATTERN`].
    pub fn named(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !name_validator().is_match(&name) {
            return Err(Error::invalid_variable_name(name, VARIABLE_NAME_PATTERN));
        }
        Ok(Self::Named(name))
    }

    /// Creates an anonymous reference.
    #[must_use]
    pub const fn anonymous(visible: bool) -> Self {
        Self::Anonymous { visible }
    }

    /// Creates a label-derived reference for a hidden type variable.
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }

    /// Returns true for user-supplied names.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Returns true for anonymous references.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    /// Returns true for label-derived references.
    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }

    /// Returns true if this reference is printed in canonical output.
    ///
    /// Named references are always visible; anonymous references only when
    /// user-written; label references never.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        match self {
            Self::Named(_) => true,
            Self::Anonymous { visible } => *visible,
            Self::Label(_) => false,
        }
    }

    /// Returns the name of a named reference.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the source-syntax form of this reference.
    ///
    /// Anonymous references render as `$_` regardless of any generated
    /// identity; label references render `$_label` (debug form, never
    /// printed in canonical output).
    #[must_use]
    pub fn syntax(&self) -> String {
        match self {
            Self::Named(name) => format!("${name}"),
            Self::Anonymous { .. } => "$_".to_string(),
            Self::Label(label) => format!("$_{label}"),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.syntax())
    }
}
