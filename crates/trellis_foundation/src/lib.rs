//! Lexical vocabulary, error types, and literal values for Trellis.
//!
//! This crate provides:
//! - [`token`] - The closed keyword, comparator, and punctuation vocabularies
//! - [`Error`] - Categorized error types raised by AST construction
//! - [`Value`] - Typed literal values with canonical rendering
//!
//! Everything here is pure data with no I/O; the pattern algebra itself
//! lives in `trellis_pattern`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod token;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use token::{
    Command, Comparator, ComparatorFamily, ConstraintKeyword, Literal, Operator, Punctuation,
    Schema, ValueType,
};
pub use value::{Value, escape_regex, format_datetime, quote_string};
