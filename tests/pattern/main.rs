//! Integration tests for the pattern layer
//!
//! Tests variables, constraints, the pattern algebra, rule validation, and
//! the query surface.

mod constraints;
mod patterns;
mod queries;
mod rules;
mod variables;
