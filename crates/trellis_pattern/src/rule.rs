//! Rule definitions.
//!
//! A rule pairs a `when` condition conjunction with a `then` conclusion
//! variable. Construction is staged: label, then `when`, then `then`; the
//! final step runs the whole validation contract and yields an immutable
//! [`Rule`]. There is no path back from a complete rule to the builder
//! stages.

use std::fmt;

use trellis_foundation::{Error, ErrorKind, Result};

use crate::pattern::{Conjunction, Pattern};
use crate::reference::Reference;
use crate::thing_variable::ThingVariable;

/// A named `when`/`then` rule definition, validated at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    label: String,
    when: Conjunction,
    then: ThingVariable,
}

impl Rule {
    /// Starts building a rule with the given label.
    #[must_use]
    pub fn builder(label: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            label: label.into(),
        }
    }

    /// Creates a rule, running the full validation contract.
    ///
    /// # Errors
    /// Returns a rule-validation error (carrying the label) when:
    /// - `when` contains no patterns;
    /// - `when` nests a negation inside another negation;
    /// - `when` contains a disjunction;
    /// - `then` is not exactly one `has`, nor an `isa` plus a relation;
    /// - `then`'s `has` names both an attribute type and a named variable;
    /// - `then` uses a named variable that `when` does not bind.
    pub fn new(label: impl Into<String>, when: Conjunction, then: ThingVariable) -> Result<Self> {
        let label = label.into();
        validate_when(&label, &when)?;
        validate_then(&label, &when, &then)?;
        Ok(Self { label, when, then })
    }

    /// Returns the rule's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the condition conjunction.
    #[must_use]
    pub const fn when(&self) -> &Conjunction {
        &self.when
    }

    /// Returns the conclusion variable.
    #[must_use]
    pub const fn then(&self) -> &ThingVariable {
        &self.then
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule {}: when {} then {{ {}; }}",
            self.label, self.when, self.then
        )
    }
}

/// The label-only stage of rule construction.
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    label: String,
}

impl RuleBuilder {
    /// Supplies the `when` conjunction, producing an incomplete rule.
    #[must_use]
    pub fn when(self, when: Conjunction) -> IncompleteRule {
        IncompleteRule {
            label: self.label,
            when,
        }
    }
}

/// A rule with a label and `when` but no `then` yet.
///
/// This is the only intermediate state; supplying `then` validates and
/// completes the rule in one step.
#[derive(Clone, Debug)]
pub struct IncompleteRule {
    label: String,
    when: Conjunction,
}

impl IncompleteRule {
    /// Supplies the conclusion, validating and completing the rule.
    ///
    /// # Errors
    /// See [`Rule::new`].
    pub fn then(self, then: ThingVariable) -> Result<Rule> {
        Rule::new(self.label, self.when, then)
    }
}

fn validate_when(label: &str, when: &Conjunction) -> Result<()> {
    if when.patterns().is_empty() {
        return Err(Error::new(ErrorKind::RuleWhenMissingPatterns {
            label: label.to_string(),
        }));
    }
    let negations: Vec<_> = when
        .patterns()
        .iter()
        .flat_map(Pattern::negations)
        .collect();
    if negations
        .iter()
        .any(|negation| !negation.pattern().negations().is_empty())
    {
        return Err(Error::new(ErrorKind::RuleWhenNestedNegation {
            label: label.to_string(),
        }));
    }
    if when
        .patterns()
        .iter()
        .any(|pattern| !pattern.disjunctions().is_empty())
    {
        return Err(Error::new(ErrorKind::RuleWhenContainsDisjunction {
            label: label.to_string(),
        }));
    }
    Ok(())
}

fn validate_then(label: &str, when: &Conjunction, then: &ThingVariable) -> Result<()> {
    // the conclusion is either one has, or an isa plus a relation
    let count = then.constraint_count();
    let shape_ok = (count == 1 && then.has().len() == 1)
        || (count == 2 && then.relation().is_some() && then.isa().is_some());
    if !shape_ok {
        return Err(Error::new(ErrorKind::RuleThenMalformed {
            label: label.to_string(),
            then: then.to_string(),
        }));
    }

    // a has conclusion cannot assign both an attribute type and a named variable
    if let [has] = then.has() {
        if has.type_label().is_some() && has.attribute().reference().is_named() {
            return Err(Error::new(ErrorKind::RuleThenAmbiguousHas {
                label: label.to_string(),
                then: then.to_string(),
            }));
        }
    }

    // every named variable of the conclusion must be bound in the condition
    let mut then_references: Vec<Reference> = Vec::new();
    if then.reference().is_named() {
        then_references.push(then.reference().clone());
    }
    for variable in then.variables() {
        if variable.is_named() {
            then_references.push(variable.reference().clone());
        }
    }

    let when_references: Vec<Reference> = when
        .variables()
        .iter()
        .filter(|variable| variable.is_named())
        .map(|variable| variable.reference().clone())
        .collect();

    if then_references
        .iter()
        .any(|reference| !when_references.contains(reference))
    {
        return Err(Error::new(ErrorKind::RuleThenUnboundVariable {
            label: label.to_string(),
        }));
    }
    Ok(())
}
