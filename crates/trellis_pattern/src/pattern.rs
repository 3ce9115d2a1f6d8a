//! The pattern algebra.
//!
//! A [`Pattern`] is a matchable unit: a single variable's constraints, or a
//! boolean combination (conjunction, disjunction, negation) thereof. The
//! algebra provides contained-variable computation, disjunctive normal form
//! and negation-normal DNF derivation, and canonical rendering.
//!
//! Normal-form derivation is purely syntactic: the boolean distribution law
//! applied structurally, preserving left-to-right order and deduplicating
//! disjuncts by structural equality.

use std::fmt;

use trellis_foundation::{Error, Result};

use crate::variable::Variable;

/// A matchable unit in a query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// A single variable's constraints.
    Variable(Variable),
    /// All sub-patterns must hold.
    Conjunction(Conjunction),
    /// At least one branch must hold.
    Disjunction(Disjunction),
    /// The inner pattern must not hold.
    Negation(Negation),
}

impl Pattern {
    /// Returns the name of this pattern's kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Conjunction(_) => "conjunction",
            Self::Disjunction(_) => "disjunction",
            Self::Negation(_) => "negation",
        }
    }

    /// Returns true for variable patterns.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Returns true for conjunctions.
    #[must_use]
    pub const fn is_conjunction(&self) -> bool {
        matches!(self, Self::Conjunction(_))
    }

    /// Returns true for disjunctions.
    #[must_use]
    pub const fn is_disjunction(&self) -> bool {
        matches!(self, Self::Disjunction(_))
    }

    /// Returns true for negations.
    #[must_use]
    pub const fn is_negation(&self) -> bool {
        matches!(self, Self::Negation(_))
    }

    /// Narrows to the variable.
    ///
    /// # Errors
    /// Returns an invalid-cast error for any other pattern kind.
    pub fn as_variable(&self) -> Result<&Variable> {
        match self {
            Self::Variable(variable) => Ok(variable),
            other => Err(Error::invalid_cast(other.kind(), "variable")),
        }
    }

    /// Narrows to the conjunction.
    ///
    /// # Errors
    /// Returns an invalid-cast error for any other pattern kind.
    pub fn as_conjunction(&self) -> Result<&Conjunction> {
        match self {
            Self::Conjunction(conjunction) => Ok(conjunction),
            other => Err(Error::invalid_cast(other.kind(), "conjunction")),
        }
    }

    /// Narrows to the disjunction.
    ///
    /// # Errors
    /// Returns an invalid-cast error for any other pattern kind.
    pub fn as_disjunction(&self) -> Result<&Disjunction> {
        match self {
            Self::Disjunction(disjunction) => Ok(disjunction),
            other => Err(Error::invalid_cast(other.kind(), "disjunction")),
        }
    }

    /// Narrows to the negation.
    ///
    /// # Errors
    /// Returns an invalid-cast error for any other pattern kind.
    pub fn as_negation(&self) -> Result<&Negation> {
        match self {
            Self::Negation(negation) => Ok(negation),
            other => Err(Error::invalid_cast(other.kind(), "negation")),
        }
    }

    /// Returns the variables this pattern contributes, deduplicated in
    /// first-occurrence order.
    ///
    /// A variable contributes itself plus its constraint-referenced
    /// variables; a conjunction the union over its variable and nested
    /// conjunction children; a disjunction the intersection across its
    /// branches; a negation its inner pattern's variables.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Self::Variable(variable) => {
                let mut vars = Vec::new();
                push_unique(&mut vars, variable.clone());
                for nested in variable.variables() {
                    push_unique(&mut vars, nested);
                }
                vars
            }
            Self::Conjunction(conjunction) => conjunction.variables(),
            Self::Disjunction(disjunction) => disjunction.variables(),
            Self::Negation(negation) => negation.variables(),
        }
    }

    /// Derives the disjunctive normal form of this pattern.
    ///
    /// Negations are treated atomically; use [`Pattern::to_negation_dnf`]
    /// when negation structure matters.
    #[must_use]
    pub fn to_dnf(&self) -> Disjunction {
        match self {
            Self::Variable(_) | Self::Negation(_) => singleton_dnf(self.clone()),
            Self::Conjunction(conjunction) => conjunction.to_dnf(),
            Self::Disjunction(disjunction) => disjunction.to_dnf(),
        }
    }

    /// Derives the negation-normal DNF of this pattern.
    ///
    /// Distribution is as in [`Pattern::to_dnf`], but negations are pushed
    /// to wrap normalized inner forms: a double negation collapses to the
    /// inner pattern's negation-DNF, and any other negation becomes a
    /// one-element conjunction holding the negation of its inner pattern's
    /// negation-DNF.
    #[must_use]
    pub fn to_negation_dnf(&self) -> Disjunction {
        match self {
            Self::Variable(_) => singleton_dnf(self.clone()),
            Self::Conjunction(conjunction) => conjunction.to_negation_dnf(),
            Self::Disjunction(disjunction) => disjunction.to_negation_dnf(),
            Self::Negation(negation) => match negation.pattern() {
                // Double negation elimination
                Self::Negation(inner) => inner.pattern().to_negation_dnf(),
                inner => {
                    let mut normalized = inner.to_negation_dnf().into_patterns();
                    let wrapped = if normalized.len() == 1 {
                        normalized.remove(0)
                    } else {
                        Self::Disjunction(Disjunction::new(normalized))
                    };
                    singleton_dnf(Self::Negation(Negation::new(wrapped)))
                }
            },
        }
    }

    /// Returns the negations reachable without crossing a variable,
    /// stopping at each negation found.
    #[must_use]
    pub fn negations(&self) -> Vec<&Negation> {
        match self {
            Self::Variable(_) => Vec::new(),
            Self::Negation(negation) => vec![negation],
            Self::Conjunction(conjunction) => conjunction
                .patterns()
                .iter()
                .flat_map(Pattern::negations)
                .collect(),
            Self::Disjunction(disjunction) => disjunction
                .patterns()
                .iter()
                .flat_map(Pattern::negations)
                .collect(),
        }
    }

    /// Returns the disjunctions reachable without crossing a variable,
    /// stopping at each disjunction found.
    #[must_use]
    pub fn disjunctions(&self) -> Vec<&Disjunction> {
        match self {
            Self::Variable(_) => Vec::new(),
            Self::Disjunction(disjunction) => vec![disjunction],
            Self::Negation(negation) => negation.pattern().disjunctions(),
            Self::Conjunction(conjunction) => conjunction
                .patterns()
                .iter()
                .flat_map(Pattern::disjunctions)
                .collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(variable) => variable.fmt(f),
            Self::Conjunction(conjunction) => conjunction.fmt(f),
            Self::Disjunction(disjunction) => disjunction.fmt(f),
            Self::Negation(negation) => negation.fmt(f),
        }
    }
}

impl From<Variable> for Pattern {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<crate::type_variable::TypeVariable> for Pattern {
    fn from(variable: crate::type_variable::TypeVariable) -> Self {
        Self::Variable(Variable::Type(variable))
    }
}

impl From<crate::thing_variable::ThingVariable> for Pattern {
    fn from(variable: crate::thing_variable::ThingVariable) -> Self {
        Self::Variable(Variable::Thing(variable))
    }
}

impl From<Conjunction> for Pattern {
    fn from(conjunction: Conjunction) -> Self {
        Self::Conjunction(conjunction)
    }
}

impl From<Disjunction> for Pattern {
    fn from(disjunction: Disjunction) -> Self {
        Self::Disjunction(disjunction)
    }
}

impl From<Negation> for Pattern {
    fn from(negation: Negation) -> Self {
        Self::Negation(negation)
    }
}

fn push_unique(vars: &mut Vec<Variable>, var: Variable) {
    if !vars.contains(&var) {
        vars.push(var);
    }
}

fn singleton_dnf(pattern: Pattern) -> Disjunction {
    Disjunction::new(vec![Pattern::Conjunction(Conjunction::new(vec![pattern]))])
}

/// An ordered sequence of patterns that must all hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Conjunction {
    patterns: Vec<Pattern>,
}

impl Conjunction {
    /// Creates a conjunction over the given patterns.
    #[must_use]
    pub const fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Returns the sub-patterns in order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Returns the union of variables found by recursing into variable and
    /// nested conjunction children.
    ///
    /// Disjunction and negation children contribute nothing here; their
    /// bindings are not guaranteed by the conjunction itself.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = Vec::new();
        for pattern in &self.patterns {
            match pattern {
                Pattern::Variable(variable) => {
                    push_unique(&mut vars, variable.clone());
                    for nested in variable.variables() {
                        push_unique(&mut vars, nested);
                    }
                }
                Pattern::Conjunction(conjunction) => {
                    for var in conjunction.variables() {
                        push_unique(&mut vars, var);
                    }
                }
                Pattern::Disjunction(_) | Pattern::Negation(_) => {}
            }
        }
        vars
    }

    /// Derives the disjunctive normal form by cross-product distribution of
    /// each child's DNF disjuncts.
    #[must_use]
    pub fn to_dnf(&self) -> Disjunction {
        self.distribute(Pattern::to_dnf)
    }

    /// Derives the negation-normal DNF; see [`Pattern::to_negation_dnf`].
    #[must_use]
    pub fn to_negation_dnf(&self) -> Disjunction {
        self.distribute(Pattern::to_negation_dnf)
    }

    fn distribute(&self, derive: fn(&Pattern) -> Disjunction) -> Disjunction {
        let mut conjunct_lists: Vec<Vec<Pattern>> = vec![Vec::new()];
        for child in &self.patterns {
            let child_dnf = derive(child);
            let mut next = Vec::with_capacity(conjunct_lists.len() * child_dnf.patterns().len());
            for prefix in &conjunct_lists {
                for disjunct in child_dnf.patterns() {
                    let mut combined = prefix.clone();
                    match disjunct {
                        Pattern::Conjunction(conjunction) => {
                            combined.extend(conjunction.patterns().iter().cloned());
                        }
                        other => combined.push(other.clone()),
                    }
                    next.push(combined);
                }
            }
            conjunct_lists = next;
        }
        Disjunction::new(
            conjunct_lists
                .into_iter()
                .map(|patterns| Pattern::Conjunction(Self::new(patterns)))
                .collect(),
        )
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for pattern in &self.patterns {
            write!(f, "{pattern}; ")?;
        }
        f.write_str("}")
    }
}

/// A set of alternative patterns, insertion-ordered and duplicate-free.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Disjunction {
    patterns: Vec<Pattern>,
}

impl Disjunction {
    /// Creates a disjunction, dropping structurally equal duplicates and
    /// keeping first-occurrence order.
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        let mut deduped: Vec<Pattern> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if !deduped.contains(&pattern) {
                deduped.push(pattern);
            }
        }
        Self { patterns: deduped }
    }

    /// Returns the branches in insertion order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Consumes the disjunction, returning its branches.
    #[must_use]
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }

    /// Returns the intersection of the branches' variable sets: only
    /// variables bound in every branch are scoped after the disjunction.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        let mut branches = self.patterns.iter();
        let Some(first) = branches.next() else {
            return Vec::new();
        };
        let mut common = first.variables();
        for branch in branches {
            let branch_vars = branch.variables();
            common.retain(|var| branch_vars.contains(var));
        }
        common
    }

    /// Derives the disjunctive normal form: the flattened, deduplicated
    /// union of each branch's DNF disjuncts.
    #[must_use]
    pub fn to_dnf(&self) -> Disjunction {
        Self::new(
            self.patterns
                .iter()
                .flat_map(|pattern| pattern.to_dnf().into_patterns())
                .collect(),
        )
    }

    /// Derives the negation-normal DNF; see [`Pattern::to_negation_dnf`].
    #[must_use]
    pub fn to_negation_dnf(&self) -> Disjunction {
        Self::new(
            self.patterns
                .iter()
                .flat_map(|pattern| pattern.to_negation_dnf().into_patterns())
                .collect(),
        )
    }
}

impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let branches: Vec<String> = self
            .patterns
            .iter()
            .map(|pattern| match pattern {
                Pattern::Conjunction(conjunction) => conjunction.to_string(),
                other => format!("{{ {other} }}"),
            })
            .collect();
        f.write_str(&branches.join(" or "))
    }
}

/// A negated pattern: the inner pattern must not hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Negation {
    pattern: Box<Pattern>,
}

impl Negation {
    /// Creates a negation of the given pattern.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern: Box::new(pattern),
        }
    }

    /// Returns the negated pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the inner pattern's variables.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.pattern.variables()
    }
}

impl fmt::Display for Negation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern.as_ref() {
            Pattern::Conjunction(conjunction) => write!(f, "not {conjunction}"),
            other => write!(f, "not {{ {other} }}"),
        }
    }
}
