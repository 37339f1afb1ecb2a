//! Stochastic shape grammars.
//!
//! A [`Grammar`] is a set of weighted rule variants. Several variants may
//! share a name; [`Grammar::pick`] chooses one of them with probability
//! proportional to its weight. Evaluating a grammar with an [`Interpreter`]
//! produces an ordered list of [`ShapeInstance`](crate::geom::ShapeInstance)s.

mod interpreter;
pub mod library;
pub mod transform;

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;

use crate::geom::Transform;

pub use interpreter::{
    DEFAULT_PROGRESS_INTERVAL, Evaluation, EvaluationOptions, EvaluationStats, Interpreter,
    evaluate,
};
pub use transform::{TransformOp, parse_transform};

/// Name of the rule every evaluation starts from.
pub const ENTRY_RULE: &str = "entry";

pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors raised while loading or evaluating a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("no rule named `{name}`{}", did_you_mean(.suggestion))]
    NoSuchRule {
        name: String,
        suggestion: Option<String>,
    },
    #[error("unrecognized transformation `{token}` at position {position} in `{spec}`")]
    InvalidTransformToken {
        token: String,
        position: usize,
        spec: String,
    },
    #[error("transformation `{token}` is missing an operand in `{spec}`")]
    MissingOperand { token: String, spec: String },
    #[error("transformation `{token}` has a non-numeric operand `{value}` in `{spec}`")]
    InvalidOperand {
        token: String,
        value: String,
        spec: String,
    },
    #[error("max_depth must be a positive integer")]
    InvalidMaxDepth,
    #[error("every variant of rule `{name}` has weight 0")]
    NoSelectableVariant { name: String },
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean `{s}`?)"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Push a frame for a variant of `rule`.
    Call { rule: String },
    /// Emit an instance of `shape`.
    Instance { shape: String },
}

/// One `call` or `instance` element with its transform already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub transform: Transform,
    pub count: usize,
}

impl Statement {
    pub fn call(rule: impl Into<String>, transforms: &str, count: usize) -> GrammarResult<Self> {
        Ok(Self {
            kind: StatementKind::Call { rule: rule.into() },
            transform: parse_transform(transforms)?,
            count,
        })
    }

    pub fn instance(shape: impl Into<String>, transforms: &str, count: usize) -> GrammarResult<Self> {
        Ok(Self {
            kind: StatementKind::Instance {
                shape: shape.into(),
            },
            transform: parse_transform(transforms)?,
            count,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleVariant {
    pub name: String,
    pub weight: u32,
    /// Local depth limit; the grammar's `max_depth` applies when unset.
    pub max_depth: Option<usize>,
    /// Rule to continue with once the local depth limit is reached.
    pub successor: Option<String>,
    pub statements: Vec<Statement>,
}

impl RuleVariant {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: 1,
            max_depth: None,
            successor: None,
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_successor(mut self, successor: impl Into<String>) -> Self {
        self.successor = Some(successor.into());
        self
    }

    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }
}

/// Read-only rule set shared by any number of evaluations.
#[derive(Debug, Clone)]
pub struct Grammar {
    max_depth: usize,
    variants: Vec<RuleVariant>,
    by_name: BTreeMap<String, Vec<usize>>,
}

impl Grammar {
    pub fn new(max_depth: usize) -> GrammarResult<Self> {
        if max_depth == 0 {
            return Err(GrammarError::InvalidMaxDepth);
        }
        Ok(Self {
            max_depth,
            variants: Vec::new(),
            by_name: BTreeMap::new(),
        })
    }

    /// Parse a `<rules>` XML document.
    pub fn from_xml(xml: &str) -> GrammarResult<Self> {
        crate::parse::grammar_xml::parse_str(xml)
    }

    /// Register a variant after all earlier variants of the same name.
    pub fn add_variant(&mut self, variant: RuleVariant) {
        let index = self.variants.len();
        self.by_name
            .entry(variant.name.clone())
            .or_default()
            .push(index);
        self.variants.push(variant);
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn variants(&self) -> &[RuleVariant] {
        &self.variants
    }

    /// Variants registered under `name`, in declaration order.
    pub fn variants_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a RuleVariant> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&i| &self.variants[i])
    }

    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// Weighted selection among the variants named `name`.
    ///
    /// Draws `n` uniformly from `[0, total)` and scans the variants in
    /// declaration order, subtracting each weight until `n` falls inside
    /// one. One draw is made even when only a single variant exists.
    pub fn pick<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> GrammarResult<&RuleVariant> {
        let indices = self
            .by_name
            .get(name)
            .ok_or_else(|| GrammarError::NoSuchRule {
                name: name.to_owned(),
                suggestion: self.closest_name(name),
            })?;

        let total: u64 = indices
            .iter()
            .map(|&i| u64::from(self.variants[i].weight))
            .sum();
        if total == 0 {
            return Err(GrammarError::NoSelectableVariant {
                name: name.to_owned(),
            });
        }

        let mut n = rng.random_range(0..total);
        for &i in indices {
            let weight = u64::from(self.variants[i].weight);
            if n < weight {
                return Ok(&self.variants[i]);
            }
            n -= weight;
        }
        Err(GrammarError::NoSelectableVariant {
            name: name.to_owned(),
        })
    }

    fn closest_name(&self, name: &str) -> Option<String> {
        self.by_name
            .keys()
            .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.clone())
    }
}

#[cfg(test)]
mod tests;
