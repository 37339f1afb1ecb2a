//! Deserialization of `<rules>` grammar documents.

use quick_xml::de::from_str;
use serde::Deserialize;

use crate::grammar::{Grammar, GrammarError, GrammarResult, RuleVariant, Statement};

/// Parse a grammar document.
///
/// Transform specs are parsed here, so a malformed spec is reported at load
/// time even if its statement would never be reached. Unknown rule names are
/// only reported when evaluation selects them.
pub fn parse_str(input: &str) -> GrammarResult<Grammar> {
    let document: RulesDocument = from_str(input)?;

    let max_depth = document.max_depth.ok_or(GrammarError::MissingAttribute {
        element: "rules",
        attribute: "max_depth",
    })?;
    let max_depth = usize::try_from(max_depth).map_err(|_| GrammarError::InvalidMaxDepth)?;
    let mut grammar = Grammar::new(max_depth)?;

    for rule in document.rules {
        grammar.add_variant(build_variant(rule)?);
    }

    log::debug!(
        "loaded grammar: {} variants, {} rule names, max_depth {}",
        grammar.variants().len(),
        grammar.rule_names().len(),
        grammar.max_depth()
    );
    Ok(grammar)
}

fn build_variant(rule: RuleXml) -> GrammarResult<RuleVariant> {
    let max_depth = rule
        .max_depth
        .map(|depth| usize::try_from(depth).map_err(|_| GrammarError::InvalidMaxDepth))
        .transpose()?;

    let mut variant = RuleVariant {
        name: rule.name,
        weight: rule.weight.unwrap_or(1),
        max_depth,
        successor: rule.successor,
        statements: Vec::with_capacity(rule.statements.len()),
    };

    for statement in rule.statements {
        let statement = match statement {
            StatementXml::Call(call) => {
                let target = call.rule.ok_or(GrammarError::MissingAttribute {
                    element: "call",
                    attribute: "rule",
                })?;
                Statement::call(target, &call.transforms, call.count.unwrap_or(1))?
            }
            StatementXml::Instance(instance) => {
                let shape = instance.shape.ok_or(GrammarError::MissingAttribute {
                    element: "instance",
                    attribute: "shape",
                })?;
                Statement::instance(shape, &instance.transforms, instance.count.unwrap_or(1))?
            }
        };
        variant.statements.push(statement);
    }

    Ok(variant)
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default, rename = "@max_depth")]
    max_depth: Option<i64>,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleXml>,
}

#[derive(Debug, Deserialize)]
struct RuleXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(default, rename = "@weight")]
    weight: Option<u32>,
    #[serde(default, rename = "@max_depth")]
    max_depth: Option<i64>,
    #[serde(default, rename = "@successor")]
    successor: Option<String>,
    #[serde(default, rename = "$value")]
    statements: Vec<StatementXml>,
}

#[derive(Debug, Deserialize)]
enum StatementXml {
    #[serde(rename = "call")]
    Call(CallXml),
    #[serde(rename = "instance", alias = "instantiate")]
    Instance(InstanceXml),
}

#[derive(Debug, Deserialize)]
struct CallXml {
    #[serde(default, rename = "@rule")]
    rule: Option<String>,
    #[serde(default, rename = "@transforms")]
    transforms: String,
    #[serde(default, rename = "@count")]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct InstanceXml {
    #[serde(default, rename = "@shape")]
    shape: Option<String>,
    #[serde(default, rename = "@transforms")]
    transforms: String,
    #[serde(default, rename = "@count")]
    count: Option<usize>,
}
