//! Query evaluation for the in-memory store
//!
//! Supports the subset of Cosmos DB SQL that point-style repositories use:
//!
//! ```text
//! SELECT * FROM c [WHERE c.field = <literal|@param> [AND c.a.b = ...]]
//! ```
//!
//! Literals are single- or double-quoted strings, numbers, `true`, `false`
//! and `null`.

use crate::domain::QuerySpec;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static SELECT_RE: OnceLock<Regex> = OnceLock::new();
static CONDITION_RE: OnceLock<Regex> = OnceLock::new();
static AND_RE: OnceLock<Regex> = OnceLock::new();

fn select_re() -> &'static Regex {
    SELECT_RE.get_or_init(|| {
        Regex::new(r"(?is)^\s*SELECT\s+\*\s+FROM\s+(\w+)(?:\s+WHERE\s+(.+?))?\s*;?\s*$")
            .expect("valid select regex")
    })
}

/// One leading `alias.path = operand`; quoted operands may hold spaces and `AND`
fn condition_re() -> &'static Regex {
    CONDITION_RE.get_or_init(|| {
        Regex::new(
            r#"^(\w+)\.(\w+(?:\.\w+)*)\s*=\s*('(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|[^\s'"]+)"#,
        )
        .expect("valid condition regex")
    })
}

fn and_re() -> &'static Regex {
    AND_RE.get_or_init(|| Regex::new(r"(?i)^\s+AND\s+").expect("valid AND regex"))
}

/// Equality on one document field
#[derive(Debug, Clone, PartialEq)]
struct Condition {
    /// JSON pointer to the field, e.g. `/address/city`
    pointer: String,
    value: Value,
}

/// A parsed query, ready to be matched against documents
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Parse and bind a query
    ///
    /// Returns a message describing the first unsupported construct.
    pub fn parse(spec: &QuerySpec) -> Result<Self, String> {
        let captures = select_re()
            .captures(&spec.query)
            .ok_or_else(|| format!("Unsupported query: {}", spec.query))?;

        let alias = &captures[1];
        let mut conditions = Vec::new();

        if let Some(clause) = captures.get(2) {
            let mut rest = clause.as_str().trim();
            loop {
                let (condition, consumed) = parse_condition(rest, alias, spec)?;
                conditions.push(condition);
                rest = &rest[consumed..];

                if rest.trim().is_empty() {
                    break;
                }
                let separator = and_re()
                    .find(rest)
                    .ok_or_else(|| format!("Unsupported condition: {}", rest.trim()))?;
                rest = &rest[separator.end()..];
            }
        }

        Ok(Self { conditions })
    }

    /// Whether every condition holds for `document`
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|c| document.pointer(&c.pointer) == Some(&c.value))
    }
}

/// Parse the condition at the start of `text`, returning it with the
/// number of bytes consumed
fn parse_condition(
    text: &str,
    alias: &str,
    spec: &QuerySpec,
) -> Result<(Condition, usize), String> {
    let captures = condition_re()
        .captures(text)
        .ok_or_else(|| format!("Unsupported condition: {text}"))?;
    let consumed = captures[0].len();
    let text = &captures[0];

    if &captures[1] != alias {
        return Err(format!(
            "Condition '{text}' does not reference collection alias '{alias}'"
        ));
    }

    let pointer = format!("/{}", captures[2].replace('.', "/"));
    let value = parse_operand(&captures[3], spec)?;

    Ok((Condition { pointer, value }, consumed))
}

fn parse_operand(operand: &str, spec: &QuerySpec) -> Result<Value, String> {
    if operand.starts_with('@') {
        return spec
            .parameters
            .iter()
            .find(|p| p.name == operand)
            .map(|p| p.value.clone())
            .ok_or_else(|| format!("Query parameter {operand} is not bound"));
    }

    if operand.len() >= 2 && operand.starts_with('\'') && operand.ends_with('\'') {
        let inner = &operand[1..operand.len() - 1];
        return Ok(Value::String(inner.replace("\\'", "'")));
    }

    serde_json::from_str(operand).map_err(|_| format!("Unsupported literal: {operand}"))
}
