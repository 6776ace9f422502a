//! CLI command implementations
//!
//! Commands that touch documents receive the process's single
//! [`EntityRepository`](crate::core::EntityRepository); none of them builds
//! its own.

pub mod delete;
pub mod exec;
pub mod get;
pub mod init;
pub mod query;
pub mod setup;
pub mod validate;
pub mod write;

use crate::core::EntityRepository;
use serde::Serialize;
use serde_json::Value;

/// Repository type the CLI works with: entities with arbitrary JSON payloads
pub type CliRepository = EntityRepository<Value>;

/// Parse a command-line value as JSON, falling back to a plain string
///
/// `42` and `{"a":1}` are JSON; `hello` becomes `"hello"`.
pub fn parse_json_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Pretty-print a value on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_arg() {
        assert_eq!(parse_json_arg("42"), json!(42));
        assert_eq!(parse_json_arg("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_json_arg("\"quoted\""), json!("quoted"));
        assert_eq!(parse_json_arg("hello"), json!("hello"));
    }
}
