//! Query command implementation
//!
//! Fetches one page by default. `--all` walks the page stream until the
//! store stops returning a continuation token.

use super::{parse_json_arg, print_json, CliRepository};
use crate::cli::{exit_code, exit_code_for};
use crate::domain::{QueryOptions, QueryPage, QuerySpec};
use crate::log_error_with_context;
use clap::Args;
use futures::TryStreamExt;
use serde_json::Value;

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL query, e.g. "SELECT * FROM c WHERE c.partition = @pk"
    pub sql: String,

    /// Query parameter as name=value, value parsed as JSON when possible
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Maximum items per page (defaults to the configured page size)
    #[arg(long)]
    pub max_items: Option<u32>,

    /// Continuation token from a previous page
    #[arg(long)]
    pub continuation: Option<String>,

    /// Fetch every remaining page
    #[arg(long)]
    pub all: bool,
}

impl QueryArgs {
    fn options(&self) -> Result<QueryOptions, String> {
        let mut spec = QuerySpec::new(&self.sql);
        for param in &self.params {
            let (name, value) = param
                .split_once('=')
                .ok_or_else(|| format!("Query parameter '{param}' must have the form name=value"))?;
            spec = spec.with_parameter(name.trim(), parse_json_arg(value));
        }

        let mut options = QueryOptions::new(spec).with_continuation(self.continuation.clone());
        if let Some(max_items) = self.max_items {
            options = options.with_max_item_count(max_items);
        }
        Ok(options)
    }

    /// Execute the query command
    pub async fn execute(&self, repository: &CliRepository) -> anyhow::Result<i32> {
        let options = match self.options() {
            Ok(options) => options,
            Err(e) => {
                println!("❌ {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let mut values = Vec::new();
        let mut pages = 0usize;
        let mut continuation_token = None;

        let stream = repository.pages_as::<Value>(options);
        futures::pin_mut!(stream);

        loop {
            let page = match stream.try_next().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) => {
                    log_error_with_context!(&e, "query failed");
                    println!("❌ Query failed after {pages} page(s)");
                    println!("   Error: {e}");
                    return Ok(exit_code_for(&e));
                }
            };

            pages += 1;
            values.extend(page.values);
            continuation_token = page.continuation_token;

            if !self.all {
                break;
            }
        }

        tracing::info!(
            pages = pages,
            items = values.len(),
            has_more = continuation_token.is_some(),
            "Query completed"
        );

        print_json(&QueryPage {
            values,
            continuation_token,
        })?;

        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::core::ENTITY_CONTAINER;
    use crate::domain::{Entity, ENTITY_PARTITION_KEY_PATH};
    use serde_json::json;
    use std::sync::Arc;

    fn args(params: &[&str]) -> QueryArgs {
        QueryArgs {
            sql: "SELECT * FROM c WHERE c.partition = @pk".to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            max_items: Some(5),
            continuation: None,
            all: false,
        }
    }

    #[test]
    fn test_options_bind_parameters() {
        let options = args(&["pk=A", "@n=3"]).options().unwrap();
        assert_eq!(options.max_item_count, Some(5));
        assert_eq!(options.query.parameters[0].name, "@pk");
        assert_eq!(options.query.parameters[0].value, json!("A"));
        assert_eq!(options.query.parameters[1].name, "@n");
        assert_eq!(options.query.parameters[1].value, json!(3));
    }

    #[test]
    fn test_malformed_parameter() {
        assert!(args(&["pk"]).options().is_err());
    }

    async fn repository(count: usize) -> CliRepository {
        let store = MemoryStore::new("appdb").with_container(ENTITY_CONTAINER, ENTITY_PARTITION_KEY_PATH);
        let repo: CliRepository = CliRepository::for_store(Arc::new(store), 2);
        for i in 0..count {
            repo.insert(Entity::new(format!("{i}"), "A", json!(i)))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_all_pages_succeed() {
        let repo = repository(5).await;
        let query = QueryArgs {
            all: true,
            max_items: None,
            ..args(&["pk=A"])
        };
        assert_eq!(query.execute(&repo).await.unwrap(), exit_code::SUCCESS);
    }

    #[tokio::test]
    async fn test_bad_continuation_is_fatal() {
        let repo = repository(1).await;
        let query = QueryArgs {
            all: true,
            continuation: Some("not-a-token".to_string()),
            ..args(&["pk=A"])
        };
        assert_eq!(query.execute(&repo).await.unwrap(), exit_code::FATAL);
    }
}
