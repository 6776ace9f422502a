//! Query and paging types
//!
//! A query returns one page at a time. The continuation token in a
//! [`QueryPage`] resumes the same query on the next call; its absence marks
//! the end of the result set. A token is a hint that more results *may*
//! exist, so the next page can still be empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named query parameter (`@name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    pub value: Value,
}

/// SQL query text with optional parameters
///
/// Serializes to the body the store expects:
/// `{"query": "...", "parameters": [{"name": "@p", "value": ...}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub query: String,

    #[serde(default)]
    pub parameters: Vec<QueryParameter>,
}

impl QuerySpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind a parameter, adding the leading `@` when missing
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let name = if name.starts_with('@') {
            name
        } else {
            format!("@{name}")
        };
        self.parameters.push(QueryParameter {
            name,
            value: value.into(),
        });
        self
    }
}

impl From<&str> for QuerySpec {
    fn from(query: &str) -> Self {
        QuerySpec::new(query)
    }
}

impl From<String> for QuerySpec {
    fn from(query: String) -> Self {
        QuerySpec::new(query)
    }
}

/// Options for a single page request
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub query: QuerySpec,

    /// Token returned by the previous page, if resuming
    pub continuation_token: Option<String>,

    /// Upper bound on the page size; the repository default applies when unset
    pub max_item_count: Option<u32>,
}

impl QueryOptions {
    pub fn new(query: impl Into<QuerySpec>) -> Self {
        Self {
            query: query.into(),
            continuation_token: None,
            max_item_count: None,
        }
    }

    pub fn with_continuation(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    pub fn with_max_item_count(mut self, max_item_count: u32) -> Self {
        self.max_item_count = Some(max_item_count);
        self
    }
}

/// What a store needs to serve one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub continuation_token: Option<String>,
    pub max_item_count: u32,
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPage<T> {
    pub values: Vec<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl<T> QueryPage<T> {
    /// The page is the last one of its result set
    pub fn is_last(&self) -> bool {
        self.continuation_token.is_none()
    }
}
