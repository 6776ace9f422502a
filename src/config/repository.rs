//! Repository connection settings
//!
//! [`RepositoryConfig`] is built once per process, usually from
//! [`crate::config::AppConfig::repository_config`], and never changes
//! afterwards. The [`Connection`] sum type makes a half-specified connection
//! unrepresentable: it is either a connection string or an endpoint with its
//! key.

use crate::config::SecretString;
use std::time::Duration;

/// Default number of items per query page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default manual throughput (RU/s) for provisioned containers
pub const DEFAULT_THROUGHPUT: u32 = 400;

/// How to reach and authenticate against the account
#[derive(Debug, Clone)]
pub enum Connection {
    /// `AccountEndpoint=https://...;AccountKey=...;`
    ConnectionString(SecretString),

    /// Explicit endpoint and account key
    Key { endpoint: String, key: SecretString },
}

impl Connection {
    pub fn kind(&self) -> &'static str {
        match self {
            Connection::ConnectionString(_) => "connection_string",
            Connection::Key { .. } => "endpoint_key",
        }
    }
}

/// Everything a repository needs to reach one database
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    pub connection: Connection,
    pub database_name: String,

    /// Page size used when a query does not set `max_item_count`
    pub page_size: u32,

    pub request_timeout: Duration,

    /// Manual throughput for containers created by provisioning; `None`
    /// leaves it to the account
    pub throughput: Option<u32>,
}

impl RepositoryConfig {
    pub fn new(connection: Connection, database_name: impl Into<String>, page_size: u32) -> Self {
        Self {
            connection,
            database_name: database_name.into(),
            page_size,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            throughput: Some(DEFAULT_THROUGHPUT),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_throughput(mut self, throughput: Option<u32>) -> Self {
        self.throughput = throughput;
        self
    }
}
