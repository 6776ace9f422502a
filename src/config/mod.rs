//! Configuration management.
//!
//! Configuration comes from a TOML file or from plain environment
//! variables (`ENDPOINT`, `KEY`, `DATABASE`).
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${COSMOS_KEY}"
//! database_name = "app"
//! # or, instead of endpoint + key:
//! # connection_string = "${COSMOS_CONNECTION_STRING}"
//!
//! [repository]
//! page_size = 100
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_repo::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cosmos-repo.toml")?;
//! let repository_config = config.repository_config()?;
//! println!("database: {}", repository_config.database_name);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod repository;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_env};
pub use repository::{
    Connection, RepositoryConfig, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT, DEFAULT_THROUGHPUT,
};
pub use schema::{
    AppConfig, ApplicationConfig, CosmosDbConfig, LoggingConfig, RepositorySettings, MAX_PAGE_SIZE,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
