//! Configuration schema types
//!
//! This module defines the TOML configuration structure.

use crate::config::repository::{
    Connection, RepositoryConfig, DEFAULT_PAGE_SIZE, DEFAULT_THROUGHPUT,
};
use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest page size the store accepts for a single query page
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Smallest manual throughput Cosmos DB accepts for a container
pub const MIN_THROUGHPUT: u32 = 400;

/// Root configuration, mapped from `cosmos-repo.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Account connection
    pub cosmosdb: CosmosDbConfig,

    /// Repository behaviour
    #[serde(default)]
    pub repository: RepositorySettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.cosmosdb.validate()?;
        self.repository.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Build the immutable repository configuration
    pub fn repository_config(&self) -> Result<RepositoryConfig, String> {
        let connection = self.cosmosdb.connection()?;
        Ok(RepositoryConfig::new(
            connection,
            self.cosmosdb.database_name.clone(),
            self.repository.page_size,
        )
        .with_request_timeout(Duration::from_secs(
            self.cosmosdb.request_timeout_seconds,
        ))
        .with_throughput(Some(self.cosmosdb.throughput).filter(|t| *t > 0)))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Cosmos DB account configuration
///
/// Exactly one connection form must be set: `connection_string`, or both
/// `endpoint` and `key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// `AccountEndpoint=...;AccountKey=...;`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<SecretString>,

    /// Account endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Account key, zeroized on drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<SecretString>,

    /// Database name
    pub database_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Manual throughput (RU/s) for containers created by `setup`;
    /// 0 leaves it to the account
    #[serde(default = "default_throughput")]
    pub throughput: u32,
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        self.connection()?;

        if self.database_name.trim().is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        if self.request_timeout_seconds == 0 {
            return Err("cosmosdb.request_timeout_seconds must be greater than 0".to_string());
        }

        if self.throughput != 0 && (self.throughput < MIN_THROUGHPUT || self.throughput % 100 != 0)
        {
            return Err(format!(
                "cosmosdb.throughput must be 0 or a multiple of 100 of at least {MIN_THROUGHPUT}, got {}",
                self.throughput
            ));
        }

        Ok(())
    }

    /// Resolve the configured connection form
    ///
    /// Mixed (`connection_string` plus `endpoint`/`key`) and partial
    /// (`endpoint` without `key`) settings are rejected.
    pub fn connection(&self) -> Result<Connection, String> {
        match (&self.connection_string, &self.endpoint, &self.key) {
            (Some(connection_string), None, None) => {
                if connection_string.expose_secret().is_empty() {
                    return Err("cosmosdb.connection_string cannot be empty".to_string());
                }
                Ok(Connection::ConnectionString(connection_string.clone()))
            }
            (None, Some(endpoint), Some(key)) => {
                if endpoint.is_empty() {
                    return Err("cosmosdb.endpoint cannot be empty".to_string());
                }
                if !endpoint.starts_with("https://") {
                    return Err("cosmosdb.endpoint must start with https://".to_string());
                }
                if key.expose_secret().is_empty() {
                    return Err("cosmosdb.key cannot be empty".to_string());
                }
                Ok(Connection::Key {
                    endpoint: endpoint.clone(),
                    key: key.clone(),
                })
            }
            (Some(_), _, _) => Err(
                "cosmosdb.connection_string cannot be combined with cosmosdb.endpoint or cosmosdb.key"
                    .to_string(),
            ),
            (None, Some(_), None) => Err("cosmosdb.key is required with cosmosdb.endpoint".to_string()),
            (None, None, Some(_)) => Err("cosmosdb.endpoint is required with cosmosdb.key".to_string()),
            (None, None, None) => Err(
                "cosmosdb requires either connection_string or endpoint and key".to_string(),
            ),
        }
    }
}

/// Repository behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Default query page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl RepositorySettings {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "repository.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled is true".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_throughput() -> u32 {
    DEFAULT_THROUGHPUT
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn key_config() -> CosmosDbConfig {
        CosmosDbConfig {
            connection_string: None,
            endpoint: Some("https://acct.documents.azure.com:443/".to_string()),
            key: Some(secret_string("key".to_string())),
            database_name: "db".to_string(),
            request_timeout_seconds: 30,
            throughput: 400,
        }
    }

    fn app_config(cosmosdb: CosmosDbConfig) -> AppConfig {
        AppConfig {
            application: ApplicationConfig::default(),
            cosmosdb,
            repository: RepositorySettings::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_endpoint_and_key_connection() {
        let connection = key_config().connection().unwrap();
        assert!(matches!(connection, Connection::Key { ref endpoint, .. } if endpoint.starts_with("https://acct")));
    }

    #[test]
    fn test_connection_string_connection() {
        let config = CosmosDbConfig {
            connection_string: Some(secret_string(
                "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=k;".to_string(),
            )),
            endpoint: None,
            key: None,
            ..key_config()
        };
        assert!(matches!(
            config.connection().unwrap(),
            Connection::ConnectionString(_)
        ));
    }

    #[test]
    fn test_mixed_connection_rejected() {
        let config = CosmosDbConfig {
            connection_string: Some(secret_string("AccountEndpoint=x;AccountKey=y;".to_string())),
            ..key_config()
        };
        let err = config.connection().unwrap_err();
        assert!(err.contains("cannot be combined"));
    }

    #[test]
    fn test_partial_connection_rejected() {
        let config = CosmosDbConfig {
            key: None,
            ..key_config()
        };
        assert!(config.connection().unwrap_err().contains("cosmosdb.key is required"));

        let config = CosmosDbConfig {
            endpoint: None,
            ..key_config()
        };
        assert!(config
            .connection()
            .unwrap_err()
            .contains("cosmosdb.endpoint is required"));

        let config = CosmosDbConfig {
            endpoint: None,
            key: None,
            ..key_config()
        };
        assert!(config.connection().is_err());
    }

    #[test]
    fn test_plain_http_endpoint_rejected() {
        let config = CosmosDbConfig {
            endpoint: Some("http://localhost:8081/".to_string()),
            ..key_config()
        };
        assert!(config.connection().unwrap_err().contains("https://"));
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = app_config(key_config());
        config.repository.page_size = 0;
        assert!(config.validate().is_err());

        config.repository.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());

        config.repository.page_size = MAX_PAGE_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_throughput_bounds() {
        for (throughput, valid) in [(0, true), (400, true), (1000, true), (300, false), (450, false)] {
            let config = app_config(CosmosDbConfig {
                throughput,
                ..key_config()
            });
            assert_eq!(config.validate().is_ok(), valid, "throughput {throughput}");
        }
    }

    #[test]
    fn test_zero_throughput_leaves_account_default() {
        let config = app_config(CosmosDbConfig {
            throughput: 0,
            ..key_config()
        });
        assert_eq!(config.repository_config().unwrap().throughput, None);
        assert_eq!(
            app_config(key_config()).repository_config().unwrap().throughput,
            Some(400)
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = app_config(key_config());
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log_level"));
    }

    #[test]
    fn test_repository_config_from_app_config() {
        let mut config = app_config(key_config());
        config.repository.page_size = 25;
        config.cosmosdb.request_timeout_seconds = 5;

        let repository_config = config.repository_config().unwrap();
        assert_eq!(repository_config.database_name, "db");
        assert_eq!(repository_config.page_size, 25);
        assert_eq!(repository_config.request_timeout, Duration::from_secs(5));
    }
}
