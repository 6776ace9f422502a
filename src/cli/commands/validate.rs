//! Validate config command implementation
//!
//! Loads the configuration the same way every other command does and
//! prints a summary. Secrets are never printed.

use crate::cli::exit_code;
use crate::config::{AppConfig, Connection};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `source` names where the configuration came from; `loaded` is the
    /// result of loading it.
    pub async fn execute(&self, source: &str, loaded: &Result<AppConfig>) -> anyhow::Result<i32> {
        tracing::info!(source = %source, "Validating configuration");

        println!("🔍 Validating configuration from {source}");
        println!();

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let repository_config = match config.repository_config() {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        match &repository_config.connection {
            Connection::ConnectionString(_) => println!("  Connection: connection string"),
            Connection::Key { endpoint, .. } => println!("  Connection: {endpoint} (account key)"),
        }
        println!("  Database: {}", repository_config.database_name);
        println!("  Page Size: {}", repository_config.page_size);
        println!(
            "  Request Timeout: {}s",
            repository_config.request_timeout.as_secs()
        );
        match repository_config.throughput {
            Some(ru) => println!("  Throughput: {ru} RU/s"),
            None => println!("  Throughput: account default"),
        }
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();

        Ok(exit_code::SUCCESS)
    }
}
