//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cosmos-repo.toml")]
    pub output: String,

    /// Use the connection string form instead of endpoint and key
    #[arg(long)]
    pub connection_string: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        match fs::write(&self.output, self.render()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                if self.connection_string {
                    println!("  2. Set COSMOS_CONNECTION_STRING in your environment or .env file");
                } else {
                    println!("  2. Set COSMOS_KEY in your environment or .env file");
                }
                println!(
                    "  3. Validate configuration: cosmos-repo --config {} validate-config",
                    self.output
                );
                println!(
                    "  4. Create database and container: cosmos-repo --config {} setup",
                    self.output
                );
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_code::FATAL)
            }
        }
    }

    fn render(&self) -> String {
        let connection = if self.connection_string {
            r#"# AccountEndpoint=https://...;AccountKey=...;
connection_string = "${COSMOS_CONNECTION_STRING}""#
        } else {
            r#"endpoint = "https://your-account.documents.azure.com:443/"
key = "${COSMOS_KEY}""#
        };

        format!(
            r#"# Cosmos Repo configuration
#
# Every value can be overridden with COSMOS_REPO_<SECTION>_<KEY>,
# e.g. COSMOS_REPO_REPOSITORY_PAGE_SIZE=50.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[cosmosdb]
# Set either connection_string, or endpoint and key
{connection}
database_name = "appdb"
request_timeout_seconds = 30
# RU/s for containers created by `setup` (0 = account default)
throughput = 400

[repository]
# Items per query page when a query does not set its own limit (1-1000)
page_size = 100

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("cosmos-repo.toml");

        std::env::set_var("COSMOS_KEY", "a2V5");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            connection_string: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), exit_code::SUCCESS);

        let config = load_config(&output).unwrap();
        assert_eq!(config.cosmosdb.database_name, "appdb");
        assert_eq!(config.repository.page_size, 100);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("existing.toml");
        std::fs::write(&output, "# keep").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            connection_string: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), exit_code::CONFIGURATION);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# keep");
    }
}
