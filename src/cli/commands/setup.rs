//! Setup command implementation
//!
//! Creates the configured database and the `entities` container when they
//! do not exist yet. A new container gets the configured throughput.

use crate::adapters::cosmosdb::Provisioner;
use crate::cli::{exit_code, exit_code_for};
use crate::config::RepositoryConfig;
use crate::core::ENTITY_CONTAINER;
use crate::domain::ENTITY_PARTITION_KEY_PATH;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the setup command
#[derive(Args, Debug)]
pub struct SetupArgs {}

impl SetupArgs {
    /// Execute the setup command
    pub async fn execute(&self, config: &RepositoryConfig) -> anyhow::Result<i32> {
        tracing::info!(database = %config.database_name, "Provisioning database");

        println!("🔧 Setting up database {}", config.database_name);
        println!();

        let provisioner = match Provisioner::connect(config) {
            Ok(p) => p,
            Err(e) => {
                log_error_with_context!(&e, "provisioner connection failed");
                println!("❌ Failed to connect to Cosmos DB");
                println!("   Error: {e}");
                return Ok(match exit_code_for(&e) {
                    exit_code::FATAL => exit_code::CONNECTION,
                    code => code,
                });
            }
        };

        if let Err(e) = provisioner.ensure_database_exists().await {
            log_error_with_context!(&e, "database provisioning failed");
            println!("❌ Failed to create database {}", config.database_name);
            println!("   Error: {e}");
            return Ok(exit_code::FATAL);
        }
        println!("✅ Database ready: {}", config.database_name);

        if let Err(e) = provisioner
            .ensure_container_exists(
                ENTITY_CONTAINER,
                ENTITY_PARTITION_KEY_PATH,
                config.throughput,
            )
            .await
        {
            log_error_with_context!(&e, "container provisioning failed");
            println!("❌ Failed to create container {ENTITY_CONTAINER}");
            println!("   Error: {e}");
            return Ok(exit_code::FATAL);
        }
        println!(
            "✅ Container ready: {ENTITY_CONTAINER} (partition key {ENTITY_PARTITION_KEY_PATH})"
        );
        println!();

        Ok(exit_code::SUCCESS)
    }
}
