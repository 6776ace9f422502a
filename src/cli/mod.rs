//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap, plus the
//! helpers `main` uses to build the single repository a run works with.

pub mod commands;

use crate::config::{load_config, load_config_from_env, AppConfig};
use crate::domain::{RepositoryError, Result};
use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIGURATION: i32 = 2;
    /// The operation ended in `not-found` or `conflict`
    pub const OUTCOME: i32 = 3;
    pub const CONNECTION: i32 = 4;
    pub const FATAL: i32 = 5;
}

/// Cosmos Repo - typed repository access to Azure Cosmos DB
#[derive(Parser, Debug)]
#[command(name = "cosmos-repo")]
#[command(version, about, long_about = None)]
#[command(author = "Cosmos Repo Contributors")]
pub struct Cli {
    /// Path to configuration file; without it, ENDPOINT/KEY/DATABASE are read from the environment
    #[arg(short, long, env = "COSMOS_REPO_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COSMOS_REPO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Create the database and the entities container
    Setup(commands::setup::SetupArgs),

    /// Read one entity
    Get(commands::get::GetArgs),

    /// Create an entity; fails with a conflict if it exists
    Insert(commands::write::WriteArgs),

    /// Replace an existing entity
    Update(commands::write::WriteArgs),

    /// Create or replace an entity
    Upsert(commands::write::WriteArgs),

    /// Delete one entity
    Delete(commands::delete::DeleteArgs),

    /// Run a query, one page at a time
    Query(commands::query::QueryArgs),

    /// Execute a stored procedure
    Exec(commands::exec::ExecArgs),
}

/// Load configuration from `path`, or from the environment without one
pub fn load_app_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => load_config_from_env(),
    }
}

/// Map an error to the process exit code
pub fn exit_code_for(error: &RepositoryError) -> i32 {
    match error {
        RepositoryError::Configuration(_) => exit_code::CONFIGURATION,
        err if err.is_connection_failure() => exit_code::CONNECTION,
        _ => exit_code::FATAL,
    }
}
