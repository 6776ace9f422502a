// Cosmos Repo - Typed repository access to Azure Cosmos DB
// Copyright (c) 2025 Cosmos Repo Contributors
// Licensed under the MIT License

use cosmos_repo::cli::commands::write::WriteOperation;
use cosmos_repo::cli::commands::CliRepository;
use cosmos_repo::cli::{exit_code, load_app_config, Cli, Commands};
use cosmos_repo::config::{AppConfig, LoggingConfig};
use cosmos_repo::domain::Result;
use cosmos_repo::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = match cli.command {
        Commands::Init(_) => None,
        _ => Some(load_app_config(cli.config.as_deref())),
    };

    let loaded_config = loaded.as_ref().and_then(|l| l.as_ref().ok());
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded_config.map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = loaded_config
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code::FATAL);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Cosmos Repo starting");

    let code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_code::FATAL
        }
    };

    drop(guard);
    process::exit(code);
}

/// Execute the CLI command
///
/// This is the composition root: document commands share the one
/// repository built here.
async fn execute_command(cli: &Cli, loaded: Option<Result<AppConfig>>) -> anyhow::Result<i32> {
    let loaded = match (&cli.command, loaded) {
        (Commands::Init(args), _) => return args.execute().await,
        (_, Some(loaded)) => loaded,
        (_, None) => load_app_config(cli.config.as_deref()),
    };

    if let Commands::ValidateConfig(args) = &cli.command {
        let source = cli.config.as_deref().unwrap_or("environment");
        return args.execute(source, &loaded).await;
    }

    let repository_config = match loaded.map(|c| c.repository_config()) {
        Ok(Ok(c)) => c,
        Ok(Err(e)) => {
            eprintln!("❌ Invalid configuration: {e}");
            return Ok(exit_code::CONFIGURATION);
        }
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e}");
            return Ok(exit_code::CONFIGURATION);
        }
    };

    if let Commands::Setup(args) = &cli.command {
        return args.execute(&repository_config).await;
    }

    let repository = match CliRepository::from_config(&repository_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Failed to create repository: {e}");
            return Ok(exit_code::CONFIGURATION);
        }
    };

    match &cli.command {
        Commands::Get(args) => args.execute(&repository).await,
        Commands::Insert(args) => args.execute(WriteOperation::Insert, &repository).await,
        Commands::Update(args) => args.execute(WriteOperation::Update, &repository).await,
        Commands::Upsert(args) => args.execute(WriteOperation::Upsert, &repository).await,
        Commands::Delete(args) => args.execute(&repository).await,
        Commands::Query(args) => args.execute(&repository).await,
        Commands::Exec(args) => args.execute(&repository).await,
        Commands::Init(_) | Commands::ValidateConfig(_) | Commands::Setup(_) => {
            Ok(exit_code::SUCCESS)
        }
    }
}
