//! Configuration loader with TOML parsing and environment variable overrides

use super::repository::DEFAULT_THROUGHPUT;
use super::schema::{AppConfig, ApplicationConfig, CosmosDbConfig, LoggingConfig, RepositorySettings};
use super::secret::secret_string;
use crate::domain::errors::RepositoryError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`AppConfig`]
/// 4. Applies environment variable overrides (`COSMOS_REPO_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, a
/// referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use cosmos_repo::config::load_config;
///
/// let config = load_config("cosmos-repo.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RepositoryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RepositoryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| RepositoryError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        RepositoryError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration from the process environment only
///
/// Reads `ENDPOINT`, `KEY` and `DATABASE`, or `CONNECTION_STRING` and
/// `DATABASE`. `PAGE_SIZE` and `LOG_LEVEL` are optional. Call
/// `dotenvy::dotenv()` first to pick up a `.env` file.
///
/// # Errors
///
/// Returns a configuration error naming every missing variable, or the
/// validation failure.
pub fn load_config_from_env() -> Result<AppConfig> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

    let connection_string = var("CONNECTION_STRING");
    let endpoint = var("ENDPOINT");
    let key = var("KEY");
    let database = var("DATABASE");

    let mut missing = Vec::new();
    if connection_string.is_none() {
        if endpoint.is_none() {
            missing.push("ENDPOINT");
        }
        if key.is_none() {
            missing.push("KEY");
        }
    }
    if database.is_none() {
        missing.push("DATABASE");
    }
    if !missing.is_empty() {
        return Err(RepositoryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    let mut repository = RepositorySettings::default();
    if let Some(page_size) = var("PAGE_SIZE") {
        repository.page_size = page_size.parse().map_err(|_| {
            RepositoryError::Configuration(format!("PAGE_SIZE must be a number, got '{page_size}'"))
        })?;
    }

    let mut application = ApplicationConfig::default();
    if let Some(level) = var("LOG_LEVEL") {
        application.log_level = level;
    }

    let config = AppConfig {
        application,
        cosmosdb: CosmosDbConfig {
            connection_string: connection_string.map(secret_string),
            endpoint,
            key: key.map(secret_string),
            database_name: database.unwrap_or_default(),
            request_timeout_seconds: 30,
            throughput: DEFAULT_THROUGHPUT,
        },
        repository,
        logging: LoggingConfig::default(),
    };

    config.validate().map_err(|e| {
        RepositoryError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RepositoryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `COSMOS_REPO_*` prefix
///
/// Pattern: `COSMOS_REPO_<SECTION>_<KEY>`, e.g. `COSMOS_REPO_COSMOSDB_DATABASE_NAME`.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("COSMOS_REPO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_CONNECTION_STRING") {
        config.cosmosdb.connection_string = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_ENDPOINT") {
        config.cosmosdb.endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_KEY") {
        config.cosmosdb.key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_DATABASE_NAME") {
        config.cosmosdb.database_name = val;
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.cosmosdb.request_timeout_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_COSMOSDB_THROUGHPUT") {
        if let Ok(throughput) = val.parse() {
            config.cosmosdb.throughput = throughput;
        }
    }

    if let Ok(val) = std::env::var("COSMOS_REPO_REPOSITORY_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.repository.page_size = size;
        }
    }

    if let Ok(val) = std::env::var("COSMOS_REPO_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COSMOS_REPO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
