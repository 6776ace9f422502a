//! Logging
//!
//! Structured logging with:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output on stderr
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use cosmos_repo::logging::init_logging;
//! use cosmos_repo::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(container = "entities", "Repository ready");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the outcome of a repository operation
///
/// # Example
///
/// ```no_run
/// use cosmos_repo::log_outcome;
/// use cosmos_repo::domain::OutcomeKind;
///
/// log_outcome!("get", "1", OutcomeKind::NotFound);
/// ```
#[macro_export]
macro_rules! log_outcome {
    ($operation:expr, $id:expr, $kind:expr) => {
        tracing::info!(
            operation = $operation,
            id = %$id,
            outcome = %$kind,
            "Operation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cosmos_repo::log_error_with_context;
/// use cosmos_repo::domain::RepositoryError;
///
/// let error = RepositoryError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
