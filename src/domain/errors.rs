//! Domain error types
//!
//! Only failures that are *not* part of normal control flow live here.
//! A missing document or a duplicate insert is an outcome (see
//! [`crate::domain::outcome`]), never an error.

use thiserror::Error;

/// HTTP status the store uses for a missing resource
pub const STATUS_NOT_FOUND: u16 = 404;

/// HTTP status the store uses for an identity collision on create
pub const STATUS_CONFLICT: u16 = 409;

/// Main repository error type
///
/// Every fallible operation of the crate returns this error on its `Err` side.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failures reported by, or while talking to, the document store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Database or container provisioning failed
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RepositoryError {
    /// The store status code behind this error, if the store answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            RepositoryError::Store(err) => err.status(),
            _ => None,
        }
    }

    /// Whether this error was raised while reaching the store (no status at all)
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, RepositoryError::Store(StoreError::Transport(_)))
    }
}

/// Document store errors
///
/// Only [`StoreError::Status`] carries a status code. Transport and
/// encoding failures have no code, so they can never be read as a
/// not-found or conflict answer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status
    #[error("status {status}{}: {message}", fmt_sub_status(.sub_status))]
    Status {
        /// HTTP status code
        status: u16,
        /// Cosmos DB `x-ms-substatus`, when present
        sub_status: Option<u32>,
        /// Message from the store's error body
        message: String,
    },

    /// The request never produced an answer (DNS, TLS, timeout, reset)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The store answered with something that could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be built (bad URL, unencodable key)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    /// Build a status error without a sub-status
    pub fn status_code(status: u16, message: impl Into<String>) -> Self {
        StoreError::Status {
            status,
            sub_status: None,
            message: message.into(),
        }
    }

    /// The status code, for [`StoreError::Status`] only
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The store reported a missing resource
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(STATUS_NOT_FOUND)
    }

    /// The store reported an identity collision
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(STATUS_CONFLICT)
    }
}

fn fmt_sub_status(sub_status: &Option<u32>) -> String {
    sub_status
        .map(|s| format!(" (substatus {s})"))
        .unwrap_or_default()
}

// Conversion from std::io::Error
impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RepositoryError {
    fn from(err: toml::de::Error) -> Self {
        RepositoryError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Transport("connection reset".to_string());
        let err: RepositoryError = store_err.into();
        assert!(matches!(err, RepositoryError::Store(_)));
        assert!(err.is_connection_failure());
    }

    #[test]
    fn test_status_classification() {
        assert!(StoreError::status_code(404, "missing").is_not_found());
        assert!(StoreError::status_code(409, "exists").is_conflict());
        assert!(!StoreError::status_code(500, "boom").is_not_found());
        assert!(!StoreError::status_code(404, "missing").is_conflict());
    }

    #[test]
    fn test_statusless_errors_never_classify() {
        let errors = [
            StoreError::Transport("404 in the message".to_string()),
            StoreError::InvalidResponse("409 in the message".to_string()),
            StoreError::InvalidRequest("NotFound".to_string()),
        ];

        for err in errors {
            assert_eq!(err.status(), None);
            assert!(!err.is_not_found());
            assert!(!err.is_conflict());
        }
    }

    #[test]
    fn test_status_display_with_substatus() {
        let err = StoreError::Status {
            status: 404,
            sub_status: Some(1003),
            message: "Owner resource does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "status 404 (substatus 1003): Owner resource does not exist"
        );
        assert_eq!(
            StoreError::status_code(500, "boom").to_string(),
            "status 500: boom"
        );
    }

    #[test]
    fn test_repository_error_status_passthrough() {
        let err: RepositoryError = StoreError::status_code(429, "throttled").into();
        assert_eq!(err.status(), Some(429));
        assert_eq!(RepositoryError::Validation("x".to_string()).status(), None);
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RepositoryError = json_err.into();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RepositoryError = toml_err.into();
        assert!(matches!(err, RepositoryError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RepositoryError = io_err.into();
        assert!(matches!(err, RepositoryError::Io(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = RepositoryError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let err = StoreError::Transport("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
