//! Result type alias
//!
//! Fatal failures travel on the `Err` side of this alias. Expected outcomes
//! such as a missing document are values on the `Ok` side (see
//! [`crate::domain::outcome`]).

use super::errors::RepositoryError;

/// Result type alias for repository operations
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::result::Result;
/// use cosmos_repo::domain::errors::RepositoryError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RepositoryError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RepositoryError>;
