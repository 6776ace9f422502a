//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Outcomes** ([`Outcome`], [`Lookup`], [`Insertion`], [`Deletion`]) returned by
//!   every repository operation
//! - **Document identity** ([`Document`], [`Entity`])
//! - **Query types** ([`QuerySpec`], [`QueryOptions`], [`QueryPage`])
//! - **Error types** ([`RepositoryError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Outcomes versus errors
//!
//! A missing document or a duplicate insert is ordinary control flow and
//! comes back as an outcome. Anything else the store reports is fatal and
//! comes back as `Err`:
//!
//! ```rust
//! use cosmos_repo::domain::{Insertion, Result};
//!
//! fn describe(result: Result<Insertion<u32>>) -> String {
//!     match result {
//!         Ok(Insertion::Created(v)) => format!("created {v}"),
//!         Ok(Insertion::Conflict) => "already there".to_string(),
//!         Err(e) => format!("failed: {e}"),
//!     }
//! }
//!
//! assert_eq!(describe(Ok(Insertion::Conflict)), "already there");
//! ```

pub mod document;
pub mod errors;
pub mod outcome;
pub mod query;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{Document, Entity, ENTITY_PARTITION_KEY_PATH};
pub use errors::{RepositoryError, StoreError, STATUS_CONFLICT, STATUS_NOT_FOUND};
pub use outcome::{Deletion, Insertion, Lookup, Outcome, OutcomeKind};
pub use query::{PageRequest, QueryOptions, QueryPage, QueryParameter, QuerySpec};
pub use result::Result;
