//! Store abstraction layer
//!
//! The repository talks to any backend through [`DocumentStore`]: the
//! Cosmos DB gateway in production, the in-memory store in tests and
//! offline runs.

pub mod traits;

pub use traits::{DocumentStore, StoreResponse, StoreResult};
