//! Repository layer
//!
//! # Modules
//!
//! - [`repository`] - generic [`Repository<T>`] over any [`DocumentStore`](crate::adapters::store::DocumentStore)
//! - [`entities`] - the repository bound to the `entities` container
//! - [`pagination`] - page streams built on the continuation protocol
//!
//! # Outcome mapping
//!
//! | Operation | Success | Absorbed status | Result |
//! |---|---|---|---|
//! | `get` | `Ok(T)` | 404 | `NotFound` |
//! | `insert` | `Created(T)` | 409 | `Conflict` |
//! | `update` | `Ok(T)` | 404 | `NotFound` |
//! | `delete` | `NoContent` | 404 | `NotFound` |
//! | `upsert` | `T` | none | |
//! | `query` | `QueryPage<T>` | none | |
//! | `execute` | `Ok(R)` | 404 | `NotFound` |
//!
//! Any other failure is an `Err`.

pub mod entities;
pub mod pagination;
pub mod repository;

pub use entities::{EntityRepository, ENTITY_CONTAINER};
pub use repository::Repository;
