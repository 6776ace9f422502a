//! Document identity
//!
//! The repository never looks inside a document beyond its identity: the
//! `(id, partition key)` pair that addresses it within a container.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A document that can be stored by a [`crate::core::Repository`]
///
/// Insert and upsert need the partition key to route the write, so the
/// document exposes both halves of its address.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// The document id, unique within one partition
    fn id(&self) -> &str;

    /// The partition key value
    fn partition_key(&self) -> &str;
}

/// Generic entity document stored in the `entities` container
///
/// Partitioned on `/partition`.
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::{Document, Entity};
///
/// let entity = Entity::new("1", "A", "x".to_string());
/// assert_eq!(entity.id(), "1");
/// assert_eq!(entity.partition_key(), "A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity<T = String> {
    /// Document id
    pub id: String,

    /// Partition key value
    pub partition: String,

    /// Payload
    pub data: T,
}

impl<T> Entity<T> {
    pub fn new(id: impl Into<String>, partition: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            partition: partition.into(),
            data,
        }
    }
}

impl<T> Document for Entity<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.partition
    }
}

/// Partition key path of the [`Entity`] shape
pub const ENTITY_PARTITION_KEY_PATH: &str = "/partition";
