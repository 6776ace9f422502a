//! Entity repository
//!
//! The repository for [`Entity`] documents in the `entities` container.
//! There is no process-wide instance: the composition root builds one and
//! passes it to whoever needs it.
//!
//! # Example
//!
//! ```rust
//! use cosmos_repo::adapters::memory::MemoryStore;
//! use cosmos_repo::core::{EntityRepository, ENTITY_CONTAINER};
//! use cosmos_repo::domain::{Entity, Insertion, Lookup, ENTITY_PARTITION_KEY_PATH};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new("appdb").with_container(ENTITY_CONTAINER, ENTITY_PARTITION_KEY_PATH);
//! let entities: EntityRepository = EntityRepository::for_store(Arc::new(store), 100);
//!
//! let entity = Entity::new("1", "A", "x".to_string());
//! assert!(matches!(entities.insert(entity.clone()).await?, Insertion::Created(_)));
//! assert!(matches!(entities.insert(entity).await?, Insertion::Conflict));
//! assert!(matches!(entities.get("1", "A").await?, Lookup::Ok(_)));
//! # Ok(())
//! # }
//! ```

use crate::adapters::store::DocumentStore;
use crate::config::RepositoryConfig;
use crate::core::Repository;
use crate::domain::{Entity, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Container holding [`Entity`] documents
pub const ENTITY_CONTAINER: &str = "entities";

/// Repository of [`Entity`] documents, `String` payload by default
pub type EntityRepository<T = String> = Repository<Entity<T>>;

impl<T> Repository<Entity<T>>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Entity repository over an existing store
    pub fn for_store(store: Arc<dyn DocumentStore>, page_size: u32) -> Self {
        Self::new(store, ENTITY_CONTAINER, page_size)
    }

    /// Entity repository backed by a Cosmos DB gateway
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection cannot be resolved.
    pub fn from_config(config: &RepositoryConfig) -> Result<Self> {
        let repository = Self::connect(config, ENTITY_CONTAINER)?;

        tracing::info!(
            database = %config.database_name,
            container = ENTITY_CONTAINER,
            connection = config.connection.kind(),
            "Entity repository ready"
        );

        Ok(repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::config::{secret_string, Connection};
    use crate::domain::ENTITY_PARTITION_KEY_PATH;

    #[test]
    fn test_bound_to_entities_container() {
        let store = MemoryStore::new("db").with_container(ENTITY_CONTAINER, ENTITY_PARTITION_KEY_PATH);
        let repo: EntityRepository = EntityRepository::for_store(Arc::new(store), 25);
        assert_eq!(repo.container_name(), "entities");
        assert_eq!(repo.database_name(), "db");
        assert_eq!(repo.page_size(), 25);
    }

    #[test]
    fn test_from_config() {
        let config = RepositoryConfig::new(
            Connection::ConnectionString(secret_string(
                "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5;".to_string(),
            )),
            "appdb",
            50,
        );

        let repo: EntityRepository = EntityRepository::from_config(&config).unwrap();
        assert_eq!(repo.container_name(), ENTITY_CONTAINER);
        assert_eq!(repo.database_name(), "appdb");
        assert_eq!(repo.page_size(), 50);
    }

    #[test]
    fn test_from_config_rejects_bad_key() {
        let config = RepositoryConfig::new(
            Connection::Key {
                endpoint: "https://acct.documents.azure.com:443/".to_string(),
                key: secret_string("not base64!".to_string()),
            },
            "appdb",
            50,
        );

        assert!(EntityRepository::<String>::from_config(&config).is_err());
    }
}
