//! Generic document repository
//!
//! [`Repository<T>`] turns store answers into the narrow outcome types of
//! [`crate::domain::outcome`]. Exactly two statuses are absorbed:
//!
//! - `404` becomes `NotFound` for `get`, `update`, `delete` and `execute`
//! - `409` becomes `Conflict` for `insert` only
//!
//! Every other failure, including any error that carries no status code,
//! is returned unchanged as [`RepositoryError::Store`].
//!
//! No document can have an empty id, so point operations on `""` answer
//! `NotFound` without a round trip.

use crate::adapters::cosmosdb::CosmosGateway;
use crate::adapters::store::DocumentStore;
use crate::config::RepositoryConfig;
use crate::domain::{
    Deletion, Document, Insertion, Lookup, PageRequest, QueryOptions, QueryPage, RepositoryError,
    Result, StoreError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD, query and stored procedure access to one container
///
/// Cloning is cheap: clones share the same store handle.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    container: String,
    page_size: u32,
    _document: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            container: self.container.clone(),
            page_size: self.page_size,
            _document: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("database", &self.store.database_name())
            .field("container", &self.container)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl<T: Document> Repository<T> {
    /// Create a repository over an existing store
    ///
    /// # Arguments
    ///
    /// * `store` - Store bound to the target database
    /// * `container` - Container every operation addresses
    /// * `page_size` - Default page size for [`Repository::query`]
    pub fn new(store: Arc<dyn DocumentStore>, container: impl Into<String>, page_size: u32) -> Self {
        Self {
            store,
            container: container.into(),
            page_size: page_size.max(1),
            _document: PhantomData,
        }
    }

    /// Create a repository backed by a Cosmos DB gateway
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection cannot be resolved.
    pub fn connect(config: &RepositoryConfig, container: impl Into<String>) -> Result<Self> {
        let gateway = CosmosGateway::connect(config)?;
        Ok(Self::new(Arc::new(gateway), container, config.page_size))
    }

    pub fn container_name(&self) -> &str {
        &self.container
    }

    pub fn database_name(&self) -> &str {
        self.store.database_name()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Point read of `(id, partition_key)`
    ///
    /// A missing document and an empty answer are both `NotFound`.
    pub async fn get(&self, id: &str, partition_key: &str) -> Result<Lookup<T>> {
        if id.is_empty() {
            return Ok(Lookup::NotFound);
        }

        match self
            .store
            .read_item(&self.container, id, partition_key)
            .await
        {
            Ok(response) => match response.into_resource() {
                Some(body) => Ok(Lookup::Ok(decode(body)?)),
                None => Ok(Lookup::NotFound),
            },
            Err(err) if err.is_not_found() => {
                tracing::debug!(container = %self.container, id = %id, "Document not found");
                Ok(Lookup::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create `entity`; `Conflict` when its identity is already taken
    ///
    /// On success the entity passed in is returned, not the store's echo.
    pub async fn insert(&self, entity: T) -> Result<Insertion<T>> {
        let document = encode(&entity)?;

        match self
            .store
            .create_item(&self.container, entity.partition_key(), document)
            .await
        {
            Ok(_) => Ok(Insertion::Created(entity)),
            Err(err) if err.is_conflict() => {
                tracing::debug!(
                    container = %self.container,
                    id = %entity.id(),
                    "Document already exists"
                );
                Ok(Insertion::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the whole document at `(id, partition_key)` with `entity`
    pub async fn update(&self, entity: T, id: &str, partition_key: &str) -> Result<Lookup<T>> {
        if id.is_empty() {
            return Ok(Lookup::NotFound);
        }
        let document = encode(&entity)?;

        match self
            .store
            .replace_item(&self.container, id, partition_key, document)
            .await
        {
            Ok(_) => Ok(Lookup::Ok(entity)),
            Err(err) if err.is_not_found() => Ok(Lookup::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete `(id, partition_key)`
    ///
    /// Deleting twice yields `NoContent` then `NotFound`.
    pub async fn delete(&self, id: &str, partition_key: &str) -> Result<Deletion> {
        if id.is_empty() {
            return Ok(Deletion::NotFound);
        }

        match self
            .store
            .delete_item(&self.container, id, partition_key)
            .await
        {
            Ok(_) => Ok(Deletion::NoContent),
            Err(err) if err.is_not_found() => Ok(Deletion::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Create or replace `entity`
    ///
    /// Has no not-found or conflict outcome: every failure is an error.
    pub async fn upsert(&self, entity: T) -> Result<T> {
        let document = encode(&entity)?;

        self.store
            .upsert_item(&self.container, entity.partition_key(), document)
            .await?;

        Ok(entity)
    }

    /// Fetch exactly one page of `options.query`
    ///
    /// The page holds at most `options.max_item_count` items, else the
    /// repository page size. Feed the returned continuation token back in
    /// to fetch the next page; its absence marks the end of the results.
    pub async fn query(&self, options: &QueryOptions) -> Result<QueryPage<T>> {
        self.query_as(options).await
    }

    /// Like [`Repository::query`] for queries whose rows are not `T`
    /// (projections, aggregates)
    pub async fn query_as<R: DeserializeOwned>(
        &self,
        options: &QueryOptions,
    ) -> Result<QueryPage<R>> {
        let page = PageRequest {
            continuation_token: options.continuation_token.clone(),
            max_item_count: options.max_item_count.unwrap_or(self.page_size).max(1),
        };

        let raw = self
            .store
            .query_items(&self.container, &options.query, &page)
            .await?;

        tracing::debug!(
            container = %self.container,
            items = raw.values.len(),
            has_more = raw.continuation_token.is_some(),
            "Fetched query page"
        );

        let values = raw
            .values
            .into_iter()
            .map(decode)
            .collect::<Result<Vec<R>>>()?;

        Ok(QueryPage {
            values,
            continuation_token: raw.continuation_token,
        })
    }

    /// Run stored procedure `name` in `partition_key` with positional `params`
    ///
    /// `NotFound` when the store reports the procedure or its target missing,
    /// or when the procedure returns nothing.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        name: &str,
        partition_key: &str,
        params: &[Value],
    ) -> Result<Lookup<R>> {
        match self
            .store
            .execute_procedure(&self.container, name, partition_key, params)
            .await
        {
            Ok(response) => match response.into_resource() {
                Some(body) => Ok(Lookup::Ok(decode(body)?)),
                None => Ok(Lookup::NotFound),
            },
            Err(err) if err.is_not_found() => {
                tracing::debug!(container = %self.container, procedure = %name, "Procedure target not found");
                Ok(Lookup::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn encode<T: serde::Serialize>(entity: &T) -> Result<Value> {
    serde_json::to_value(entity).map_err(|e| {
        RepositoryError::Serialization(format!("Failed to serialize document: {e}"))
    })
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R> {
    serde_json::from_value(body).map_err(|e| {
        RepositoryError::Store(StoreError::InvalidResponse(format!(
            "Document does not match the expected shape: {e}"
        )))
    })
}
