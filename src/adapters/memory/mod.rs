//! In-process document store
//!
//! [`MemoryStore`] answers exactly like the Cosmos DB gateway does, status
//! codes included, so a repository behaves the same on top of either. It
//! backs the integration tests and offline runs.

pub mod query;

use crate::adapters::store::{DocumentStore, StoreResponse, StoreResult};
use crate::domain::{
    PageRequest, QueryPage, QuerySpec, StoreError, ENTITY_PARTITION_KEY_PATH, STATUS_CONFLICT,
    STATUS_NOT_FOUND,
};
use async_trait::async_trait;
use query::Filter;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cosmos DB sub-status for a missing owner resource (database or container)
pub const SUB_STATUS_OWNER_MISSING: u32 = 1003;

const STATUS_BAD_REQUEST: u16 = 400;

/// A stored procedure: receives the partition key and the call parameters
pub type Procedure = Arc<dyn Fn(&str, &[Value]) -> StoreResult<Option<Value>> + Send + Sync>;

struct Container {
    partition_key_path: String,
    /// Keyed by `(partition key, id)`, which is also the query order
    documents: BTreeMap<(String, String), Value>,
    procedures: HashMap<String, Procedure>,
}

impl Container {
    fn new(partition_key_path: &str) -> Self {
        Self {
            partition_key_path: partition_key_path.to_string(),
            documents: BTreeMap::new(),
            procedures: HashMap::new(),
        }
    }

    /// Extract `(partition key, id)` from a document headed for `partition_key`
    fn key_of(&self, document: &Value, partition_key: &str) -> StoreResult<(String, String)> {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| bad_request("Document must have a non-empty string 'id'"))?;

        match document.pointer(&self.partition_key_path) {
            Some(Value::String(value)) if value == partition_key => {
                Ok((partition_key.to_string(), id.to_string()))
            }
            _ => Err(bad_request(&format!(
                "Partition key provided does not match the document's {}",
                self.partition_key_path
            ))),
        }
    }
}

/// In-memory implementation of [`DocumentStore`]
pub struct MemoryStore {
    database_name: String,
    containers: RwLock<HashMap<String, Container>>,
}

impl MemoryStore {
    /// Create an empty store; containers must be added before use
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            containers: RwLock::new(HashMap::new()),
        }
    }

    /// Add a container partitioned on `partition_key_path` (e.g. `/partition`)
    pub fn with_container(mut self, name: &str, partition_key_path: &str) -> Self {
        self.containers
            .get_mut()
            .insert(name.to_string(), Container::new(partition_key_path));
        self
    }

    /// Register a stored procedure
    ///
    /// The container is created with the default `/partition` key if it
    /// does not exist yet.
    pub fn with_procedure<F>(mut self, container: &str, name: &str, procedure: F) -> Self
    where
        F: Fn(&str, &[Value]) -> StoreResult<Option<Value>> + Send + Sync + 'static,
    {
        self.containers
            .get_mut()
            .entry(container.to_string())
            .or_insert_with(|| Container::new(ENTITY_PARTITION_KEY_PATH))
            .procedures
            .insert(name.to_string(), Arc::new(procedure));
        self
    }

    /// Add a container at runtime; an existing container is kept as is
    pub async fn create_container(&self, name: &str, partition_key_path: &str) {
        self.containers
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Container::new(partition_key_path));
    }

    /// Number of documents held in `container`
    pub async fn document_count(&self, container: &str) -> usize {
        self.containers
            .read()
            .await
            .get(container)
            .map_or(0, |c| c.documents.len())
    }
}

fn bad_request(message: &str) -> StoreError {
    StoreError::status_code(STATUS_BAD_REQUEST, message)
}

fn container_missing(container: &str) -> StoreError {
    StoreError::Status {
        status: STATUS_NOT_FOUND,
        sub_status: Some(SUB_STATUS_OWNER_MISSING),
        message: format!("Owner resource does not exist: container {container}"),
    }
}

fn document_missing() -> StoreError {
    StoreError::status_code(
        STATUS_NOT_FOUND,
        "Entity with the specified id does not exist in the system.",
    )
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse> {
        let containers = self.containers.read().await;
        let container = containers
            .get(container)
            .ok_or_else(|| container_missing(container))?;

        container
            .documents
            .get(&(partition_key.to_string(), id.to_string()))
            .map(|document| StoreResponse::new(200, Some(document.clone())))
            .ok_or_else(document_missing)
    }

    async fn create_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let mut containers = self.containers.write().await;
        let container = containers
            .get_mut(container)
            .ok_or_else(|| container_missing(container))?;

        let key = container.key_of(&document, partition_key)?;
        if container.documents.contains_key(&key) {
            return Err(StoreError::status_code(
                STATUS_CONFLICT,
                "Entity with the specified id already exists in the system.",
            ));
        }

        container.documents.insert(key, document.clone());
        Ok(StoreResponse::new(201, Some(document)))
    }

    async fn replace_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let mut containers = self.containers.write().await;
        let container = containers
            .get_mut(container)
            .ok_or_else(|| container_missing(container))?;

        let key = container.key_of(&document, partition_key)?;
        if key.1 != id {
            return Err(bad_request(
                "The id in the document body does not match the id in the request",
            ));
        }

        match container.documents.get_mut(&key) {
            Some(existing) => {
                *existing = document.clone();
                Ok(StoreResponse::new(200, Some(document)))
            }
            None => Err(document_missing()),
        }
    }

    async fn upsert_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let mut containers = self.containers.write().await;
        let container = containers
            .get_mut(container)
            .ok_or_else(|| container_missing(container))?;

        let key = container.key_of(&document, partition_key)?;
        let status = match container.documents.insert(key, document.clone()) {
            Some(_) => 200,
            None => 201,
        };

        Ok(StoreResponse::new(status, Some(document)))
    }

    async fn delete_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse> {
        let mut containers = self.containers.write().await;
        let container = containers
            .get_mut(container)
            .ok_or_else(|| container_missing(container))?;

        container
            .documents
            .remove(&(partition_key.to_string(), id.to_string()))
            .map(|_| StoreResponse::new(204, None))
            .ok_or_else(document_missing)
    }

    async fn query_items(
        &self,
        container: &str,
        query: &QuerySpec,
        page: &PageRequest,
    ) -> StoreResult<QueryPage<Value>> {
        let filter = Filter::parse(query).map_err(|message| bad_request(&message))?;

        let offset = match &page.continuation_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| bad_request("Invalid continuation token"))?,
            None => 0,
        };
        let max_item_count = page.max_item_count.max(1) as usize;

        let containers = self.containers.read().await;
        let container = containers
            .get(container)
            .ok_or_else(|| container_missing(container))?;

        let mut matching = container
            .documents
            .values()
            .filter(|document| filter.matches(document))
            .skip(offset);

        let values: Vec<Value> = matching.by_ref().take(max_item_count).cloned().collect();
        let continuation_token = matching
            .next()
            .map(|_| (offset + values.len()).to_string());

        Ok(QueryPage {
            values,
            continuation_token,
        })
    }

    async fn execute_procedure(
        &self,
        container: &str,
        name: &str,
        partition_key: &str,
        params: &[Value],
    ) -> StoreResult<StoreResponse> {
        let procedure = {
            let containers = self.containers.read().await;
            let container = containers
                .get(container)
                .ok_or_else(|| container_missing(container))?;

            container.procedures.get(name).cloned().ok_or_else(|| {
                StoreError::status_code(
                    STATUS_NOT_FOUND,
                    format!("Stored procedure {name} does not exist"),
                )
            })?
        };

        let body = procedure(partition_key, params)?;
        Ok(StoreResponse::new(200, body))
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }
}
