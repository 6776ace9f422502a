//! Document store contract
//!
//! This module defines what the repository needs from a partitioned document
//! store. Implementations answer every non-success with
//! [`StoreError::Status`](crate::domain::StoreError::Status) so that the
//! repository can classify the two codes it absorbs (404 and 409) the same
//! way for every backend.

use crate::domain::{PageRequest, QueryPage, QuerySpec};
use async_trait::async_trait;
use serde_json::Value;
use std::result::Result as StdResult;

/// Result of a store round trip
pub type StoreResult<T> = StdResult<T, crate::domain::StoreError>;

/// Successful answer to a point operation or procedure call
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    /// HTTP status code of the answer (2xx)
    pub status: u16,

    /// Returned resource, if the store sent one
    pub body: Option<Value>,
}

impl StoreResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// The body, treating JSON `null` like an absent body
    pub fn into_resource(self) -> Option<Value> {
        self.body.filter(|value| !value.is_null())
    }
}

/// A partitioned document store bound to one database
///
/// Every method addresses a container by name and issues exactly one round
/// trip. Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read of `(id, partition_key)`
    async fn read_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse>;

    /// Create a new document; 409 when the id is taken in the partition
    async fn create_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse>;

    /// Replace the whole document at `(id, partition_key)`; 404 when absent
    async fn replace_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse>;

    /// Create or replace
    async fn upsert_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse>;

    /// Delete `(id, partition_key)`; 404 when absent
    async fn delete_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse>;

    /// Fetch exactly one page of a query
    async fn query_items(
        &self,
        container: &str,
        query: &QuerySpec,
        page: &PageRequest,
    ) -> StoreResult<QueryPage<Value>>;

    /// Run a stored procedure scoped to one partition
    async fn execute_procedure(
        &self,
        container: &str,
        name: &str,
        partition_key: &str,
        params: &[Value],
    ) -> StoreResult<StoreResponse>;

    /// Database this store is bound to
    fn database_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_body_is_no_resource() {
        assert_eq!(StoreResponse::new(200, Some(Value::Null)).into_resource(), None);
        assert_eq!(StoreResponse::new(204, None).into_resource(), None);
        assert_eq!(
            StoreResponse::new(200, Some(json!({"id": "1"}))).into_resource(),
            Some(json!({"id": "1"}))
        );
    }
}
