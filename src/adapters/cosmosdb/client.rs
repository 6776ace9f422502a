//! Cosmos DB REST gateway
//!
//! This module implements [`DocumentStore`] on top of the Cosmos DB REST
//! API. Each method is exactly one HTTP round trip, signed with the account
//! master key. Non-success answers become [`StoreError::Status`] carrying
//! the HTTP status, the `x-ms-substatus` header and the message from the
//! error body.

use crate::adapters::cosmosdb::auth::{request_date, MasterKey};
use crate::adapters::cosmosdb::connection::AccountCredentials;
use crate::adapters::store::{DocumentStore, StoreResponse, StoreResult};
use crate::config::RepositoryConfig;
use crate::domain::{PageRequest, QueryPage, QuerySpec, RepositoryError, Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// REST API version sent with every request
pub const API_VERSION: &str = "2018-12-31";

const HEADER_DATE: &str = "x-ms-date";
const HEADER_VERSION: &str = "x-ms-version";
const HEADER_PARTITION_KEY: &str = "x-ms-documentdb-partitionkey";
const HEADER_IS_UPSERT: &str = "x-ms-documentdb-is-upsert";
const HEADER_IS_QUERY: &str = "x-ms-documentdb-isquery";
const HEADER_CROSS_PARTITION: &str = "x-ms-documentdb-query-enablecrosspartition";
const HEADER_MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
const HEADER_CONTINUATION: &str = "x-ms-continuation";
const HEADER_SUBSTATUS: &str = "x-ms-substatus";

/// Error body returned by the gateway
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Body of a query page
#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(rename = "Documents", default)]
    documents: Vec<Value>,
}

/// Raw successful answer
struct GatewayResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Value>,
}

/// Cosmos DB gateway client bound to one database
///
/// Safe to share across concurrent calls: it holds only immutable state and
/// a pooled HTTP client.
#[derive(Debug)]
pub struct CosmosGateway {
    http: Client,
    endpoint: Url,
    key: MasterKey,
    database_name: String,
}

impl CosmosGateway {
    /// Create a gateway from repository configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection cannot be resolved or
    /// the HTTP client cannot be built.
    pub fn connect(config: &RepositoryConfig) -> Result<Self> {
        let credentials = AccountCredentials::from_connection(&config.connection)?;
        Self::new(credentials, &config.database_name, config.request_timeout)
    }

    /// Create a gateway from resolved credentials
    pub fn new(
        credentials: AccountCredentials,
        database_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let key = MasterKey::from_secret(&credentials.key)?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cosmos-repo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                RepositoryError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let database_name = database_name.into();

        tracing::debug!(
            endpoint = %credentials.endpoint,
            database = %database_name,
            "Cosmos DB gateway created"
        );

        Ok(Self {
            http,
            endpoint: credentials.endpoint,
            key,
            database_name,
        })
    }

    /// Account endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn collection_link(&self, container: &str) -> String {
        format!("dbs/{}/colls/{}", self.database_name, container)
    }

    /// Link of one document
    ///
    /// An empty id would address the document feed, so it is rejected.
    fn document_link(&self, container: &str, id: &str) -> StoreResult<String> {
        if id.is_empty() {
            return Err(StoreError::InvalidRequest(
                "Document id must not be empty".to_string(),
            ));
        }
        Ok(format!("{}/docs/{}", self.collection_link(container), id))
    }

    fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest("endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a signed request
    ///
    /// `resource_link` is the signed link; `segments` are the URL path
    /// segments, percent-encoded by `url`.
    fn request(
        &self,
        method: Method,
        resource_type: &str,
        resource_link: &str,
        segments: &[&str],
    ) -> StoreResult<RequestBuilder> {
        let url = self.url(segments)?;
        let date = request_date(Utc::now());
        let authorization = self
            .key
            .authorization(method.as_str(), resource_type, resource_link, &date);

        Ok(self
            .http
            .request(method, url)
            .header("authorization", authorization)
            .header(HEADER_DATE, date)
            .header(HEADER_VERSION, API_VERSION)
            .header("accept", "application/json"))
    }

    async fn dispatch(&self, request: RequestBuilder) -> StoreResult<GatewayResponse> {
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                StoreError::InvalidRequest(e.to_string())
            } else {
                StoreError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(status_error(status, &headers, &bytes));
        }

        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::InvalidResponse(format!("Response body is not JSON: {e}"))
            })?)
        };

        Ok(GatewayResponse {
            status,
            headers,
            body,
        })
    }

    async fn point(&self, request: RequestBuilder) -> StoreResult<StoreResponse> {
        let response = self.dispatch(request).await?;
        Ok(StoreResponse::new(response.status.as_u16(), response.body))
    }
}

fn partition_key_header(partition_key: &str) -> StoreResult<String> {
    serde_json::to_string(&[partition_key])
        .map_err(|e| StoreError::InvalidRequest(format!("Unencodable partition key: {e}")))
}

fn json_body(document: &impl serde::Serialize) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(document)
        .map_err(|e| StoreError::InvalidRequest(format!("Unencodable request body: {e}")))
}

fn status_error(status: StatusCode, headers: &HeaderMap, bytes: &[u8]) -> StoreError {
    let sub_status = headers
        .get(HEADER_SUBSTATUS)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok());

    let message = match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(ErrorBody {
            code: Some(code),
            message: Some(message),
        }) => format!("{code}: {message}"),
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            code: Some(code), ..
        }) => code,
        _ => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };

    StoreError::Status {
        status: status.as_u16(),
        sub_status,
        message,
    }
}

#[async_trait]
impl DocumentStore for CosmosGateway {
    async fn read_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse> {
        let link = self.document_link(container, id)?;
        let request = self
            .request(
                Method::GET,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs", id],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?);

        tracing::debug!(container = %container, id = %id, "Reading document");
        self.point(request).await
    }

    async fn create_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let link = self.collection_link(container);
        let request = self
            .request(
                Method::POST,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs"],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?)
            .header("content-type", "application/json")
            .body(json_body(&document)?);

        tracing::debug!(container = %container, "Creating document");
        self.point(request).await
    }

    async fn replace_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let link = self.document_link(container, id)?;
        let request = self
            .request(
                Method::PUT,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs", id],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?)
            .header("content-type", "application/json")
            .body(json_body(&document)?);

        tracing::debug!(container = %container, id = %id, "Replacing document");
        self.point(request).await
    }

    async fn upsert_item(
        &self,
        container: &str,
        partition_key: &str,
        document: Value,
    ) -> StoreResult<StoreResponse> {
        let link = self.collection_link(container);
        let request = self
            .request(
                Method::POST,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs"],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?)
            .header(HEADER_IS_UPSERT, "True")
            .header("content-type", "application/json")
            .body(json_body(&document)?);

        tracing::debug!(container = %container, "Upserting document");
        self.point(request).await
    }

    async fn delete_item(
        &self,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<StoreResponse> {
        let link = self.document_link(container, id)?;
        let request = self
            .request(
                Method::DELETE,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs", id],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?);

        tracing::debug!(container = %container, id = %id, "Deleting document");
        self.point(request).await
    }

    async fn query_items(
        &self,
        container: &str,
        query: &QuerySpec,
        page: &PageRequest,
    ) -> StoreResult<QueryPage<Value>> {
        let link = self.collection_link(container);
        let mut request = self
            .request(
                Method::POST,
                "docs",
                &link,
                &["dbs", &self.database_name, "colls", container, "docs"],
            )?
            .header(HEADER_IS_QUERY, "True")
            .header(HEADER_CROSS_PARTITION, "True")
            .header(HEADER_MAX_ITEM_COUNT, page.max_item_count.to_string())
            .header("content-type", "application/query+json")
            .body(json_body(query)?);

        if let Some(token) = &page.continuation_token {
            request = request.header(HEADER_CONTINUATION, token.as_str());
        }

        tracing::debug!(
            container = %container,
            max_item_count = page.max_item_count,
            resuming = page.continuation_token.is_some(),
            "Querying documents"
        );

        let response = self.dispatch(request).await?;

        let continuation_token = response
            .headers
            .get(HEADER_CONTINUATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let body: QueryBody = match response.body {
            Some(body) => serde_json::from_value(body).map_err(|e| {
                StoreError::InvalidResponse(format!("Unexpected query page shape: {e}"))
            })?,
            None => QueryBody {
                documents: Vec::new(),
            },
        };

        Ok(QueryPage {
            values: body.documents,
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
        let link = format!("{}/sprocs/{}", self.collection_link(container), name);
        let request = self
            .request(
                Method::POST,
                "sprocs",
                &link,
                &["dbs", &self.database_name, "colls", container, "sprocs", name],
            )?
            .header(HEADER_PARTITION_KEY, partition_key_header(partition_key)?)
            .header("content-type", "application/json")
            .body(json_body(&params)?);

        tracing::debug!(
            container = %container,
            procedure = %name,
            params = params.len(),
            "Executing stored procedure"
        );
        self.point(request).await
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }
}
