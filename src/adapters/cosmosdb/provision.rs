//! Database and container provisioning
//!
//! Provisioning uses the Azure SDK management surface. Document traffic goes
//! through [`CosmosGateway`](super::CosmosGateway) instead.

use crate::adapters::cosmosdb::connection::AccountCredentials;
use crate::config::RepositoryConfig;
use crate::domain::{RepositoryError, Result};
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::DatabaseClient;
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
    ThroughputProperties,
};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, CreateContainerOptions};
use secrecy::ExposeSecret;
use std::borrow::Cow;

/// Creates the database and containers a repository expects
pub struct Provisioner {
    client: CosmosClient,
    database: DatabaseClient,
    database_name: String,
}

impl Provisioner {
    /// Create a provisioner from repository configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be resolved or the SDK
    /// client cannot be created.
    pub fn connect(config: &RepositoryConfig) -> Result<Self> {
        let credentials = AccountCredentials::from_connection(&config.connection)?;
        let key = Secret::new(credentials.key.expose_secret().as_ref().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(credentials.endpoint.as_str(), key, options)
            .map_err(|e| {
                RepositoryError::Provisioning(format!("Failed to create Cosmos client: {e}"))
            })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            database_name: config.database_name.clone(),
        })
    }

    /// Ensure the database exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub async fn ensure_database_exists(&self) -> Result<()> {
        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %self.database_name, "Database already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(database = %self.database_name, "Creating database");

                self.client
                    .create_database(&self.database_name, None)
                    .await
                    .map_err(|e| {
                        RepositoryError::Provisioning(format!(
                            "Failed to create database {}: {e}",
                            self.database_name
                        ))
                    })?;

                tracing::info!(database = %self.database_name, "Database created successfully");
                Ok(())
            }
        }
    }

    /// Ensure a container exists, creating it with a hash partition key
    /// on `partition_key_path` if necessary
    ///
    /// A new container gets `throughput` RU/s of manual throughput, or the
    /// account default when `None`. An existing container is left
    /// untouched, whatever its partition key or throughput.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    pub async fn ensure_container_exists(
        &self,
        container_name: &str,
        partition_key_path: &str,
        throughput: Option<u32>,
    ) -> Result<()> {
        let container = self.database.container_client(container_name);

        match container.read(None).await {
            Ok(_) => {
                tracing::info!(container = %container_name, "Container already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(
                    container = %container_name,
                    partition_key = %partition_key_path,
                    throughput = ?throughput,
                    "Creating container"
                );

                let properties = ContainerProperties {
                    id: Cow::Owned(container_name.to_string()),
                    partition_key: PartitionKeyDefinition {
                        paths: vec![partition_key_path.to_string()],
                        kind: PartitionKeyKind::Hash,
                        version: None,
                    },
                    indexing_policy: Some(IndexingPolicy::default()),
                    ..Default::default()
                };

                let options = throughput.map(|ru| CreateContainerOptions {
                    throughput: Some(ThroughputProperties::manual(ru as usize)),
                    ..Default::default()
                });

                self.database
                    .create_container(properties, options)
                    .await
                    .map_err(|e| {
                        RepositoryError::Provisioning(format!(
                            "Failed to create container {container_name}: {e}"
                        ))
                    })?;

                tracing::info!(container = %container_name, "Container created successfully");
                Ok(())
            }
        }
    }
}
