//! Document store backends
//!
//! - [`store`] - the [`DocumentStore`](store::DocumentStore) contract
//! - [`cosmosdb`] - Azure Cosmos DB gateway and provisioning
//! - [`memory`] - in-process store with the same status semantics
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the store behind a
//! trait. The repository layer only ever sees `Arc<dyn DocumentStore>`, so
//! tests run the same code paths against [`memory::MemoryStore`].
//!
//! ```rust,no_run
//! use cosmos_repo::adapters::cosmosdb::CosmosGateway;
//! use cosmos_repo::config::{secret_string, Connection, RepositoryConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RepositoryConfig::new(
//!     Connection::Key {
//!         endpoint: "https://account.documents.azure.com:443/".to_string(),
//!         key: secret_string("a2V5".to_string()),
//!     },
//!     "appdb",
//!     100,
//! );
//!
//! let gateway = CosmosGateway::connect(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod memory;
pub mod store;
