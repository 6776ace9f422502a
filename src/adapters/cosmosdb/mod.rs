//! Azure Cosmos DB integration
//!
//! - [`client`] - REST gateway implementing [`DocumentStore`](crate::adapters::store::DocumentStore)
//! - [`provision`] - database and container creation through the Azure SDK
//! - [`connection`] - connection string and endpoint/key resolution
//! - [`auth`] - master-key request signing

pub mod auth;
pub mod client;
pub mod connection;
pub mod provision;

pub use client::CosmosGateway;
pub use connection::{parse_connection_string, AccountCredentials};
pub use provision::Provisioner;
