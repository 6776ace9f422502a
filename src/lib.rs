// Cosmos Repo - Typed repository access to Azure Cosmos DB
// Copyright (c) 2025 Cosmos Repo Contributors
// Licensed under the MIT License

//! # Cosmos Repo
//!
//! A generic repository over a partitioned document database. Store status
//! codes never leak into business logic: every operation returns a small,
//! exhaustively matchable outcome type, and only unexpected failures travel
//! on the `Err` side.
//!
//! ## Architecture
//!
//! - [`domain`] - Outcome types, document identity, query types, errors
//! - [`config`] - Configuration management
//! - [`adapters`] - Store contract, Cosmos DB gateway, in-memory store
//! - [`core`] - Generic repository and the entity repository
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_repo::config::load_config;
//! use cosmos_repo::core::EntityRepository;
//! use cosmos_repo::domain::{Entity, Insertion, Lookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("cosmos-repo.toml")?;
//!     let repository_config = config.repository_config()?;
//!
//!     // Build once, pass everywhere
//!     let entities: EntityRepository = EntityRepository::from_config(&repository_config)?;
//!
//!     match entities.insert(Entity::new("1", "A", "x".to_string())).await? {
//!         Insertion::Created(entity) => println!("created {}", entity.id),
//!         Insertion::Conflict => println!("already there"),
//!     }
//!
//!     match entities.get("1", "A").await? {
//!         Lookup::Ok(entity) => println!("data = {}", entity.data),
//!         Lookup::NotFound => println!("gone"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Paging
//!
//! [`core::Repository::query`] fetches exactly one page. Feed the returned
//! continuation token back in, or let [`core::Repository::pages`] do it:
//!
//! ```rust,no_run
//! use cosmos_repo::core::EntityRepository;
//! use cosmos_repo::domain::QueryOptions;
//!
//! # async fn example(entities: EntityRepository) -> Result<(), Box<dyn std::error::Error>> {
//! let mut options = QueryOptions::new("SELECT * FROM c").with_max_item_count(50);
//! loop {
//!     let page = entities.query(&options).await?;
//!     for entity in &page.values {
//!         println!("{}", entity.id);
//!     }
//!     match page.continuation_token {
//!         Some(token) => options = options.with_continuation(Some(token)),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
