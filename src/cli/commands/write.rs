//! Insert, update and upsert commands

use super::{parse_json_arg, print_json, CliRepository};
use crate::cli::{exit_code, exit_code_for};
use crate::domain::{Entity, Insertion, Lookup, OutcomeKind, Result};
use crate::{log_error_with_context, log_outcome};
use clap::Args;
use uuid::Uuid;

/// Which write a [`WriteArgs`] invocation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Insert,
    Update,
    Upsert,
}

impl WriteOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOperation::Insert => "insert",
            WriteOperation::Update => "update",
            WriteOperation::Upsert => "upsert",
        }
    }
}

/// Arguments shared by insert, update and upsert
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Document id; insert and upsert generate a UUID when omitted
    #[arg(long)]
    pub id: Option<String>,

    /// Partition key value
    #[arg(long)]
    pub partition: String,

    /// Payload: JSON, or a plain string
    #[arg(long)]
    pub data: String,
}

impl WriteArgs {
    /// The target id: given, or generated for writes that may create
    fn resolve_id(&self, operation: WriteOperation) -> Option<String> {
        match (&self.id, operation) {
            (Some(id), _) => Some(id.clone()),
            (None, WriteOperation::Update) => None,
            (None, _) => Some(Uuid::new_v4().to_string()),
        }
    }

    fn entity(&self, id: &str) -> Entity<serde_json::Value> {
        Entity::new(id, &self.partition, parse_json_arg(&self.data))
    }

    /// Execute the write
    pub async fn execute(
        &self,
        operation: WriteOperation,
        repository: &CliRepository,
    ) -> anyhow::Result<i32> {
        let Some(id) = self.resolve_id(operation) else {
            println!("❌ --id is required for {}", operation.as_str());
            return Ok(exit_code::CONFIGURATION);
        };

        let result = match operation {
            WriteOperation::Insert => self.insert(&id, repository).await,
            WriteOperation::Update => self.update(&id, repository).await,
            WriteOperation::Upsert => self.upsert(&id, repository).await,
        };

        let (kind, entity) = match result {
            Ok(written) => written,
            Err(e) => {
                log_error_with_context!(&e, operation.as_str());
                println!(
                    "❌ Failed to {} entity {}/{id}",
                    operation.as_str(),
                    self.partition
                );
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        log_outcome!(operation.as_str(), id, kind);

        match entity {
            Some(entity) => {
                println!("✅ {kind}");
                print_json(&entity)?;
                Ok(exit_code::SUCCESS)
            }
            None => {
                println!("❌ {kind}: {}/{id}", self.partition);
                Ok(exit_code::OUTCOME)
            }
        }
    }

    async fn insert(
        &self,
        id: &str,
        repository: &CliRepository,
    ) -> Result<(OutcomeKind, Option<Entity<serde_json::Value>>)> {
        let insertion = repository.insert(self.entity(id)).await?;
        let kind = insertion.kind();
        Ok(match insertion {
            Insertion::Created(entity) => (kind, Some(entity)),
            Insertion::Conflict => (kind, None),
        })
    }

    async fn update(
        &self,
        id: &str,
        repository: &CliRepository,
    ) -> Result<(OutcomeKind, Option<Entity<serde_json::Value>>)> {
        let lookup = repository
            .update(self.entity(id), id, &self.partition)
            .await?;
        let kind = lookup.kind();
        Ok(match lookup {
            Lookup::Ok(entity) => (kind, Some(entity)),
            Lookup::NotFound => (kind, None),
        })
    }

    async fn upsert(
        &self,
        id: &str,
        repository: &CliRepository,
    ) -> Result<(OutcomeKind, Option<Entity<serde_json::Value>>)> {
        let entity = repository.upsert(self.entity(id)).await?;
        Ok((OutcomeKind::Ok, Some(entity)))
    }
}
