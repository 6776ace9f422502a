//! Get command implementation

use super::{print_json, CliRepository};
use crate::cli::{exit_code, exit_code_for};
use crate::domain::Lookup;
use crate::{log_error_with_context, log_outcome};
use clap::Args;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Document id
    #[arg(long)]
    pub id: String,

    /// Partition key value
    #[arg(long)]
    pub partition: String,
}

impl GetArgs {
    /// Execute the get command
    pub async fn execute(&self, repository: &CliRepository) -> anyhow::Result<i32> {
        let lookup = match repository.get(&self.id, &self.partition).await {
            Ok(lookup) => lookup,
            Err(e) => {
                log_error_with_context!(&e, "get failed");
                println!("❌ Failed to read entity {}/{}", self.partition, self.id);
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        log_outcome!("get", self.id, lookup.kind());

        match lookup {
            Lookup::Ok(entity) => {
                print_json(&entity)?;
                Ok(exit_code::SUCCESS)
            }
            Lookup::NotFound => {
                println!("❌ Not found: {}/{}", self.partition, self.id);
                Ok(exit_code::OUTCOME)
            }
        }
    }
}
