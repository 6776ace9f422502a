//! Delete command implementation

use super::CliRepository;
use crate::cli::{exit_code, exit_code_for};
use crate::domain::Deletion;
use crate::{log_error_with_context, log_outcome};
use clap::Args;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document id
    #[arg(long)]
    pub id: String,

    /// Partition key value
    #[arg(long)]
    pub partition: String,
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(&self, repository: &CliRepository) -> anyhow::Result<i32> {
        let deletion = match repository.delete(&self.id, &self.partition).await {
            Ok(deletion) => deletion,
            Err(e) => {
                log_error_with_context!(&e, "delete failed");
                println!("❌ Failed to delete entity {}/{}", self.partition, self.id);
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        log_outcome!("delete", self.id, deletion.kind());

        match deletion {
            Deletion::NoContent => {
                println!("✅ Deleted {}/{}", self.partition, self.id);
                Ok(exit_code::SUCCESS)
            }
            Deletion::NotFound => {
                println!("❌ Not found: {}/{}", self.partition, self.id);
                Ok(exit_code::OUTCOME)
            }
        }
    }
}
