//! Exec command implementation

use super::{parse_json_arg, print_json, CliRepository};
use crate::cli::{exit_code, exit_code_for};
use crate::domain::Lookup;
use crate::{log_error_with_context, log_outcome};
use clap::Args;
use serde_json::Value;

/// Arguments for the exec command
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Stored procedure name
    pub name: String,

    /// Partition key value the procedure runs in
    #[arg(long)]
    pub partition: String,

    /// Positional parameter, parsed as JSON when possible (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,
}

impl ExecArgs {
    fn parameters(&self) -> Vec<Value> {
        self.params.iter().map(|p| parse_json_arg(p)).collect()
    }

    /// Execute the stored procedure
    pub async fn execute(&self, repository: &CliRepository) -> anyhow::Result<i32> {
        let lookup = match repository
            .execute::<Value>(&self.name, &self.partition, &self.parameters())
            .await
        {
            Ok(lookup) => lookup,
            Err(e) => {
                log_error_with_context!(&e, "stored procedure failed");
                println!("❌ Stored procedure {} failed", self.name);
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        log_outcome!("exec", self.name, lookup.kind());

        match lookup {
            Lookup::Ok(result) => {
                print_json(&result)?;
                Ok(exit_code::SUCCESS)
            }
            Lookup::NotFound => {
                println!(
                    "❌ Not found: procedure {} in partition {}, or it returned nothing",
                    self.name, self.partition
                );
                Ok(exit_code::OUTCOME)
            }
        }
    }
}
