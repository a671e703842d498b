//! Dead-set actions: delete or requeue a single job, or the whole set.

use anyhow::Result;
use clap::Subcommand;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum DeadCommands {
    /// Delete a single dead job
    Delete {
        /// Death timestamp (epoch seconds) identifying the job
        died_at: i64,
        /// Job id identifying the job
        job_id: String,
    },

    /// Put a single dead job back on its origin queue
    Requeue {
        /// Death timestamp (epoch seconds) identifying the job
        died_at: i64,
        /// Job id identifying the job
        job_id: String,
    },

    /// Delete every dead job
    Purge {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Put every dead job back on its origin queue
    RequeueAll {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

pub async fn execute(cmd: DeadCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        DeadCommands::Delete { died_at, job_id } => {
            let resp: StatusResponse = client
                .post(&format!("/delete_dead_job/{}/{}", died_at, job_id))
                .await?;
            report(&resp, &format!("Deleted dead job {} ({})", job_id, died_at), format);
        }

        DeadCommands::Requeue { died_at, job_id } => {
            let resp: StatusResponse = client
                .post(&format!("/retry_dead_job/{}/{}", died_at, job_id))
                .await?;
            report(&resp, &format!("Requeued dead job {} ({})", job_id, died_at), format);
        }

        DeadCommands::Purge { force } => {
            if !force {
                output::print_info("This will delete every dead job. Use --force to confirm.");
                return Ok(());
            }
            let resp: StatusResponse = client.post("/delete_all_dead_jobs").await?;
            report(&resp, "Dead set purged", format);
        }

        DeadCommands::RequeueAll { force } => {
            if !force {
                output::print_info("This will requeue every dead job. Use --force to confirm.");
                return Ok(());
            }
            let resp: StatusResponse = client.post("/retry_all_dead_jobs").await?;
            report(&resp, "Dead set requeued", format);
        }
    }

    Ok(())
}

fn report(resp: &StatusResponse, message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => output::print_success(message),
        _ => output::print_item(&serde_json::json!({ "status": resp.status }), format),
    }
}
