//! Queue listing command.

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct QueuesArgs {}

#[derive(Debug, Serialize, Deserialize, Tabled)]
struct QueueRow {
    #[tabled(rename = "Queue")]
    job_name: String,
    #[tabled(rename = "Pending")]
    count: i64,
    #[tabled(rename = "Latency (s)")]
    latency: i64,
}

pub async fn execute(_args: QueuesArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let queues: Vec<QueueRow> = client.get("/queues").await?;
    output::print_list(&queues, None, format);
    Ok(())
}
