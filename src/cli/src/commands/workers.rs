//! Worker pool commands: heartbeat listing and busy-worker snapshot.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, format_timestamp, OutputFormat};

#[derive(Subcommand)]
pub enum WorkerCommands {
    /// Show the latest heartbeat per worker pool
    Pools,

    /// Show workers currently processing a job
    Busy,
}

#[derive(Debug, Deserialize)]
struct Heartbeat {
    worker_pool_id: String,
    heartbeat_at: i64,
    started_at: i64,
    job_names: Vec<String>,
    concurrency: u32,
    host: String,
    pid: i32,
    worker_ids: Vec<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct PoolRow {
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Concurrency")]
    concurrency: u32,
    #[tabled(rename = "Workers")]
    workers: usize,
    #[tabled(rename = "Jobs")]
    jobs: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Last heartbeat")]
    heartbeat: String,
}

#[derive(Debug, Deserialize)]
struct Observation {
    worker_id: String,
    job_name: String,
    job_id: String,
    started_at: i64,
    checkin: String,
}

#[derive(Debug, Serialize, Tabled)]
struct BusyRow {
    #[tabled(rename = "Worker")]
    worker: String,
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Job ID")]
    job_id: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Checkin")]
    checkin: String,
}

pub async fn execute(cmd: WorkerCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        WorkerCommands::Pools => {
            let heartbeats: Vec<Heartbeat> = client.get("/worker_pools").await?;
            let rows: Vec<PoolRow> = heartbeats
                .into_iter()
                .map(|hb| PoolRow {
                    pool: hb.worker_pool_id,
                    host: format!("{} (pid {})", hb.host, hb.pid),
                    concurrency: hb.concurrency,
                    workers: hb.worker_ids.len(),
                    jobs: hb.job_names.join(", "),
                    started: format_timestamp(hb.started_at),
                    heartbeat: format_timestamp(hb.heartbeat_at),
                })
                .collect();
            output::print_list(&rows, None, format);
        }

        WorkerCommands::Busy => {
            let observations: Vec<Observation> = client.get("/busy_workers").await?;
            let footer = format!("{} busy", observations.len());
            let rows: Vec<BusyRow> = observations
                .into_iter()
                .map(|ob| BusyRow {
                    worker: ob.worker_id,
                    job: ob.job_name,
                    job_id: ob.job_id,
                    started: format_timestamp(ob.started_at),
                    checkin: if ob.checkin.is_empty() { "-".to_string() } else { ob.checkin },
                })
                .collect();
            output::print_list(&rows, Some(&footer), format);
        }
    }

    Ok(())
}
