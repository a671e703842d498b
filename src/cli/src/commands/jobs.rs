//! Paged browsing of the retry, scheduled, and dead job sets.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, format_timestamp, OutputFormat};

#[derive(Subcommand)]
pub enum JobCommands {
    /// Jobs waiting for a retry after a failure
    Retry(PageArgs),

    /// Jobs scheduled to run in the future
    Scheduled(PageArgs),

    /// Jobs that exhausted their retries
    Dead(PageArgs),
}

#[derive(Args)]
pub struct PageArgs {
    /// 1-based page number (20 jobs per page)
    #[arg(long, default_value_t = 1)]
    pub page: u64,
}

/// One entry of a paged listing; `at` is the set-specific timestamp
/// (retry_at / run_at / died_at).
#[derive(Debug, Deserialize)]
struct JobEntry {
    #[serde(alias = "retry_at", alias = "run_at", alias = "died_at")]
    at: i64,
    name: String,
    id: String,
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    fails: u32,
}

#[derive(Debug, Deserialize)]
struct PagedJobs {
    count: i64,
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Serialize, Tabled)]
struct JobRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Job")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Fails")]
    fails: u32,
    #[tabled(rename = "Error")]
    err: String,
}

pub async fn execute(cmd: JobCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (path, page) = match &cmd {
        JobCommands::Retry(args) => ("/retry_jobs", args.page),
        JobCommands::Scheduled(args) => ("/scheduled_jobs", args.page),
        JobCommands::Dead(args) => ("/dead_jobs", args.page),
    };

    let listing: PagedJobs = client.get(&format!("{}?page={}", path, page)).await?;

    let rows: Vec<JobRow> = listing
        .jobs
        .into_iter()
        .map(|job| JobRow {
            when: format_timestamp(job.at),
            name: job.name,
            id: job.id,
            fails: job.fails,
            err: job.err.unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let footer = format!("page {} of {} jobs total", page, listing.count);
    output::print_list(&rows, Some(&footer), format);
    Ok(())
}
