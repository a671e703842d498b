//! Workhub CLI - command-line interface for the workhub management gateway.
//!
//! Provides commands for inspecting queues, worker pools, and the
//! retry/scheduled/dead job sets, and for acting on dead jobs.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config, dead, jobs, queues, workers};
use output::OutputFormat;

/// Workhub - job queue management CLI
#[derive(Parser)]
#[command(
    name = "workhub",
    version = "0.1.0",
    about = "Inspect and manage workhub job queues",
    long_about = "CLI tool for the workhub management gateway: queue depths, worker pools, and dead-job handling.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Gateway URL
    #[arg(long, global = true, env = "WORKHUB_API_URL")]
    api_url: Option<String>,

    /// Admin username
    #[arg(short = 'u', long, global = true, env = "WORKHUB_USERNAME")]
    username: Option<String>,

    /// Admin password
    #[arg(short = 'p', long, global = true, env = "WORKHUB_PASSWORD")]
    password: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List queues with their depth and latency
    Queues(queues::QueuesArgs),

    /// Worker pool operations
    #[command(subcommand)]
    Workers(workers::WorkerCommands),

    /// Browse the retry, scheduled, and dead job sets
    #[command(subcommand)]
    Jobs(jobs::JobCommands),

    /// Act on the dead job set
    #[command(subcommand)]
    Dead(dead::DeadCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| config::load_value("api-url"))
        .unwrap_or_else(|| "http://localhost:5040".to_string());
    let username = cli.username.clone().or_else(|| config::load_value("username"));
    let password = cli.password.clone();

    let client = client::ApiClient::new(&api_url, username, password)?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Queues(args) => queues::execute(args, &client, format).await,
        Commands::Workers(cmd) => workers::execute(cmd, &client, format).await,
        Commands::Jobs(cmd) => jobs::execute(cmd, &client, format).await,
        Commands::Dead(cmd) => dead::execute(cmd, &client, format).await,
        Commands::Config(cmd) => config::execute(cmd, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
