//! Request handlers for the management API.
//!
//! All handlers return `Result<Response, WorkhubError>` so that failures are
//! converted to the uniform 500 envelope via the `IntoResponse`
//! implementation on `WorkhubError`. Handlers are synchronous pass-throughs:
//! parse what the request carries, make one store call, render the result.
//! Nothing is retried; a store failure is the caller's answer.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Serialize;

use super::{render, AppState};
use crate::error::Result;
use crate::pagination::{parse_page, PageQuery};

/// Envelope for the paged job listings.
#[derive(Serialize)]
struct PagedJobs<T> {
    count: i64,
    jobs: Vec<T>,
}

#[derive(Serialize)]
struct StatusOk {
    status: &'static str,
}

const STATUS_OK: StatusOk = StatusOk { status: "ok" };

pub async fn queues(State(state): State<AppState>) -> Result<Response> {
    let queues = state.store.queues().await?;
    render(&queues)
}

pub async fn worker_pools(State(state): State<AppState>) -> Result<Response> {
    let heartbeats = state.store.worker_pool_heartbeats().await?;
    render(&heartbeats)
}

pub async fn busy_workers(State(state): State<AppState>) -> Result<Response> {
    let observations = state.store.worker_observations().await?;

    let busy: Vec<_> = observations
        .into_iter()
        .filter(|observation| observation.is_busy)
        .collect();

    render(&busy)
}

pub async fn retry_jobs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = parse_page(&query)?;
    let (jobs, count) = state.store.retry_jobs(page).await?;
    render(&PagedJobs { count, jobs })
}

pub async fn scheduled_jobs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = parse_page(&query)?;
    let (jobs, count) = state.store.scheduled_jobs(page).await?;
    render(&PagedJobs { count, jobs })
}

pub async fn dead_jobs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = parse_page(&query)?;
    let (jobs, count) = state.store.dead_jobs(page).await?;
    render(&PagedJobs { count, jobs })
}

pub async fn delete_dead_job(
    State(state): State<AppState>,
    Path((died_at, job_id)): Path<(String, String)>,
) -> Result<Response> {
    let died_at: i64 = died_at.parse()?;
    state.store.delete_dead_job(died_at, &job_id).await?;
    render(&STATUS_OK)
}

pub async fn retry_dead_job(
    State(state): State<AppState>,
    Path((died_at, job_id)): Path<(String, String)>,
) -> Result<Response> {
    let died_at: i64 = died_at.parse()?;
    state.store.retry_dead_job(died_at, &job_id).await?;
    render(&STATUS_OK)
}

pub async fn delete_all_dead_jobs(State(state): State<AppState>) -> Result<Response> {
    state.store.delete_all_dead_jobs().await?;
    render(&STATUS_OK)
}

pub async fn retry_all_dead_jobs(State(state): State<AppState>) -> Result<Response> {
    state.store.retry_all_dead_jobs().await?;
    render(&STATUS_OK)
}
