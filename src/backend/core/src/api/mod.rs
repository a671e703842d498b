//! HTTP API for the workhub gateway.
//!
//! The router exposes six read endpoints over the store (queue depths,
//! worker-pool heartbeats, busy workers, and the three paged job sets) and
//! four write endpoints mutating the dead set. Every API route sits behind
//! the Basic-auth gate and the JSON content-type stamp; the dashboard assets
//! at `/` and `/work.js` are served unauthenticated.

mod handlers;
mod render;

pub use render::render;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::assets;
use crate::middleware::{basic_auth, content_type, AdminCredential};
use crate::store::JobStore;

/// Application state shared across handlers.
///
/// Constructed once at startup and cloned per request; the store handle is
/// the only shared resource and must be safe for concurrent use.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }
}

/// Build the gateway router.
///
/// # Endpoints
///
/// ## Inspection (GET)
/// - `/queues` - Queue listing with depth and latency
/// - `/worker_pools` - Latest heartbeat per worker pool
/// - `/busy_workers` - Worker observations filtered to busy workers
/// - `/retry_jobs`, `/scheduled_jobs`, `/dead_jobs` - Paged job sets
///
/// ## Dead-set mutation (POST)
/// - `/delete_dead_job/:died_at/:job_id`, `/retry_dead_job/:died_at/:job_id`
/// - `/delete_all_dead_jobs`, `/retry_all_dead_jobs`
///
/// ## Dashboard (GET, unauthenticated)
/// - `/` and `/work.js`
pub fn build_router(state: AppState, credential: AdminCredential) -> Router {
    let api = Router::new()
        .route("/queues", get(handlers::queues))
        .route("/worker_pools", get(handlers::worker_pools))
        .route("/busy_workers", get(handlers::busy_workers))
        .route("/retry_jobs", get(handlers::retry_jobs))
        .route("/scheduled_jobs", get(handlers::scheduled_jobs))
        .route("/dead_jobs", get(handlers::dead_jobs))
        .route("/delete_dead_job/:died_at/:job_id", post(handlers::delete_dead_job))
        .route("/retry_dead_job/:died_at/:job_id", post(handlers::retry_dead_job))
        .route("/delete_all_dead_jobs", post(handlers::delete_all_dead_jobs))
        .route("/retry_all_dead_jobs", post(handlers::retry_all_dead_jobs))
        // Innermost first: the content-type stamp runs on responses leaving
        // the handlers, the auth gate wraps everything and short-circuits
        // before the stamp can touch a 401.
        .layer(axum_middleware::from_fn(content_type::json_content_type))
        .layer(axum_middleware::from_fn_with_state(
            credential,
            basic_auth::require_admin,
        ));

    Router::new()
        .merge(api)
        .route("/", get(assets::index))
        .route("/work.js", get(assets::work_js))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
