//! # Workhub Core
//!
//! Management API gateway for a Redis-backed background job store.
//!
//! ## Architecture
//!
//! - **Store client**: narrow read/write interface over the job system's
//!   Redis layout, with an in-memory backend for tests and embedding
//! - **API**: fixed route table over the store; queue depths, worker-pool
//!   heartbeats, busy workers, paged retry/scheduled/dead sets, and the four
//!   dead-set mutations
//! - **Middleware**: Basic-auth gate and response content-type stamping
//! - **Server**: bind/serve/drain lifecycle with graceful shutdown
//!
//! The gateway owns no persistent state: requests are authenticated, routed,
//! answered from one store call each, and wrapped in a uniform JSON envelope.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod server;
pub mod store;

pub use error::{Result, WorkhubError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{build_router, AppState};
    pub use crate::config::Config;
    pub use crate::error::{Result, WorkhubError};
    pub use crate::middleware::AdminCredential;
    pub use crate::server::Server;
    pub use crate::store::{
        DeadJob, Job, JobStore, MemoryJobStore, QueueInfo, RedisJobStore, RetryJob, ScheduledJob,
        WorkerObservation, WorkerPoolHeartbeat,
    };
}
