//! Job-store client: the gateway's view of the queue system's data.
//!
//! The storage engine itself (enqueueing, leasing, retry scheduling) lives in
//! the worker processes; this module only reads the shapes they publish and
//! performs the four dead-set mutations the dashboard exposes. Everything
//! goes through the [`JobStore`] trait so handlers never care which backend
//! they are talking to:
//!
//! - [`RedisJobStore`] reads the live key layout in production.
//! - [`MemoryJobStore`] is an in-process backend for tests and embedding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod memory;
mod redis;

pub use memory::MemoryJobStore;
pub use redis::RedisJobStore;

/// Jobs returned per page by the paged listings.
pub const JOBS_PER_PAGE: u64 = 20;

/// A queue and its current depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    /// Job name, which doubles as the queue name
    pub job_name: String,
    /// Number of jobs waiting on the queue
    pub count: i64,
    /// Seconds the oldest pending job has been waiting
    pub latency: i64,
}

/// The latest liveness record published by a pool of workers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerPoolHeartbeat {
    pub worker_pool_id: String,
    pub started_at: i64,
    pub heartbeat_at: i64,
    pub job_names: Vec<String>,
    pub concurrency: u32,
    pub host: String,
    pub pid: i32,
    pub worker_ids: Vec<String>,
}

/// A snapshot of a single worker's current activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerObservation {
    pub worker_id: String,
    pub is_busy: bool,
    pub job_name: String,
    pub job_id: String,
    pub started_at: i64,
    pub args_json: String,
    pub checkin: String,
    pub checkin_at: i64,
}

/// A job as serialized in the store.
///
/// The field names on the wire (`name`, `id`, `t`, `args`, `err`, `fails`)
/// are the store's own and must not change; workers and the dashboard both
/// parse them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub id: String,
    /// Enqueue time, seconds since the epoch
    #[serde(rename = "t")]
    pub enqueued_at: i64,
    #[serde(default)]
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fails: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Job {
    /// Build a job with the given name and id, enqueued now.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            enqueued_at: unix_now(),
            args: serde_json::Value::Null,
            err: None,
            fails: 0,
        }
    }
}

/// A job awaiting re-execution after a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryJob {
    pub retry_at: i64,
    #[serde(flatten)]
    pub job: Job,
}

/// A job scheduled to run in the future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub run_at: i64,
    #[serde(flatten)]
    pub job: Job,
}

/// A job that exhausted its retries and is held for manual action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadJob {
    pub died_at: i64,
    #[serde(flatten)]
    pub job: Job,
}

/// Client interface to the job store.
///
/// Implementations must be safe for concurrent use; the gateway shares one
/// instance across all in-flight requests. Paged listings take a 1-based
/// page number and return the page alongside the total set size. The
/// single-job mutations key a dead job by its `(died_at, job_id)` composite;
/// acting on a job that is no longer present is not an error.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All known queues with their depth.
    async fn queues(&self) -> Result<Vec<QueueInfo>>;

    /// Latest heartbeat per worker pool.
    async fn worker_pool_heartbeats(&self) -> Result<Vec<WorkerPoolHeartbeat>>;

    /// Current observation for every worker across all pools.
    async fn worker_observations(&self) -> Result<Vec<WorkerObservation>>;

    /// One page of the retry set, plus its total size.
    async fn retry_jobs(&self, page: u64) -> Result<(Vec<RetryJob>, i64)>;

    /// One page of the scheduled set, plus its total size.
    async fn scheduled_jobs(&self, page: u64) -> Result<(Vec<ScheduledJob>, i64)>;

    /// One page of the dead set, plus its total size.
    async fn dead_jobs(&self, page: u64) -> Result<(Vec<DeadJob>, i64)>;

    /// Remove a single dead job.
    async fn delete_dead_job(&self, died_at: i64, job_id: &str) -> Result<()>;

    /// Put a single dead job back on its origin queue.
    async fn retry_dead_job(&self, died_at: i64, job_id: &str) -> Result<()>;

    /// Drop the entire dead set.
    async fn delete_all_dead_jobs(&self) -> Result<()>;

    /// Put every dead job back on its origin queue.
    async fn retry_all_dead_jobs(&self) -> Result<()>;
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Zero-based offset range for a 1-based page.
pub(crate) fn page_bounds(page: u64) -> (u64, u64) {
    let page = page.max(1);
    let start = (page - 1) * JOBS_PER_PAGE;
    (start, start + JOBS_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_wire_format_uses_store_field_names() {
        let job = Job {
            name: "send_email".to_string(),
            id: "abc123".to_string(),
            enqueued_at: 1700000000,
            args: serde_json::json!({"to": "ops@example.com"}),
            err: None,
            fails: 0,
        };

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["name"], "send_email");
        assert_eq!(value["t"], 1700000000);
        assert!(value.get("err").is_none());
        assert!(value.get("fails").is_none());
        assert!(value.get("enqueued_at").is_none());
    }

    #[test]
    fn dead_job_flattens_job_fields() {
        let dead = DeadJob {
            died_at: 1700000001,
            job: Job::new("resize_image", "j1"),
        };

        let value = serde_json::to_value(&dead).unwrap();
        assert_eq!(value["died_at"], 1700000001);
        assert_eq!(value["name"], "resize_image");
        assert_eq!(value["id"], "j1");
    }

    #[test]
    fn failed_job_round_trips() {
        let raw = r#"{"name":"ping","id":"x","t":10,"args":[1,2],"err":"boom","fails":3}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.err.as_deref(), Some("boom"));
        assert_eq!(job.fails, 3);

        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["err"], "boom");
        assert_eq!(back["fails"], 3);
    }

    #[test]
    fn page_bounds_are_twenty_wide() {
        assert_eq!(page_bounds(1), (0, 20));
        assert_eq!(page_bounds(2), (20, 40));
        // Page zero is treated as the first page.
        assert_eq!(page_bounds(0), (0, 20));
    }
}
