//! In-memory job store for tests and embedding.
//!
//! Mirrors the Redis backend's observable behavior: sorted job sets paged
//! twenty at a time, queues drained from the tail, and dead-set mutations
//! keyed by (died_at, job_id) that treat a missing job as already handled.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::{
    page_bounds, unix_now, DeadJob, Job, JobStore, QueueInfo, RetryJob, ScheduledJob,
    WorkerObservation, WorkerPoolHeartbeat,
};
use crate::error::Result;
use async_trait::async_trait;

#[derive(Debug, Default)]
struct MemoryState {
    queues: BTreeMap<String, Vec<Job>>,
    heartbeats: Vec<WorkerPoolHeartbeat>,
    observations: Vec<WorkerObservation>,
    retry: Vec<RetryJob>,
    scheduled: Vec<ScheduledJob>,
    dead: Vec<DeadJob>,
}

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    state: RwLock<MemoryState>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pending job onto its queue.
    pub async fn push_queued(&self, job: Job) {
        let mut state = self.state.write().await;
        state.queues.entry(job.name.clone()).or_default().push(job);
    }

    /// Seed a job into the retry set.
    pub async fn push_retry(&self, job: RetryJob) {
        let mut state = self.state.write().await;
        state.retry.push(job);
        state.retry.sort_by(sort_key(|j: &RetryJob| (j.retry_at, j.job.id.clone())));
    }

    /// Seed a job into the scheduled set.
    pub async fn push_scheduled(&self, job: ScheduledJob) {
        let mut state = self.state.write().await;
        state.scheduled.push(job);
        state
            .scheduled
            .sort_by(sort_key(|j: &ScheduledJob| (j.run_at, j.job.id.clone())));
    }

    /// Seed a job into the dead set.
    pub async fn push_dead(&self, job: DeadJob) {
        let mut state = self.state.write().await;
        state.dead.push(job);
        state.dead.sort_by(sort_key(|j: &DeadJob| (j.died_at, j.job.id.clone())));
    }

    /// Replace the worker-pool heartbeats.
    pub async fn set_heartbeats(&self, heartbeats: Vec<WorkerPoolHeartbeat>) {
        self.state.write().await.heartbeats = heartbeats;
    }

    /// Replace the worker observations.
    pub async fn set_observations(&self, observations: Vec<WorkerObservation>) {
        self.state.write().await.observations = observations;
    }

    /// Pending jobs currently sitting on a queue, oldest first.
    pub async fn queued_jobs(&self, job_name: &str) -> Vec<Job> {
        self.state
            .read()
            .await
            .queues
            .get(job_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Size of the dead set.
    pub async fn dead_len(&self) -> usize {
        self.state.read().await.dead.len()
    }
}

fn sort_key<T, K: Ord>(key: impl Fn(&T) -> K) -> impl Fn(&T, &T) -> std::cmp::Ordering {
    move |a, b| key(a).cmp(&key(b))
}

fn page_of<T: Clone>(items: &[T], page: u64) -> Vec<T> {
    let (start, stop) = page_bounds(page);
    let start = (start as usize).min(items.len());
    let stop = (stop as usize).min(items.len());
    items[start..stop].to_vec()
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn queues(&self) -> Result<Vec<QueueInfo>> {
        let state = self.state.read().await;
        let now = unix_now();
        Ok(state
            .queues
            .iter()
            .map(|(name, jobs)| QueueInfo {
                job_name: name.clone(),
                count: jobs.len() as i64,
                latency: jobs
                    .first()
                    .map(|job| (now - job.enqueued_at).max(0))
                    .unwrap_or(0),
            })
            .collect())
    }

    async fn worker_pool_heartbeats(&self) -> Result<Vec<WorkerPoolHeartbeat>> {
        Ok(self.state.read().await.heartbeats.clone())
    }

    async fn worker_observations(&self) -> Result<Vec<WorkerObservation>> {
        Ok(self.state.read().await.observations.clone())
    }

    async fn retry_jobs(&self, page: u64) -> Result<(Vec<RetryJob>, i64)> {
        let state = self.state.read().await;
        Ok((page_of(&state.retry, page), state.retry.len() as i64))
    }

    async fn scheduled_jobs(&self, page: u64) -> Result<(Vec<ScheduledJob>, i64)> {
        let state = self.state.read().await;
        Ok((page_of(&state.scheduled, page), state.scheduled.len() as i64))
    }

    async fn dead_jobs(&self, page: u64) -> Result<(Vec<DeadJob>, i64)> {
        let state = self.state.read().await;
        Ok((page_of(&state.dead, page), state.dead.len() as i64))
    }

    async fn delete_dead_job(&self, died_at: i64, job_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .dead
            .retain(|dead| !(dead.died_at == died_at && dead.job.id == job_id));
        Ok(())
    }

    async fn retry_dead_job(&self, died_at: i64, job_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(position) = state
            .dead
            .iter()
            .position(|dead| dead.died_at == died_at && dead.job.id == job_id)
        else {
            return Ok(());
        };

        let dead = state.dead.remove(position);
        state
            .queues
            .entry(dead.job.name.clone())
            .or_default()
            .push(dead.job);
        Ok(())
    }

    async fn delete_all_dead_jobs(&self) -> Result<()> {
        self.state.write().await.dead.clear();
        Ok(())
    }

    async fn retry_all_dead_jobs(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let dead = std::mem::take(&mut state.dead);
        for job in dead {
            state
                .queues
                .entry(job.job.name.clone())
                .or_default()
                .push(job.job);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead(died_at: i64, id: &str) -> DeadJob {
        DeadJob {
            died_at,
            job: Job::new("send_email", id),
        }
    }

    #[tokio::test]
    async fn retry_dead_job_moves_job_back_to_its_queue() {
        let store = MemoryJobStore::new();
        store.push_dead(dead(1700000000, "abc123")).await;

        store.retry_dead_job(1700000000, "abc123").await.unwrap();

        assert_eq!(store.dead_len().await, 0);
        let queued = store.queued_jobs("send_email").await;
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].id, "abc123");
    }

    #[tokio::test]
    async fn delete_dead_job_requires_both_key_parts() {
        let store = MemoryJobStore::new();
        store.push_dead(dead(1700000000, "abc123")).await;

        // Wrong timestamp leaves the job alone.
        store.delete_dead_job(1700000001, "abc123").await.unwrap();
        assert_eq!(store.dead_len().await, 1);

        store.delete_dead_job(1700000000, "abc123").await.unwrap();
        assert_eq!(store.dead_len().await, 0);

        // Deleting again is a no-op, not an error.
        store.delete_dead_job(1700000000, "abc123").await.unwrap();
    }

    #[tokio::test]
    async fn dead_jobs_are_paged_twenty_at_a_time() {
        let store = MemoryJobStore::new();
        for i in 0..25 {
            store.push_dead(dead(1700000000 + i, &format!("job-{:02}", i))).await;
        }

        let (first, count) = store.dead_jobs(1).await.unwrap();
        assert_eq!(count, 25);
        assert_eq!(first.len(), 20);
        assert_eq!(first[0].job.id, "job-00");

        let (second, count) = store.dead_jobs(2).await.unwrap();
        assert_eq!(count, 25);
        assert_eq!(second.len(), 5);
        assert_eq!(second[0].job.id, "job-20");

        let (beyond, count) = store.dead_jobs(9).await.unwrap();
        assert_eq!(count, 25);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn retry_all_drains_the_dead_set() {
        let store = MemoryJobStore::new();
        store.push_dead(dead(1, "a")).await;
        store
            .push_dead(DeadJob {
                died_at: 2,
                job: Job::new("resize_image", "b"),
            })
            .await;

        store.retry_all_dead_jobs().await.unwrap();

        assert_eq!(store.dead_len().await, 0);
        assert_eq!(store.queued_jobs("send_email").await.len(), 1);
        assert_eq!(store.queued_jobs("resize_image").await.len(), 1);
    }
}
