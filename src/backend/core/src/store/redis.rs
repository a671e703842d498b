//! Redis-backed job store client.
//!
//! Reads the key layout the worker processes maintain under a configured
//! namespace:
//!
//! - `{ns}:known_jobs` — set of job names; each has a pending list at
//!   `{ns}:jobs:{name}`
//! - `{ns}:worker_pools` — set of pool ids; each publishes a heartbeat hash
//!   at `{ns}:worker_pools:{id}`
//! - `{ns}:worker:{id}` — observation hash, present only while the worker
//!   holds a job
//! - `{ns}:retry`, `{ns}:scheduled`, `{ns}:dead` — sorted sets scored by the
//!   respective timestamp, members are the serialized jobs

use std::collections::HashMap;

use super::{
    page_bounds, unix_now, DeadJob, Job, JobStore, QueueInfo, RetryJob, ScheduledJob,
    WorkerObservation, WorkerPoolHeartbeat,
};
use crate::error::Result;
use async_trait::async_trait;

pub struct RedisJobStore {
    client: redis::Client,
    namespace: String,
}

impl RedisJobStore {
    /// Create a store client over a connected Redis client.
    ///
    /// # Arguments
    /// * `client` - A Redis client for the store's instance
    /// * `namespace` - Key prefix the job system was configured with
    pub fn new(client: redis::Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.namespace, suffix)
    }

    fn queue_key(&self, job_name: &str) -> String {
        self.key(&format!("jobs:{}", job_name))
    }

    /// Obtain an async multiplexed connection from the Redis client.
    async fn get_conn(&self) -> Result<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Fetch one page of a job sorted set along with its cardinality.
    async fn zset_page(&self, key: &str, page: u64) -> Result<(Vec<(Job, i64)>, i64)> {
        let mut conn = self.get_conn().await?;

        let count: i64 = redis::cmd("ZCARD")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        let (start, stop) = page_bounds(page);
        let raw: Vec<(String, f64)> = redis::cmd("ZRANGE")
            .arg(key)
            .arg(start as isize)
            .arg(stop as isize - 1)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await?;

        let mut jobs = Vec::with_capacity(raw.len());
        for (member, score) in raw {
            let job: Job = serde_json::from_str(&member)?;
            jobs.push((job, score as i64));
        }

        Ok((jobs, count))
    }

    /// Find the serialized member of a dead job keyed by (died_at, job_id).
    ///
    /// The score is the death timestamp, so only the members at that exact
    /// score need to be scanned for the matching id.
    async fn find_dead_member(&self, died_at: i64, job_id: &str) -> Result<Option<String>> {
        let mut conn = self.get_conn().await?;
        let members: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(self.key("dead"))
            .arg(died_at)
            .arg(died_at)
            .query_async(&mut conn)
            .await?;

        for member in members {
            match serde_json::from_str::<Job>(&member) {
                Ok(job) if job.id == job_id => return Ok(Some(member)),
                _ => continue,
            }
        }
        Ok(None)
    }

    /// Push a serialized job back onto its origin queue.
    async fn requeue(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        member: &str,
        job: &Job,
    ) -> Result<()> {
        redis::cmd("SADD")
            .arg(self.key("known_jobs"))
            .arg(&job.name)
            .query_async::<_, i64>(conn)
            .await?;
        redis::cmd("LPUSH")
            .arg(self.queue_key(&job.name))
            .arg(member)
            .query_async::<_, i64>(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn queues(&self) -> Result<Vec<QueueInfo>> {
        let mut conn = self.get_conn().await?;

        let mut names: Vec<String> = redis::cmd("SMEMBERS")
            .arg(self.key("known_jobs"))
            .query_async(&mut conn)
            .await?;
        names.sort();

        let now = unix_now();
        let mut queues = Vec::with_capacity(names.len());
        for name in names {
            let queue_key = self.queue_key(&name);
            let count: i64 = redis::cmd("LLEN")
                .arg(&queue_key)
                .query_async(&mut conn)
                .await?;

            // Workers consume from the right, so the tail holds the oldest
            // pending job; its enqueue time gives the queue latency.
            let tail: Option<String> = redis::cmd("LINDEX")
                .arg(&queue_key)
                .arg(-1)
                .query_async(&mut conn)
                .await?;
            let latency = tail
                .and_then(|raw| serde_json::from_str::<Job>(&raw).ok())
                .map(|job| (now - job.enqueued_at).max(0))
                .unwrap_or(0);

            queues.push(QueueInfo {
                job_name: name,
                count,
                latency,
            });
        }

        Ok(queues)
    }

    async fn worker_pool_heartbeats(&self) -> Result<Vec<WorkerPoolHeartbeat>> {
        let mut conn = self.get_conn().await?;

        let mut pool_ids: Vec<String> = redis::cmd("SMEMBERS")
            .arg(self.key("worker_pools"))
            .query_async(&mut conn)
            .await?;
        pool_ids.sort();

        let mut heartbeats = Vec::with_capacity(pool_ids.len());
        for pool_id in pool_ids {
            let fields: HashMap<String, String> = redis::cmd("HGETALL")
                .arg(self.key(&format!("worker_pools:{}", pool_id)))
                .query_async(&mut conn)
                .await?;

            heartbeats.push(WorkerPoolHeartbeat {
                worker_pool_id: pool_id,
                started_at: int_field(&fields, "started_at"),
                heartbeat_at: int_field(&fields, "heartbeat_at"),
                job_names: list_field(&fields, "job_names"),
                concurrency: int_field(&fields, "concurrency") as u32,
                host: fields.get("host").cloned().unwrap_or_default(),
                pid: int_field(&fields, "pid") as i32,
                worker_ids: list_field(&fields, "worker_ids"),
            });
        }

        Ok(heartbeats)
    }

    async fn worker_observations(&self) -> Result<Vec<WorkerObservation>> {
        let heartbeats = self.worker_pool_heartbeats().await?;
        let mut conn = self.get_conn().await?;

        let mut observations = Vec::new();
        for heartbeat in &heartbeats {
            for worker_id in &heartbeat.worker_ids {
                let fields: HashMap<String, String> = redis::cmd("HGETALL")
                    .arg(self.key(&format!("worker:{}", worker_id)))
                    .query_async(&mut conn)
                    .await?;

                // The observation hash only exists while the worker is
                // processing a job.
                let is_busy = !fields.is_empty();
                observations.push(WorkerObservation {
                    worker_id: worker_id.clone(),
                    is_busy,
                    job_name: fields.get("job_name").cloned().unwrap_or_default(),
                    job_id: fields.get("job_id").cloned().unwrap_or_default(),
                    started_at: int_field(&fields, "started_at"),
                    args_json: fields.get("args").cloned().unwrap_or_default(),
                    checkin: fields.get("checkin").cloned().unwrap_or_default(),
                    checkin_at: int_field(&fields, "checkin_at"),
                });
            }
        }

        Ok(observations)
    }

    async fn retry_jobs(&self, page: u64) -> Result<(Vec<RetryJob>, i64)> {
        let (jobs, count) = self.zset_page(&self.key("retry"), page).await?;
        let jobs = jobs
            .into_iter()
            .map(|(job, score)| RetryJob { retry_at: score, job })
            .collect();
        Ok((jobs, count))
    }

    async fn scheduled_jobs(&self, page: u64) -> Result<(Vec<ScheduledJob>, i64)> {
        let (jobs, count) = self.zset_page(&self.key("scheduled"), page).await?;
        let jobs = jobs
            .into_iter()
            .map(|(job, score)| ScheduledJob { run_at: score, job })
            .collect();
        Ok((jobs, count))
    }

    async fn dead_jobs(&self, page: u64) -> Result<(Vec<DeadJob>, i64)> {
        let (jobs, count) = self.zset_page(&self.key("dead"), page).await?;
        let jobs = jobs
            .into_iter()
            .map(|(job, score)| DeadJob { died_at: score, job })
            .collect();
        Ok((jobs, count))
    }

    async fn delete_dead_job(&self, died_at: i64, job_id: &str) -> Result<()> {
        let Some(member) = self.find_dead_member(died_at, job_id).await? else {
            // Already gone; deleting twice is not an error.
            return Ok(());
        };

        let mut conn = self.get_conn().await?;
        redis::cmd("ZREM")
            .arg(self.key("dead"))
            .arg(&member)
            .query_async::<_, i64>(&mut conn)
            .await?;

        tracing::info!(died_at, job_id, "dead job deleted");
        Ok(())
    }

    async fn retry_dead_job(&self, died_at: i64, job_id: &str) -> Result<()> {
        let Some(member) = self.find_dead_member(died_at, job_id).await? else {
            return Ok(());
        };
        let job: Job = serde_json::from_str(&member)?;

        let mut conn = self.get_conn().await?;
        self.requeue(&mut conn, &member, &job).await?;
        redis::cmd("ZREM")
            .arg(self.key("dead"))
            .arg(&member)
            .query_async::<_, i64>(&mut conn)
            .await?;

        tracing::info!(died_at, job_id, queue = %job.name, "dead job requeued");
        Ok(())
    }

    async fn delete_all_dead_jobs(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("DEL")
            .arg(self.key("dead"))
            .query_async::<_, i64>(&mut conn)
            .await?;

        tracing::info!("dead set purged");
        Ok(())
    }

    async fn retry_all_dead_jobs(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let members: Vec<String> = redis::cmd("ZRANGE")
            .arg(self.key("dead"))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;

        let total = members.len();
        for member in &members {
            let job: Job = serde_json::from_str(member)?;
            self.requeue(&mut conn, member, &job).await?;
            redis::cmd("ZREM")
                .arg(self.key("dead"))
                .arg(member)
                .query_async::<_, i64>(&mut conn)
                .await?;
        }

        tracing::info!(count = total, "dead set requeued");
        Ok(())
    }
}

fn int_field(fields: &HashMap<String, String>, key: &str) -> i64 {
    fields
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn list_field(fields: &HashMap<String, String>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .map(|value| {
            value
                .split(',')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
