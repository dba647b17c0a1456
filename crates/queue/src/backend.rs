// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Ordering backends for [`crate::queue::JobQueue`].
//!
//! `MemoryBackend` is used by the test-mode runner and unit tests;
//! `RedisBackend` is the durable production backend addressed by
//! `REDIS_URL` (spec.md SS6).

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use clerk_core::JobId;
use parking_lot::Mutex;

use crate::error::{QueueError, Result};

#[async_trait]
pub trait QueueBackend: Send + Sync {
    async fn push(&self, queue: &str, job_id: JobId) -> Result<()>;
    async fn pop(&self, queue: &str) -> Result<Option<JobId>>;
    async fn len(&self, queue: &str) -> Result<usize>;
}

/// In-process FIFO queues, one `VecDeque` per named queue.
#[derive(Default)]
pub struct MemoryBackend {
    queues: Mutex<HashMap<String, VecDeque<JobId>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueBackend for MemoryBackend {
    async fn push(&self, queue: &str, job_id: JobId) -> Result<()> {
        self.queues.lock().entry(queue.to_string()).or_default().push_back(job_id);
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<JobId>> {
        Ok(self.queues.lock().get_mut(queue).and_then(VecDeque::pop_front))
    }

    async fn len(&self, queue: &str) -> Result<usize> {
        Ok(self.queues.lock().get(queue).map(VecDeque::len).unwrap_or(0))
    }
}

/// `REDIS_URL`-backed durable queue. Each named queue is a Redis list;
/// `push` is `RPUSH`, `pop` is `LPOP`, preserving FIFO order.
pub struct RedisBackend {
    conn: redis::aio::ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| QueueError::Backend(e.to_string()))?;
        let conn = client.get_connection_manager().await.map_err(|e| QueueError::Backend(e.to_string()))?;
        Ok(Self { conn })
    }

    fn key(queue: &str) -> String {
        format!("clerk:queue:{queue}")
    }
}

#[async_trait]
impl QueueBackend for RedisBackend {
    async fn push(&self, queue: &str, job_id: JobId) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("RPUSH")
            .arg(Self::key(queue))
            .arg(job_id.as_str())
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))
    }

    async fn pop(&self, queue: &str) -> Result<Option<JobId>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> =
            redis::cmd("LPOP").arg(Self::key(queue)).query_async(&mut conn).await.map_err(|e| QueueError::Backend(e.to_string()))?;
        Ok(raw.map(JobId::from_string))
    }

    async fn len(&self, queue: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        redis::cmd("LLEN").arg(Self::key(queue)).query_async(&mut conn).await.map_err(|e| QueueError::Backend(e.to_string()))
    }
}
