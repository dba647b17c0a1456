// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `JobQueue`: dependency-aware dispatch on top of a [`QueueBackend`].
//!
//! The backend only knows FIFO order within a named queue; fan-in
//! (`deferred -> queued` once every dependency is terminal) and the
//! failed/deferred registries live here, backed by [`clerk_store::CentralStore`]
//! for the durable job record (spec.md SS4.4).

use std::collections::HashSet;
use std::sync::Arc;

use clerk_core::{Job, JobId, JobPayload, JobStatus, Priority, RunId};
use clerk_store::CentralStore;
use parking_lot::Mutex;

use crate::backend::QueueBackend;
use crate::error::{QueueError, Result};

const HIGH_QUEUE: &str = "high";

pub struct JobQueue {
    store: Arc<CentralStore>,
    backend: Arc<dyn QueueBackend>,
    deferred: Mutex<HashSet<JobId>>,
    failed: Mutex<HashSet<JobId>>,
}

impl JobQueue {
    pub fn new(store: Arc<CentralStore>, backend: Arc<dyn QueueBackend>) -> Self {
        Self { store, backend, deferred: Mutex::new(HashSet::new()), failed: Mutex::new(HashSet::new()) }
    }

    /// Enqueue a new job. `priority` routes it onto the `high` queue
    /// instead of its stage queue when `Priority::High`; dependencies that
    /// are not yet all terminal leave it `Deferred` until [`Self::complete`]
    /// or [`Self::fail`] on the last of them releases it.
    pub async fn enqueue(
        &self,
        subdomain: &str,
        run_id: RunId,
        priority: Priority,
        payload: JobPayload,
        depends_on: HashSet<JobId>,
        parent_job_id: Option<JobId>,
    ) -> Result<JobId> {
        let remaining = self.unresolved_dependencies(&depends_on);
        let mut job = Job::new(subdomain, run_id, priority, payload, depends_on, parent_job_id);
        job.status = if remaining.is_empty() { JobStatus::Queued } else { JobStatus::Deferred };
        let job_id = job.id;
        let job_type = job.job_type;
        let status = job.status;

        self.store.track_job(job)?;

        if status == JobStatus::Deferred {
            self.deferred.lock().insert(job_id);
        } else {
            self.push(job_type.queue_name(), priority, job_id).await?;
        }
        Ok(job_id)
    }

    async fn push(&self, queue_name: &str, priority: Priority, job_id: JobId) -> Result<()> {
        let queue = if priority == Priority::High { HIGH_QUEUE } else { queue_name };
        self.backend.push(queue, job_id).await
    }

    /// Claim the next job from `queue_names`, preferring `high` first
    /// whenever it's in that list (spec.md SS4.4 ordering guarantees).
    pub async fn claim(&self, queue_names: &[&str], _worker_id: &str) -> Result<Option<Job>> {
        let mut ordered: Vec<&str> = Vec::with_capacity(queue_names.len());
        if queue_names.contains(&HIGH_QUEUE) {
            ordered.push(HIGH_QUEUE);
        }
        ordered.extend(queue_names.iter().filter(|q| **q != HIGH_QUEUE));

        for queue in ordered {
            if let Some(job_id) = self.backend.pop(queue).await? {
                let job = self.store.get_job(&job_id).ok_or(QueueError::JobNotFound(job_id))?;
                self.store.set_job_status(job_id, JobStatus::Running, job.attempt, None)?;
                let mut running = job;
                running.status = JobStatus::Running;
                return Ok(Some(running));
            }
        }
        Ok(None)
    }

    pub async fn complete(&self, job_id: JobId) -> Result<()> {
        let job = self.store.get_job(&job_id).ok_or(QueueError::JobNotFound(job_id))?;
        self.store.set_job_status(job_id, JobStatus::Completed, job.attempt, None)?;
        self.release_dependents(job_id).await
    }

    pub async fn fail(&self, job_id: JobId, error: impl Into<String>) -> Result<()> {
        let job = self.store.get_job(&job_id).ok_or(QueueError::JobNotFound(job_id))?;
        self.store.set_job_status(job_id, JobStatus::Failed, job.attempt + 1, Some(error.into()))?;
        self.failed.lock().insert(job_id);
        // Dependents still release on a failed dependency (spec.md SS4.4
        // "failure handling"): the coordinator observes the failure via
        // counters, not by staying stuck.
        self.release_dependents(job_id).await
    }

    async fn release_dependents(&self, completed_id: JobId) -> Result<()> {
        let candidates: Vec<JobId> = self.deferred.lock().iter().copied().collect();
        for candidate_id in candidates {
            let Some(candidate) = self.store.get_job(&candidate_id) else { continue };
            if !candidate.depends_on.contains(&completed_id) {
                continue;
            }
            if self.unresolved_dependencies(&candidate.depends_on).is_empty() {
                self.deferred.lock().remove(&candidate_id);
                self.store.set_job_status(candidate_id, JobStatus::Queued, candidate.attempt, None)?;
                self.push(candidate.job_type.queue_name(), candidate.priority, candidate_id).await?;
            }
        }
        Ok(())
    }

    /// Dependencies not yet terminal. A dependency the store has never
    /// heard of is treated as already resolved rather than leaving the
    /// dependent stuck forever.
    fn unresolved_dependencies(&self, depends_on: &HashSet<JobId>) -> Vec<JobId> {
        depends_on
            .iter()
            .copied()
            .filter(|dep_id| self.store.get_job(dep_id).map(|dep| !dep.status.is_terminal()).unwrap_or(false))
            .collect()
    }

    pub async fn length(&self, queue_name: &str) -> Result<usize> {
        self.backend.len(queue_name).await
    }

    pub fn failed_registry(&self) -> Vec<JobId> {
        self.failed.lock().iter().copied().collect()
    }

    pub fn deferred_registry(&self) -> Vec<JobId> {
        self.deferred.lock().iter().copied().collect()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
