// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Job identifier, status, and the in-flight job record.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::job_type::JobType;
use crate::payload::JobPayload;
use crate::priority::Priority;
use crate::run::RunId;

crate::define_id! {
    /// Unique identifier for a queued unit of work.
    pub struct JobId("job-");
}

/// Lifecycle status of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Ready to be claimed.
    Queued,
    /// Waiting on a non-terminal entry in `depends_on`.
    Deferred,
    /// Claimed by a worker, handler executing.
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Deferred => "deferred",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A unit of work in the queue.
///
/// Durable: a job survives worker restarts until it reaches a terminal
/// state (spec.md SS3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub subdomain: String,
    pub run_id: RunId,
    pub priority: Priority,
    #[serde(default)]
    pub depends_on: HashSet<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_job_id: Option<JobId>,
    pub job_type: JobType,
    pub payload: JobPayload,
    #[serde(default)]
    pub attempt: u32,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a new job, starting `Queued` unless `depends_on` is
    /// non-empty (then `Deferred`). Callers that can tell some of those
    /// dependencies are already terminal should override `status` after
    /// construction; only the queue has that view.
    pub fn new(
        subdomain: impl Into<String>,
        run_id: RunId,
        priority: Priority,
        payload: JobPayload,
        depends_on: HashSet<JobId>,
        parent_job_id: Option<JobId>,
    ) -> Self {
        let status = if depends_on.is_empty() { JobStatus::Queued } else { JobStatus::Deferred };
        let job_type = payload.job_type();
        Self {
            id: JobId::new(),
            subdomain: subdomain.into(),
            run_id,
            priority,
            depends_on,
            parent_job_id,
            job_type,
            payload,
            attempt: 0,
            status,
            error: None,
        }
    }

    /// Short tag for log records; see [`JobPayload::kind_tag`].
    pub fn kind_tag(&self) -> &'static str {
        self.payload.kind_tag()
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            subdomain: String = "example.civic.band",
        }
        set {
            priority: Priority = Priority::Normal,
            depends_on: HashSet<JobId> = HashSet::new(),
            job_type: JobType = JobType::Fetch,
            payload: JobPayload = JobPayload::Fetch { all_years: false, all_agendas: false },
            attempt: u32 = 0,
            status: JobStatus = JobStatus::Queued,
        }
        option {
            parent_job_id: JobId = None,
            error: String = None,
        }
        computed {
            id: JobId = JobId::new(),
            run_id: RunId = RunId::from_string("example.civic.band_1700000000_abc123"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_with_no_deps_is_queued() {
        let job = Job::new(
            "oakdale",
            RunId::from_string("oakdale_1_abcdef"),
            Priority::Normal,
            JobPayload::Compile,
            HashSet::new(),
            None,
        );
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[test]
    fn new_job_with_deps_is_deferred() {
        let mut deps = HashSet::new();
        deps.insert(JobId::new());
        let job = Job::new(
            "oakdale",
            RunId::from_string("oakdale_1_abcdef"),
            Priority::Normal,
            JobPayload::OcrCoordinator,
            deps,
            None,
        );
        assert_eq!(job.status, JobStatus::Deferred);
    }

    #[test]
    fn builder_produces_sane_defaults() {
        let job = Job::builder().subdomain("riverside").build();
        assert_eq!(job.subdomain, "riverside");
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[test]
    fn new_job_derives_job_type_from_payload() {
        let job = Job::new(
            "oakdale",
            RunId::from_string("oakdale_1_abcdef"),
            Priority::Normal,
            JobPayload::Deploy,
            HashSet::new(),
            None,
        );
        assert_eq!(job.job_type, JobType::Deploy);
    }
}
