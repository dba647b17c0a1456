// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Durable facts the central store replays to rebuild [`crate::state::MaterializedState`].
//!
//! Every variant is an assignment, never a relative mutation, so replaying
//! the same event twice during WAL recovery produces the same state as
//! replaying it once.

use clerk_core::{ExtractionStatus, Job, JobId, JobStatus, PipelineConfig, RunId, SiteStatus, Stage};
use serde::{Deserialize, Serialize};

/// One of the counters tracked on [`clerk_core::StageCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterField {
    Total,
    Fetched,
    Ocred,
    OcrFailed,
    Compiled,
    Extracted,
    CompileTotal,
    CompileFailed,
    ExtractTotal,
    ExtractFailed,
    DeployTotal,
    DeployCompleted,
    DeployFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    SiteCreated {
        subdomain: String,
        created_at_ms: u64,
    },
    PipelineConfigUpdated {
        subdomain: String,
        config: PipelineConfig,
    },
    RunStarted {
        subdomain: String,
        run_id: RunId,
        at_ms: u64,
    },
    RunCompleted {
        subdomain: String,
        run_id: RunId,
    },
    StageAdvanced {
        subdomain: String,
        stage: Stage,
    },
    StatusChanged {
        subdomain: String,
        status: SiteStatus,
    },
    ExtractionStatusChanged {
        subdomain: String,
        status: ExtractionStatus,
    },
    CoordinatorEnqueuedChanged {
        subdomain: String,
        enqueued: bool,
    },
    /// `last_updated_ms` set directly, outside of `RunStarted` — used by
    /// `deploy` on success (spec.md SS4.6.6 "last_updated=now").
    LastUpdatedTouched {
        subdomain: String,
        at_ms: u64,
    },
    /// A counter's new absolute value, computed by the caller under the
    /// store lock at write time. Carrying the absolute value (instead of a
    /// delta) is what makes this event idempotent under WAL replay.
    CounterSet {
        subdomain: String,
        field: CounterField,
        value: u32,
    },
    JobTracked {
        job: Box<Job>,
    },
    JobStatusChanged {
        job_id: JobId,
        status: JobStatus,
        attempt: u32,
        error: Option<String>,
    },
}
