// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Job-scoped structured logging (spec.md SS4.2).
//!
//! The worker loop sets a [`JobContext`] task-local before dispatching a
//! handler; `emit_started`/`emit_completed`/`emit_failed` read it back so
//! every milestone event carries `job_id`/`parent_job_id`/`run_id`/
//! `subdomain` without each handler threading them through by hand.

use std::future::Future;

use clerk_core::{JobId, RunId, Stage};
use serde_json::Value;

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_id: JobId,
    pub parent_job_id: Option<JobId>,
    pub run_id: RunId,
    pub subdomain: String,
    pub stage: Stage,
}

tokio::task_local! {
    static JOB_CONTEXT: JobContext;
}

/// Run `fut` with `ctx` installed as the current job-local context.
pub async fn with_job_context<F: Future>(ctx: JobContext, fut: F) -> F::Output {
    JOB_CONTEXT.scope(ctx, fut).await
}

/// The job context for the currently-executing handler, if any (`None`
/// outside a worker-dispatched handler, e.g. in scheduler/reconciler code
/// that doesn't run under a job).
pub fn current_job_context() -> Option<JobContext> {
    JOB_CONTEXT.try_with(Clone::clone).ok()
}

/// `{stage}_started` — config fields only (spec.md SS4.2).
pub fn emit_started(stage: &str) {
    log_milestone(format!("{stage}_started"), Value::Null, false);
}

/// `{stage}_completed` — `duration_seconds` plus volume counts, passed in
/// `fields` as a JSON object.
pub fn emit_completed(stage: &str, fields: Value) {
    log_milestone(format!("{stage}_completed"), fields, false);
}

/// `{stage}_failed` — merges `error_type`/`error_message`/`traceback` from
/// `err` into `fields` so the record never has to re-derive them from a
/// string. `EngineError` carries no captured backtrace, so `traceback` is
/// the error's `Debug` rendering — the full struct, not just the `Display`
/// message `error_message` already holds.
pub fn emit_failed(stage: &str, err: &EngineError, mut fields: Value) {
    if let Value::Object(ref mut map) = fields {
        map.insert("error_type".into(), Value::String(err.error_type.to_string()));
        map.insert("error_message".into(), Value::String(err.error_message.clone()));
        map.insert("traceback".into(), Value::String(format!("{err:?}")));
    }
    log_milestone(format!("{stage}_failed"), fields, true);
}

fn log_milestone(event: String, fields: Value, is_failure: bool) {
    let ctx = current_job_context();
    let job_id = ctx.as_ref().map(|c| c.job_id.to_string()).unwrap_or_default();
    let parent_job_id = ctx.as_ref().and_then(|c| c.parent_job_id.as_ref().map(ToString::to_string)).unwrap_or_default();
    let run_id = ctx.as_ref().map(|c| c.run_id.to_string()).unwrap_or_default();
    let subdomain = ctx.as_ref().map(|c| c.subdomain.clone()).unwrap_or_default();
    let stage = ctx.as_ref().map(|c| c.stage.to_string()).unwrap_or_default();

    if is_failure {
        tracing::error!(event = %event, job_id, parent_job_id, run_id, subdomain, stage, fields = %fields, "{event}");
    } else {
        tracing::info!(event = %event, job_id, parent_job_id, run_id, subdomain, stage, fields = %fields, "{event}");
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
