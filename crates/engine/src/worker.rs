// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Worker runtime: claims a job off its assigned queues, dispatches it to
//! the matching stage handler, and marks it completed/failed (spec.md
//! SS4.5).

use std::time::Duration;

use clerk_core::{Clock, Job, JobPayload};

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::handlers;
use crate::logging::{with_job_context, JobContext};

/// Static configuration for one worker process. `queues` are claimed in
/// the order given, except `high` always wins when present (spec.md
/// SS4.4 "ordering guarantees").
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub worker_name: String,
    pub queues: Vec<String>,
    /// How long to sleep between empty claims.
    pub poll_interval: Duration,
}

pub struct Worker<C: Clock> {
    ctx: Context<C>,
    config: WorkerConfig,
}

impl<C: Clock + Send + Sync + 'static> Worker<C> {
    pub fn new(ctx: Context<C>, config: WorkerConfig) -> Self {
        Self { ctx, config }
    }

    /// Runs until `should_stop` resolves; intended to be raced against a
    /// shutdown signal by the caller (spec.md SS4.5 "a worker loop").
    pub async fn run(&self, mut should_stop: impl FnMut() -> bool) -> Result<()> {
        let queue_names: Vec<&str> = self.config.queues.iter().map(String::as_str).collect();
        tracing::info!(worker = %self.config.worker_name, queues = ?queue_names, "worker starting");

        while !should_stop() {
            match self.ctx.queue.claim(&queue_names, &self.config.worker_name).await? {
                Some(job) => self.process(job).await,
                None => tokio::time::sleep(self.config.poll_interval).await,
            }
        }
        tracing::info!(worker = %self.config.worker_name, "worker stopping");
        Ok(())
    }

    async fn process(&self, job: Job) {
        let job_id = job.id;
        let outcome = dispatch(self.ctx.clone(), job).await;

        match outcome {
            Ok(()) => {
                if let Err(e) = self.ctx.queue.complete(job_id).await {
                    tracing::error!(job_id = %job_id, error = %e, "failed to mark job completed");
                }
            }
            Err(err) => {
                tracing::error!(job_id = %job_id, error_type = err.error_type, error_message = %err.error_message, "job failed");
                if let Err(e) = self.ctx.queue.fail(job_id, err.to_string()).await {
                    tracing::error!(job_id = %job_id, error = %e, "failed to mark job failed");
                }
            }
        }
    }
}

/// Dispatches one job to its handler on a spawned task, so a panicking
/// handler surfaces as a `JoinError` instead of taking the worker loop
/// down with it (spec.md SS7 "Fatal" errors are reserved for store/queue
/// -open failures, not handler bugs).
async fn dispatch<C: Clock + Send + Sync + 'static>(ctx: Context<C>, job: Job) -> Result<()> {
    let job_type = job.job_type;
    let job_context = JobContext {
        job_id: job.id,
        parent_job_id: job.parent_job_id,
        run_id: job.run_id.clone(),
        subdomain: job.subdomain.clone(),
        stage: job.job_type.stage(),
    };
    let subdomain = job.subdomain;
    let run_id = job.run_id;

    let handle = tokio::spawn(with_job_context(job_context, async move {
        match job.payload {
            JobPayload::Fetch { all_years, all_agendas } => {
                let input = handlers::FetchInput { subdomain, run_id, all_years, all_agendas };
                handlers::fetch(&ctx, input).await
            }
            JobPayload::OcrPage { pdf_path, backend } => {
                let input = handlers::OcrPageInput { subdomain, run_id, pdf_path, backend };
                handlers::ocr_page(&ctx, input).await
            }
            JobPayload::OcrCoordinator => {
                let input = handlers::OcrCoordinatorInput { subdomain, run_id };
                handlers::ocr_coordinator(&ctx, input).await
            }
            JobPayload::Compile => {
                let input = handlers::CompileInput { subdomain, run_id };
                handlers::compile(&ctx, input).await
            }
            JobPayload::Extract { enable_entities } => {
                let input = handlers::ExtractInput { subdomain, run_id, enable_entities };
                handlers::extract(&ctx, input).await
            }
            JobPayload::Deploy => {
                let input = handlers::DeployInput { subdomain };
                handlers::deploy(&ctx, input).await
            }
            JobPayload::Reconcile => {
                Err(EngineError::consistency("reconcile is driven by the reconciler, not dispatched as a job"))
            }
        }
    }));

    match handle.await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => {
            Err(EngineError::new("handler_panicked", format!("{job_type} handler panicked")))
        }
        Err(join_err) => Err(EngineError::new("handler_cancelled", join_err.to_string())),
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
