// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk worker`: starts a worker loop in this process (spec.md SS6).
//!
//! Unlike the teacher's daemon/client split, clerk has no supervising
//! daemon to hand this off to — the worker loop runs directly in the
//! invoking process until interrupted, matching spec.md SS4.5's "a
//! worker loop" rather than a managed background service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Args;
use clerk_core::SystemClock;
use clerk_engine::{Context, Worker, WorkerConfig};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct WorkerArgs {
    /// Comma-separated queue names to claim from, `high` first if present.
    #[arg(long, value_delimiter = ',', required = true)]
    pub queues: Vec<String>,

    /// Identifies this worker in logs and job attempt records.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, default_value = "1000")]
    pub poll_interval_ms: u64,
}

pub async fn run(ctx: Context<SystemClock>, args: WorkerArgs) -> Result<(), ExitError> {
    let worker_name = args.name.unwrap_or_else(|| format!("worker-{}", std::process::id()));
    let config = WorkerConfig { worker_name, queues: args.queues, poll_interval: Duration::from_millis(args.poll_interval_ms) };

    let stop = Arc::new(AtomicBool::new(false));
    let loop_stop = stop.clone();
    let worker = Worker::new(ctx, config);

    let loop_handle = tokio::spawn(async move { worker.run(|| loop_stop.load(Ordering::Relaxed)).await });

    tokio::select! {
        result = loop_handle => {
            result.map_err(|e| ExitError::runtime(e.to_string()))??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received, stopping worker");
            stop.store(true, Ordering::Relaxed);
        }
    }
    Ok(())
}

// No `#[cfg(test)]` module here: this command's only logic beyond
// `clerk_engine::Worker::run` (itself covered by `crates/engine/src/worker_tests.rs`)
// is racing that loop against `tokio::signal::ctrl_c()`, which a test can't
// trigger without sending the process a real signal.
