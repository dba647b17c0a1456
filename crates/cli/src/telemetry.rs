// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Structured logging setup (spec.md SS6 "Log record schema").
//!
//! JSON lines to stdout always; when `LOKI_URL` is set, the same records
//! are additionally written to a rolling file a log-shipping sidecar can
//! tail (spec.md SS6 "LOKI_URL ... absent => console only").

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Guard that must be held for the lifetime of the process; dropping it
/// stops the non-blocking file writer from flushing.
pub struct TelemetryGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

pub fn init(config: &Config) -> TelemetryGuard {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = || tracing_subscriber::fmt::layer().json().with_target(false);

    match &config.loki_url {
        Some(_) => {
            let appender = tracing_appender::rolling::daily(&config.storage_dir, "clerk.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer().json().with_target(false).with_writer(non_blocking);
            tracing_subscriber::registry().with(env_filter()).with(stdout_layer()).with(file_layer).init();
            TelemetryGuard { _file_guard: Some(guard) }
        }
        None => {
            tracing_subscriber::registry().with(env_filter()).with(stdout_layer()).init();
            TelemetryGuard { _file_guard: None }
        }
    }
}
