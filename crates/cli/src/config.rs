// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Environment-variable configuration (spec.md SS6 "Environment variables").
//!
//! No config crate: plain `std::env::var` reads with typed defaults, the
//! same direct style the teacher's own `lifecycle::Config::load` uses for
//! its fixed paths.

use std::path::PathBuf;

use clerk_core::OcrBackendKind;

/// Per-queue worker counts read from `{FETCH,OCR,COMPILATION,EXTRACTION,DEPLOY}_WORKERS`.
#[derive(Debug, Clone, Copy)]
pub struct WorkerCounts {
    pub fetch: u32,
    pub ocr: u32,
    pub compilation: u32,
    pub extraction: u32,
    pub deploy: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// On-disk root for site trees.
    pub storage_dir: PathBuf,
    /// Central store connection string (a WAL file path for this
    /// implementation; spec.md leaves the concrete backend open).
    pub database_url: String,
    /// Queue backend connection string. `None` falls back to an in-process
    /// `MemoryBackend` (used by `test-pipeline` and local smoke-testing).
    pub redis_url: Option<String>,
    pub default_ocr_backend: OcrBackendKind,
    pub enable_extraction: bool,
    pub worker_counts: WorkerCounts,
    /// Optional log-shipping endpoint; absent means console-only logging.
    pub loki_url: Option<String>,
    pub num_workers: u32,
    pub spacy_n_process: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            storage_dir: env_path("STORAGE_DIR", "../sites"),
            database_url: env_string("DATABASE_URL", "clerk.wal"),
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            default_ocr_backend: env_parse("DEFAULT_OCR_BACKEND", OcrBackendKind::Tesseract),
            enable_extraction: env_bool("ENABLE_EXTRACTION", false),
            worker_counts: WorkerCounts {
                fetch: env_u32("FETCH_WORKERS", 1),
                ocr: env_u32("OCR_WORKERS", 1),
                compilation: env_u32("COMPILATION_WORKERS", 1),
                extraction: env_u32("EXTRACTION_WORKERS", 1),
                deploy: env_u32("DEPLOY_WORKERS", 1),
            },
            loki_url: std::env::var("LOKI_URL").ok().filter(|s| !s.is_empty()),
            num_workers: env_u32("NUM_WORKERS", 1),
            spacy_n_process: env_u32("SPACY_N_PROCESS", 1),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|s| !s.is_empty()).unwrap_or_else(|| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_string(key, default))
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("1") => true,
        Some("0") => false,
        _ => default,
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
