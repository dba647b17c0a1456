// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Shared command-test fixtures. Only ever compiled under `#[cfg(test)]`
//! command test modules within this binary crate — there is no `clerk-cli`
//! library target for a `tests/` integration crate to depend on, so these
//! fixtures live inline the way the teacher keeps its own CLI-only test
//! helpers beside the commands they support.

#![cfg(test)]

use std::sync::Arc;

use clerk_core::SystemClock;
use clerk_engine::extraction::fakes::FakeEntityExtractor;
use clerk_engine::ocr::fakes::FakeOcrBackend;
use clerk_engine::{Context, EngineConfig};
use clerk_plugins::PluginRegistry;
use clerk_queue::{JobQueue, MemoryBackend};
use clerk_store::CentralStore;

use crate::config::Config;

pub struct Fixture {
    pub ctx: Context<SystemClock>,
    pub config: Config,
    pub _dir: tempfile::TempDir,
}

/// A fresh store + memory-backed queue + default plugin registry, rooted at
/// a fresh temp directory, with `subdomain` already created. Uses the real
/// [`SystemClock`] since every `commands::*::run` signature is pinned to it
/// (spec.md SS6 commands run in-process against a directly-opened context,
/// not a generic one), and fake OCR/entity backends so no external binary
/// needs to be on `PATH` for a command test to pass.
pub fn fixture(subdomain: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CentralStore::open(dir.path().join("wal.log"), dir.path()).unwrap());
    store.create_site(subdomain, 0).unwrap();

    let queue = Arc::new(JobQueue::new(store.clone(), Arc::new(MemoryBackend::new())));
    let plugins = Arc::new(PluginRegistry::new(store.clone()));

    let ctx = Context::new(
        store,
        queue,
        plugins,
        SystemClock,
        dir.path(),
        EngineConfig::default(),
        Arc::new(FakeOcrBackend::new(clerk_core::OcrBackendKind::Tesseract, 1)),
        Arc::new(FakeOcrBackend::new(clerk_core::OcrBackendKind::Vision, 1)),
        Arc::new(FakeEntityExtractor),
    );

    let config = Config {
        storage_dir: dir.path().to_path_buf(),
        database_url: dir.path().join("wal.log").display().to_string(),
        redis_url: None,
        default_ocr_backend: clerk_core::OcrBackendKind::Tesseract,
        enable_extraction: false,
        worker_counts: crate::config::WorkerCounts { fetch: 1, ocr: 1, compilation: 1, extraction: 1, deploy: 1 },
        loki_url: None,
        num_workers: 1,
        spacy_n_process: 1,
    };

    Fixture { ctx, config, _dir: dir }
}
