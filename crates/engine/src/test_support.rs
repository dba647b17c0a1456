// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Shared handler-test fixtures. Not feature-gated: only ever compiled
//! under `#[cfg(test)]` handler test modules within this crate.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use clerk_core::FakeClock;
use clerk_plugins::{Extractor, LegacyFetcher, Plugin, PluginRegistry};
use clerk_queue::{JobQueue, MemoryBackend};
use clerk_store::CentralStore;

use crate::context::{Context, EngineConfig};
use crate::extraction::fakes::FakeEntityExtractor;
use crate::ocr::fakes::FakeOcrBackend;

/// Registers an [`Extractor`] under `label` so `fetch` can resolve it via
/// `pipeline.extractor`.
struct LabeledExtractorPlugin {
    label: String,
    extractor: Arc<dyn Extractor>,
}

#[async_trait]
impl Plugin for LabeledExtractorPlugin {
    fn name(&self) -> &str {
        "labeled_extractor_test_plugin"
    }

    fn extractor_class(&self, label: &str) -> Option<Arc<dyn Extractor>> {
        (label == self.label).then(|| self.extractor.clone())
    }
}

/// Registers a [`LegacyFetcher`] under `label` so `fetch` can resolve it
/// via `scraper` + `FetcherAdapter`.
struct LabeledFetcherPlugin {
    label: String,
    fetcher: Arc<dyn LegacyFetcher>,
}

#[async_trait]
impl Plugin for LabeledFetcherPlugin {
    fn name(&self) -> &str {
        "labeled_fetcher_test_plugin"
    }

    fn fetcher_class(&self, label: &str) -> Option<Arc<dyn LegacyFetcher>> {
        (label == self.label).then(|| self.fetcher.clone())
    }
}

pub struct Fixture {
    pub ctx: Context<FakeClock>,
    pub store: Arc<CentralStore>,
    pub _dir: tempfile::TempDir,
}

/// A fresh store + memory-backed queue + plugin registry + fake OCR
/// backends, rooted at a fresh temp directory, with `subdomain` already
/// created.
pub fn fixture(subdomain: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CentralStore::open(dir.path().join("wal.log"), dir.path()).unwrap());
    store.create_site(subdomain, 0).unwrap();

    let queue = Arc::new(JobQueue::new(store.clone(), Arc::new(MemoryBackend::new())));
    let plugins = Arc::new(PluginRegistry::new(store.clone()));
    let clock = FakeClock::new();

    let ctx = Context::new(
        store.clone(),
        queue,
        plugins,
        clock,
        dir.path(),
        EngineConfig::default(),
        Arc::new(FakeOcrBackend::new(clerk_core::OcrBackendKind::Tesseract, 1)),
        Arc::new(FakeOcrBackend::new(clerk_core::OcrBackendKind::Vision, 1)),
        Arc::new(FakeEntityExtractor),
    );
    Fixture { ctx, store, _dir: dir }
}

/// Registers `extractor` under `label` on `fixture.ctx.plugins`. Takes the
/// registry by reconstructing it since `PluginRegistry::register` needs
/// `&mut self` and `Context::plugins` is an `Arc`.
pub fn register_extractor(fixture: &mut Fixture, label: &str, extractor: Arc<dyn Extractor>) {
    let mut registry = PluginRegistry::new(fixture.store.clone());
    registry.register(Arc::new(LabeledExtractorPlugin { label: label.to_string(), extractor }));
    fixture.ctx.plugins = Arc::new(registry);
}

/// Registers `fetcher` under `label` on `fixture.ctx.plugins`, mirroring
/// [`register_extractor`].
pub fn register_fetcher(fixture: &mut Fixture, label: &str, fetcher: Arc<dyn LegacyFetcher>) {
    let mut registry = PluginRegistry::new(fixture.store.clone());
    registry.register(Arc::new(LabeledFetcherPlugin { label: label.to_string(), fetcher }));
    fixture.ctx.plugins = Arc::new(registry);
}

pub fn write_pdf(dir: &Path) {
    std::fs::create_dir_all(dir.parent().unwrap()).unwrap();
    std::fs::write(dir, b"%PDF-1.4").unwrap();
}
