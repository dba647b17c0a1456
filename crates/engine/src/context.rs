// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `Context<C>`: the store/queue/plugin-registry/clock bundle threaded
//! through every handler, the scheduler, and the reconciler (spec.md SS9
//! "Global manager singleton -> explicit context").

use std::path::PathBuf;
use std::sync::Arc;

use clerk_core::{Clock, OcrBackendKind, StorageLayout};
use clerk_plugins::PluginRegistry;
use clerk_queue::JobQueue;
use clerk_store::CentralStore;

use crate::extraction::EntityExtractor;
use crate::ocr::OcrBackend;

/// Tunables that aren't part of any one site's [`clerk_core::PipelineConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// `get_oldest_site` lookback window (spec.md SS4.7).
    pub scheduler_lookback_hours: u64,
    /// A site is stuck once its stage is non-terminal and non-`none` for
    /// longer than this (spec.md SS4.8).
    pub reconcile_stuck_after_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { scheduler_lookback_hours: 23, reconcile_stuck_after_ms: 2 * 3600 * 1000 }
    }
}

/// Everything a stage handler, the scheduler, or the reconciler needs.
/// Generic over [`Clock`] so tests can drive time deterministically.
/// Every field is cheaply cloneable so a [`Context`] can be handed to a
/// spawned task without borrowing.
#[derive(Clone)]
pub struct Context<C: Clock> {
    pub store: Arc<CentralStore>,
    pub queue: Arc<JobQueue>,
    pub plugins: Arc<PluginRegistry>,
    pub clock: C,
    pub storage_dir: PathBuf,
    pub config: EngineConfig,
    pub tesseract: Arc<dyn OcrBackend>,
    pub vision: Arc<dyn OcrBackend>,
    pub entity_extractor: Arc<dyn EntityExtractor>,
}

impl<C: Clock> Context<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<CentralStore>,
        queue: Arc<JobQueue>,
        plugins: Arc<PluginRegistry>,
        clock: C,
        storage_dir: impl Into<PathBuf>,
        config: EngineConfig,
        tesseract: Arc<dyn OcrBackend>,
        vision: Arc<dyn OcrBackend>,
        entity_extractor: Arc<dyn EntityExtractor>,
    ) -> Self {
        Self { store, queue, plugins, clock, storage_dir: storage_dir.into(), config, tesseract, vision, entity_extractor }
    }

    pub fn layout(&self, subdomain: &str) -> StorageLayout {
        StorageLayout::new(&self.storage_dir, subdomain)
    }

    pub fn ocr_backend(&self, kind: OcrBackendKind) -> Arc<dyn OcrBackend> {
        match kind {
            OcrBackendKind::Tesseract => self.tesseract.clone(),
            OcrBackendKind::Vision => self.vision.clone(),
        }
    }
}
