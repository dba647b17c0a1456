// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Wires a [`clerk_engine::Context`] together from [`Config`] (spec.md SS6
//! "Persisted state" / "Environment variables").

use std::sync::Arc;

use clerk_core::SystemClock;
use clerk_engine::{Context, EngineConfig, SubprocessExtractor, TesseractBackend, VisionBackend};
use clerk_plugins::PluginRegistry;
use clerk_queue::{JobQueue, MemoryBackend, QueueBackend, RedisBackend};
use clerk_store::CentralStore;

use crate::config::Config;
use crate::exit_error::ExitError;

pub async fn build(config: &Config) -> Result<Context<SystemClock>, ExitError> {
    let store = Arc::new(CentralStore::open(&config.database_url, config.storage_dir.clone())?);

    let backend: Arc<dyn QueueBackend> = match &config.redis_url {
        Some(url) => Arc::new(RedisBackend::connect(url).await.map_err(|e| ExitError::runtime(e.to_string()))?),
        None => Arc::new(MemoryBackend::new()),
    };
    let queue = Arc::new(JobQueue::new(store.clone(), backend));

    let mut registry = PluginRegistry::new(store.clone());
    let plugins_dir = config.storage_dir.join("_plugins");
    clerk_plugins::load_plugins_dir(&plugins_dir, &mut registry).map_err(|e| ExitError::runtime(e.to_string()))?;

    Ok(Context::new(
        store,
        queue,
        Arc::new(registry),
        SystemClock,
        config.storage_dir.clone(),
        EngineConfig::default(),
        Arc::new(TesseractBackend),
        Arc::new(VisionBackend),
        Arc::new(SubprocessExtractor),
    ))
}
