// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Lookup-hook strategies: `Extractor`/`Transformer`/`Loader`/`LegacyFetcher`.
//!
//! These are resolved once per `fetch` via [`crate::registry::PluginRegistry`]
//! lookup hooks, not invoked per-plugin like the notification hooks in
//! [`crate::hooks`].

use std::sync::Arc;

use async_trait::async_trait;
use clerk_core::StorageLayout;

use crate::error::PluginError;

/// Populates a site's PDF tree. The default pipeline resolves one by
/// `pipeline.extractor` label; legacy scrapers are adapted via
/// [`FetcherAdapter`].
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, subdomain: &str, layout: &StorageLayout, all_years: bool, all_agendas: bool) -> Result<(), PluginError>;
}

/// Reshapes extracted text before it reaches a [`Loader`]. `IdentityTransformer`
/// is the default and passes text through unchanged.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, text: &str) -> Result<String, PluginError>;
}

/// Accepts already-transformed output. `compile`/`extract` write
/// `meetings.db` directly; `GenericLoader` is the default no-op that
/// satisfies the lookup without duplicating that write.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, subdomain: &str, text: &str) -> Result<(), PluginError>;
}

/// Legacy single-object scraper interface (spec.md SS9 Open Question):
/// its `fetch_events` method is adapted into [`Extractor`] by
/// [`FetcherAdapter`], reusing the default loader.
#[async_trait]
pub trait LegacyFetcher: Send + Sync {
    async fn fetch_events(&self, subdomain: &str, layout: &StorageLayout, all_years: bool, all_agendas: bool) -> Result<(), PluginError>;
}

/// Adapts a [`LegacyFetcher`] into an [`Extractor`]. Treated as opaque:
/// the adapter's own partial-failure semantics are whatever the wrapped
/// fetcher does, and it always reuses the default loader rather than
/// resolving one of its own (spec.md SS9).
pub struct FetcherAdapter {
    inner: Arc<dyn LegacyFetcher>,
}

impl FetcherAdapter {
    pub fn new(inner: Arc<dyn LegacyFetcher>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Extractor for FetcherAdapter {
    async fn extract(&self, subdomain: &str, layout: &StorageLayout, all_years: bool, all_agendas: bool) -> Result<(), PluginError> {
        self.inner.fetch_events(subdomain, layout, all_years, all_agendas).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;

    /// Records calls and writes nothing; used by `test-pipeline` and
    /// integration tests that need a deterministic `Extractor`.
    #[derive(Default)]
    pub struct MockExtractor {
        pub pdfs_to_write: Vec<(&'static str, &'static str)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockExtractor {
        pub fn new(pdfs_to_write: Vec<(&'static str, &'static str)>) -> Self {
            Self { pdfs_to_write, calls: Mutex::new(Vec::new()) }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Extractor for MockExtractor {
        async fn extract(&self, subdomain: &str, layout: &StorageLayout, _all_years: bool, _all_agendas: bool) -> Result<(), PluginError> {
            self.calls.lock().push(subdomain.to_string());
            for (meeting, date) in &self.pdfs_to_write {
                let path = layout.pdf_path(clerk_core::DocumentKind::Minutes, meeting, date);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| PluginError::Hook(e.to_string()))?;
                }
                std::fs::write(&path, b"%PDF-1.4 mock").map_err(|e| PluginError::Hook(e.to_string()))?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "strategies_tests.rs"]
mod tests;
