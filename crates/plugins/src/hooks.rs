// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! The `Plugin` trait: one method per hook (spec.md SS4.1), each with a
//! no-op/`None` default so an implementor only overrides the hooks it cares
//! about.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use clerk_core::{ExtractionStatus, PipelineConfig, Site, SiteStatus, Stage};

use crate::error::PluginError;
use crate::strategies::{Extractor, Loader, LegacyFetcher, Transformer};

/// Enumerated strategy for "dynamic site pipeline config" (spec.md SS9):
/// a closed set of fields `update_site` may change, rather than a free-form
/// map. Unset fields are left as-is.
#[derive(Debug, Clone, Default)]
pub struct SiteUpdate {
    pub status: Option<SiteStatus>,
    pub stage: Option<Stage>,
    pub extraction_status: Option<ExtractionStatus>,
    pub pipeline_config: Option<PipelineConfig>,
    pub last_updated_ms: Option<u64>,
}

impl SiteUpdate {
    pub fn status(mut self, status: SiteStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn last_updated_ms(mut self, ms: u64) -> Self {
        self.last_updated_ms = Some(ms);
        self
    }
}

/// A registered extension point. All methods default to "not handled";
/// implementors override only the hooks they use (spec.md SS9 "dynamic
/// dispatch over runtime-loaded classes → a closed trait").
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable identifier used in log records and discovery diagnostics.
    fn name(&self) -> &str;

    fn extractor_class(&self, _label: &str) -> Option<Arc<dyn Extractor>> {
        None
    }

    fn transformer_class(&self, _label: &str) -> Option<Arc<dyn Transformer>> {
        None
    }

    fn loader_class(&self, _label: &str) -> Option<Arc<dyn Loader>> {
        None
    }

    fn fetcher_class(&self, _label: &str) -> Option<Arc<dyn LegacyFetcher>> {
        None
    }

    async fn create_site(&self, _subdomain: &str, _created_at_ms: u64) -> Result<(), PluginError> {
        Ok(())
    }

    async fn update_site(&self, _subdomain: &str, _update: &SiteUpdate) -> Result<(), PluginError> {
        Ok(())
    }

    async fn deploy_municipality(&self, _subdomain: &str) -> Result<(), PluginError> {
        Ok(())
    }

    async fn post_deploy(&self, _site: &Site) -> Result<(), PluginError> {
        Ok(())
    }

    async fn post_create(&self, _subdomain: &str) -> Result<(), PluginError> {
        Ok(())
    }

    async fn upload_static_file(&self, _file_path: &Path, _storage_path: &str) -> Result<(), PluginError> {
        Ok(())
    }
}
