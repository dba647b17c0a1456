// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Default plugins always registered first by [`crate::registry::PluginRegistry::new`]
//! (spec.md SS4.1): a store writer, an identity transformer, and a no-op
//! loader. Operator plugins run after these and observe the same calls.

use std::sync::Arc;

use async_trait::async_trait;
use clerk_core::Site;
use clerk_store::CentralStore;

use crate::error::PluginError;
use crate::hooks::{Plugin, SiteUpdate};
use crate::strategies::{Loader, Transformer};

/// Performs the actual central-store write on `create_site`/`update_site`.
/// Every other registered plugin only observes; this one persists.
pub struct DefaultStoreWriter {
    store: Arc<CentralStore>,
}

impl DefaultStoreWriter {
    pub fn new(store: Arc<CentralStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Plugin for DefaultStoreWriter {
    fn name(&self) -> &str {
        "default_store_writer"
    }

    async fn create_site(&self, subdomain: &str, created_at_ms: u64) -> Result<(), PluginError> {
        self.store.create_site(subdomain, created_at_ms).map_err(|e| PluginError::Hook(e.to_string()))?;
        Ok(())
    }

    async fn update_site(&self, subdomain: &str, update: &SiteUpdate) -> Result<(), PluginError> {
        let map_err = |e: clerk_store::StoreError| PluginError::Hook(e.to_string());
        if let Some(status) = update.status {
            self.store.set_status(subdomain, status).map_err(map_err)?;
        }
        if let Some(stage) = update.stage {
            self.store.set_stage(subdomain, stage).map_err(map_err)?;
        }
        if let Some(extraction_status) = update.extraction_status {
            self.store.set_extraction_status(subdomain, extraction_status).map_err(map_err)?;
        }
        if let Some(config) = update.pipeline_config.clone() {
            self.store.update_pipeline_config(subdomain, config).map_err(map_err)?;
        }
        Ok(())
    }
}

/// Passes text through unchanged; the default `transformer_class` lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

#[async_trait]
impl Transformer for IdentityTransformer {
    async fn transform(&self, text: &str) -> Result<String, PluginError> {
        Ok(text.to_string())
    }
}

#[async_trait]
impl Plugin for IdentityTransformer {
    fn name(&self) -> &str {
        "identity_transformer"
    }

    fn transformer_class(&self, _label: &str) -> Option<Arc<dyn Transformer>> {
        Some(Arc::new(IdentityTransformer))
    }
}

/// No-op loader: `compile`/`extract` already write `meetings.db` directly,
/// so the default `loader_class` lookup only needs to satisfy the hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericLoader;

#[async_trait]
impl Loader for GenericLoader {
    async fn load(&self, _subdomain: &str, _text: &str) -> Result<(), PluginError> {
        Ok(())
    }
}

#[async_trait]
impl Plugin for GenericLoader {
    fn name(&self) -> &str {
        "generic_loader"
    }

    fn loader_class(&self, _label: &str) -> Option<Arc<dyn Loader>> {
        Some(Arc::new(GenericLoader))
    }
}

/// Built-in observer plugin resolvable from `plugins.toml` via
/// `builtin_name = "audit_log"` (spec.md SS4.1 "audit/webhook/cache
/// invalidation side-channels"). Logs every notification hook at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditLogPlugin;

#[async_trait]
impl Plugin for AuditLogPlugin {
    fn name(&self) -> &str {
        "audit_log"
    }

    async fn create_site(&self, subdomain: &str, created_at_ms: u64) -> Result<(), PluginError> {
        tracing::info!(subdomain, created_at_ms, "audit: site created");
        Ok(())
    }

    async fn update_site(&self, subdomain: &str, update: &SiteUpdate) -> Result<(), PluginError> {
        tracing::info!(subdomain, ?update, "audit: site updated");
        Ok(())
    }

    async fn deploy_municipality(&self, subdomain: &str) -> Result<(), PluginError> {
        tracing::info!(subdomain, "audit: deploy_municipality");
        Ok(())
    }

    async fn post_deploy(&self, site: &Site) -> Result<(), PluginError> {
        tracing::info!(subdomain = %site.subdomain, "audit: post_deploy");
        Ok(())
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
