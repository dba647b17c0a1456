// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `PluginRegistry`: dispatches lookup hooks (first match wins) and
//! notification hooks (every plugin fires, failures isolated per plugin,
//! spec.md SS4.1/SS7).

use std::path::Path;
use std::sync::Arc;

use clerk_core::Site;

use crate::error::PluginError;
use crate::hooks::{Plugin, SiteUpdate};
use crate::strategies::{Extractor, LegacyFetcher, Loader, Transformer};

/// One notification hook's per-plugin outcome.
pub type HookFailures = Vec<(String, PluginError)>;

pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Registers the default plugins (store writer, identity transformer,
    /// generic loader) in the first slots; operator plugins registered
    /// afterward via [`Self::register`] run after them.
    pub fn new(store: Arc<clerk_store::CentralStore>) -> Self {
        let mut registry = Self { plugins: Vec::new() };
        registry.register(Arc::new(crate::defaults::DefaultStoreWriter::new(store)));
        registry.register(Arc::new(crate::defaults::IdentityTransformer));
        registry.register(Arc::new(crate::defaults::GenericLoader));
        registry
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Number of registered plugins, default and operator-supplied alike.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn extractor_class(&self, label: &str) -> Option<Arc<dyn Extractor>> {
        self.plugins.iter().find_map(|p| p.extractor_class(label))
    }

    pub fn transformer_class(&self, label: &str) -> Option<Arc<dyn Transformer>> {
        self.plugins.iter().find_map(|p| p.transformer_class(label))
    }

    pub fn loader_class(&self, label: &str) -> Option<Arc<dyn Loader>> {
        self.plugins.iter().find_map(|p| p.loader_class(label))
    }

    pub fn fetcher_class(&self, label: &str) -> Option<Arc<dyn LegacyFetcher>> {
        self.plugins.iter().find_map(|p| p.fetcher_class(label))
    }

    pub async fn create_site(&self, subdomain: &str, created_at_ms: u64) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let subdomain = subdomain.to_string();
            Box::pin(async move { plugin.create_site(&subdomain, created_at_ms).await })
        })
        .await
    }

    pub async fn update_site(&self, subdomain: &str, update: &SiteUpdate) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let subdomain = subdomain.to_string();
            let update = update.clone();
            Box::pin(async move { plugin.update_site(&subdomain, &update).await })
        })
        .await
    }

    pub async fn deploy_municipality(&self, subdomain: &str) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let subdomain = subdomain.to_string();
            Box::pin(async move { plugin.deploy_municipality(&subdomain).await })
        })
        .await
    }

    pub async fn post_deploy(&self, site: &Site) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let site = site.clone();
            Box::pin(async move { plugin.post_deploy(&site).await })
        })
        .await
    }

    pub async fn post_create(&self, subdomain: &str) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let subdomain = subdomain.to_string();
            Box::pin(async move { plugin.post_create(&subdomain).await })
        })
        .await
    }

    pub async fn upload_static_file(&self, file_path: &Path, storage_path: &str) -> (usize, HookFailures) {
        self.fan_out(|plugin| {
            let file_path = file_path.to_path_buf();
            let storage_path = storage_path.to_string();
            Box::pin(async move { plugin.upload_static_file(&file_path, &storage_path).await })
        })
        .await
    }

    /// Calls `call` on every registered plugin in registration order,
    /// isolating failures so one plugin's error never stops the rest
    /// (spec.md SS7 "Plugin hook exceptions are isolated per plugin").
    async fn fan_out<'a, F>(&'a self, call: F) -> (usize, HookFailures)
    where
        F: Fn(&'a Arc<dyn Plugin>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), PluginError>> + Send + 'a>>,
    {
        let mut success_count = 0;
        let mut failures = Vec::new();
        for plugin in &self.plugins {
            match call(plugin).await {
                Ok(()) => success_count += 1,
                Err(err) => {
                    tracing::warn!(plugin = plugin.name(), error = %err, "plugin hook failed");
                    failures.push((plugin.name().to_string(), err));
                }
            }
        }
        (success_count, failures)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
