// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Manifest-driven plugin discovery (spec.md SS4.1 "discovery"; SPEC_FULL.md
//! SS4.1 Open Question).
//!
//! Rust has no safe runtime class introspection and this codebase does not
//! dynamically load code, so discovery resolves a `plugins.toml` manifest
//! against a compiled-in catalog of constructors instead of scanning a
//! directory of source files. An unknown `builtin_name` or a malformed
//! manifest is a fatal `Err` — "silent skipping is forbidden" applies just
//! as much to a closed catalog as to the dynamic-loading source.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::defaults::AuditLogPlugin;
use crate::error::PluginError;
use crate::hooks::Plugin;
use crate::registry::PluginRegistry;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    plugin: Vec<PluginManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct PluginManifestEntry {
    label: String,
    /// Declared hook category (`observer`, `extractor`, ...); informational
    /// today, kept so manifests stay self-describing as the catalog grows.
    #[serde(default)]
    #[allow(dead_code)]
    kind: String,
    builtin_name: String,
}

/// Resolve a manifest entry's `builtin_name` against the compiled-in
/// catalog of constructors. Add a new case here when a new built-in
/// plugin becomes discoverable.
fn construct_builtin(manifest_path: &Path, builtin_name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
    match builtin_name {
        "audit_log" => Ok(Arc::new(AuditLogPlugin)),
        other => Err(PluginError::UnknownBuiltin { manifest_path: manifest_path.to_path_buf(), builtin_name: other.to_string() }),
    }
}

/// Load `{plugins_dir}/plugins.toml`, register every listed plugin into
/// `registry`. A missing manifest file is not an error — it means no
/// operator plugins are configured — but a present-and-unparseable or
/// present-and-unknown-builtin manifest always is.
pub fn load_plugins_dir(plugins_dir: &Path, registry: &mut PluginRegistry) -> Result<(), PluginError> {
    let manifest_path = plugins_dir.join("plugins.toml");
    if !manifest_path.exists() {
        return Ok(());
    }
    let raw = std::fs::read_to_string(&manifest_path).map_err(|source| PluginError::Io { path: manifest_path.clone(), source })?;
    let manifest: Manifest = toml::from_str(&raw)
        .map_err(|e| PluginError::MalformedManifest { path: manifest_path.clone(), reason: e.to_string() })?;

    for entry in &manifest.plugin {
        tracing::info!(label = %entry.label, builtin_name = %entry.builtin_name, "registering plugin from manifest");
        let plugin = construct_builtin(&manifest_path, &entry.builtin_name)?;
        registry.register(plugin);
    }
    Ok(())
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
