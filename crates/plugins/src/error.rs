// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin hook failed: {0}")]
    Hook(String),

    #[error("unknown builtin plugin {builtin_name:?} referenced in {manifest_path}")]
    UnknownBuiltin { manifest_path: PathBuf, builtin_name: String },

    #[error("malformed plugin manifest {path}: {reason}")]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("failed to read plugin manifest {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, PluginError>;
