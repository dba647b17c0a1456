// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("wal io error: {0}")]
    WalIo(#[from] std::io::Error),

    #[error("wal entry corrupt at seq {seq}: {reason}")]
    WalCorrupt { seq: u64, reason: String },

    #[error("site {0:?} not found")]
    SiteNotFound(String),

    #[error("site {0:?} already exists")]
    SiteAlreadyExists(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error("failed to scan storage tree: {0}")]
    Scan(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
