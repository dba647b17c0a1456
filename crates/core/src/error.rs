// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Error types shared across `clerk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to (de)serialize: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
