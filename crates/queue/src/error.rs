// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Store(#[from] clerk_store::StoreError),

    #[error("job {0} not found")]
    JobNotFound(clerk_core::JobId),
}

pub type Result<T> = std::result::Result<T, QueueError>;
