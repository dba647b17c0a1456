// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Dependency-aware job queue on top of [`clerk_store::CentralStore`].
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod backend;
pub mod error;
pub mod queue;

pub use backend::{MemoryBackend, QueueBackend, RedisBackend};
pub use error::{QueueError, Result};
pub use queue::JobQueue;
