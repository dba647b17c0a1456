// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `EngineError`: the single error type stage handlers, the worker loop,
//! the scheduler, and the reconciler all return.
//!
//! Carries `{error_type, error_message}` directly (spec.md SS4.2 "Error
//! logs must include... error_type, error_message") so the `_failed`
//! milestone log event always has real fields, not a string re-parsed
//! out of a `Display` impl.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{error_type}: {error_message}")]
pub struct EngineError {
    pub error_type: &'static str,
    pub error_message: String,
}

impl EngineError {
    pub fn new(error_type: &'static str, error_message: impl Into<String>) -> Self {
        Self { error_type, error_message: error_message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new("configuration_error", message)
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::new("consistency_error", message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new("io_error", message)
    }
}

impl From<clerk_store::StoreError> for EngineError {
    fn from(err: clerk_store::StoreError) -> Self {
        Self::new("store_error", err.to_string())
    }
}

impl From<clerk_queue::QueueError> for EngineError {
    fn from(err: clerk_queue::QueueError) -> Self {
        Self::new("queue_error", err.to_string())
    }
}

impl From<clerk_plugins::PluginError> for EngineError {
    fn from(err: clerk_plugins::PluginError) -> Self {
        Self::new("plugin_error", err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        Self::new("sqlite_error", err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::new("serde_error", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
