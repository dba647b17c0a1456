// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Custom error type that carries a process exit code (spec.md SS6
//! "exit codes 0 success / 1 usage error / 2 runtime error").
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, letting `main()` own process termination.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(1, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<clerk_engine::EngineError> for ExitError {
    fn from(e: clerk_engine::EngineError) -> Self {
        Self::runtime(e.to_string())
    }
}

impl From<clerk_store::StoreError> for ExitError {
    fn from(e: clerk_store::StoreError) -> Self {
        Self::runtime(e.to_string())
    }
}

impl From<clerk_queue::QueueError> for ExitError {
    fn from(e: clerk_queue::QueueError) -> Self {
        Self::runtime(e.to_string())
    }
}

impl From<clerk_plugins::PluginError> for ExitError {
    fn from(e: clerk_plugins::PluginError) -> Self {
        Self::runtime(e.to_string())
    }
}

impl From<std::io::Error> for ExitError {
    fn from(e: std::io::Error) -> Self {
        Self::runtime(e.to_string())
    }
}
