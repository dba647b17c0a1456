// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Stage handlers, worker runtime, scheduler, and reconciler for clerk
//! (spec.md SS4).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod context;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod logging;
pub mod ocr;
pub mod reconciler;
pub mod scheduler;
pub mod test_mode;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use context::{Context, EngineConfig};
pub use error::{EngineError, Result};
pub use extraction::{EntityExtractor, ExtractedPage, SubprocessExtractor};
pub use ocr::{OcrBackend, TesseractBackend, VisionBackend};
pub use reconciler::Outcome as ReconcileOutcome;
pub use test_mode::{Options as TestModeOptions, Report as TestModeReport};
pub use worker::{Worker, WorkerConfig};
