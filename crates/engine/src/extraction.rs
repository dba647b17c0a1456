// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `EntityExtractor`: the small interface entity/vote extraction is invoked
//! through, mirroring [`crate::ocr::OcrBackend`] (spec.md §1 "the per-site
//! output database schema... owned by loaders" — the extraction algorithm
//! itself, like the OCR engines, is an external collaborator invoked via
//! subprocess, not reimplemented here).

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedPage {
    pub entity_count: u32,
    pub vote_count: u32,
}

#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract_page(&self, text: &str) -> Result<ExtractedPage, EngineError>;
}

/// Shells out to an external `clerk-entity-extract` binary on `PATH`,
/// fanned out across `SPACY_N_PROCESS` worker processes at the caller's
/// discretion (spec.md §6 "SPACY_N_PROCESS — extraction subprocess
/// fan-out"); this type itself runs one page at a time.
pub struct SubprocessExtractor;

#[async_trait]
impl EntityExtractor for SubprocessExtractor {
    async fn extract_page(&self, text: &str) -> Result<ExtractedPage, EngineError> {
        let mut child = Command::new("clerk-entity-extract")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        {
            use tokio::io::AsyncWriteExt;
            let stdin = child.stdin.as_mut().ok_or_else(|| EngineError::io("no stdin handle for clerk-entity-extract"))?;
            stdin.write_all(text.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(EngineError::new(
                "entity_extraction_failed",
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        serde_json::from_slice(&output.stdout).map_err(EngineError::from)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;

    /// Counts capitalized words as a deterministic stand-in for real NLP,
    /// so `extract`'s caching/idempotence can be tested without a real
    /// `clerk-entity-extract` binary on `PATH`.
    pub struct FakeEntityExtractor;

    #[async_trait]
    impl EntityExtractor for FakeEntityExtractor {
        async fn extract_page(&self, text: &str) -> Result<ExtractedPage, EngineError> {
            let entity_count = text.split_whitespace().filter(|w| w.chars().next().is_some_and(char::is_uppercase)).count() as u32;
            Ok(ExtractedPage { entity_count, vote_count: 0 })
        }
    }
}
