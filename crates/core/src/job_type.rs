// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Job type tags and their per-stage queue routing.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// The kind of work a [`crate::job::Job`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    Fetch,
    OcrPage,
    OcrCoordinator,
    Compile,
    Extract,
    Deploy,
    Reconcile,
}

crate::simple_display! {
    JobType {
        Fetch => "fetch",
        OcrPage => "ocr-page",
        OcrCoordinator => "ocr-coordinator",
        Compile => "compile",
        Extract => "extract",
        Deploy => "deploy",
        Reconcile => "reconcile",
    }
}

impl JobType {
    /// The named queue a job of this type is enqueued onto.
    ///
    /// `ocr-coordinator` is pushed onto the `compilation` queue (it gates
    /// entry into the compilation stage), not the `ocr` queue it depends on.
    pub fn queue_name(self) -> &'static str {
        match self {
            JobType::Fetch => "fetch",
            JobType::OcrPage => "ocr",
            JobType::OcrCoordinator => "compilation",
            JobType::Compile => "compilation",
            JobType::Extract => "extraction",
            JobType::Deploy => "deploy",
            JobType::Reconcile => "reconcile",
        }
    }

    /// The pipeline stage this job type advances a site into once it starts.
    pub fn stage(self) -> Stage {
        match self {
            JobType::Fetch => Stage::Fetch,
            JobType::OcrPage | JobType::OcrCoordinator => Stage::Ocr,
            JobType::Compile => Stage::Compilation,
            JobType::Extract => Stage::Extraction,
            JobType::Deploy => Stage::Deploy,
            JobType::Reconcile => Stage::None,
        }
    }
}
