// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Typed per-`JobType` payloads.
//!
//! Generalizes spec.md's "type-specific arguments" into a closed enum
//! instead of a free-form map (Design Note in spec.md SS9: enumerated
//! strategy over dynamic dispatch wherever the shape is known ahead of time).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::job_type::JobType;
use crate::ocr::OcrBackendKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "job_type", rename_all = "kebab-case")]
pub enum JobPayload {
    Fetch {
        all_years: bool,
        all_agendas: bool,
    },
    OcrPage {
        pdf_path: PathBuf,
        backend: OcrBackendKind,
    },
    OcrCoordinator,
    Compile,
    Extract {
        #[serde(default = "default_true")]
        enable_entities: bool,
    },
    Deploy,
    Reconcile,
}

fn default_true() -> bool {
    true
}

impl JobPayload {
    pub fn fetch(all_years: bool, all_agendas: bool) -> Self {
        JobPayload::Fetch { all_years, all_agendas }
    }

    pub fn ocr_page(pdf_path: PathBuf, backend: OcrBackendKind) -> Self {
        JobPayload::OcrPage { pdf_path, backend }
    }

    /// Short tag used in log records and queue item summaries.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            JobPayload::Fetch { .. } => "fetch",
            JobPayload::OcrPage { .. } => "ocr-page",
            JobPayload::OcrCoordinator => "ocr-coordinator",
            JobPayload::Compile => "compile",
            JobPayload::Extract { .. } => "extract",
            JobPayload::Deploy => "deploy",
            JobPayload::Reconcile => "reconcile",
        }
    }

    /// The [`JobType`] this payload belongs to.
    pub fn job_type(&self) -> JobType {
        match self {
            JobPayload::Fetch { .. } => JobType::Fetch,
            JobPayload::OcrPage { .. } => JobType::OcrPage,
            JobPayload::OcrCoordinator => JobType::OcrCoordinator,
            JobPayload::Compile => JobType::Compile,
            JobPayload::Extract { .. } => JobType::Extract,
            JobPayload::Deploy => JobType::Deploy,
            JobPayload::Reconcile => JobType::Reconcile,
        }
    }
}
