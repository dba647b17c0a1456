// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Pipeline stage and coarse site-status enums.

use serde::{Deserialize, Serialize};

/// Current stage of a site's pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    None,
    Fetch,
    Ocr,
    Compilation,
    Extraction,
    Deploy,
    Completed,
    Failed,
}

crate::simple_display! {
    Stage {
        None => "none",
        Fetch => "fetch",
        Ocr => "ocr",
        Compilation => "compilation",
        Extraction => "extraction",
        Deploy => "deploy",
        Completed => "completed",
        Failed => "failed",
    }
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

/// Coarse operator-facing status string for a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    New,
    NeedsFetch,
    NeedsExtraction,
    NeedsDeploy,
    Deployed,
    Failed,
}

crate::simple_display! {
    SiteStatus {
        New => "new",
        NeedsFetch => "needs_fetch",
        NeedsExtraction => "needs_extraction",
        NeedsDeploy => "needs_deploy",
        Deployed => "deployed",
        Failed => "failed",
    }
}

/// Status of the optional entity/vote extraction branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

crate::simple_display! {
    ExtractionStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}
