// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! The `Site` aggregate: one civic-band subdomain's pipeline state.

use serde::{Deserialize, Serialize};

use crate::ocr::OcrBackendKind;
use crate::run::RunId;
use crate::stage::{ExtractionStatus, SiteStatus, Stage};

/// Per-site knobs that change how the pipeline treats it.
///
/// Set once at `clerk new` time and mutable via `clerk update` (spec.md SS6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub enable_entities: bool,
    pub ocr_backend: OcrBackendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_target: Option<String>,
    /// Structured pipeline labels, resolved by `fetch`/`deploy` via the
    /// plugin registry's lookup hooks. Wins over `scraper` when both are
    /// set (spec.md SS3.1 "exactly one pipeline-config field is
    /// authoritative; if both present, pipeline wins").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,
    /// Legacy single-label scraper, adapted via `FetcherAdapter` when no
    /// `extractor` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraper: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_entities: false,
            ocr_backend: OcrBackendKind::Tesseract,
            deploy_target: None,
            extractor: None,
            transformer: None,
            loader: None,
            scraper: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_enable_entities(mut self, v: bool) -> Self {
        self.enable_entities = v;
        self
    }

    pub fn with_ocr_backend(mut self, v: OcrBackendKind) -> Self {
        self.ocr_backend = v;
        self
    }

    pub fn with_deploy_target(mut self, v: impl Into<String>) -> Self {
        self.deploy_target = Some(v.into());
        self
    }

    pub fn with_extractor(mut self, v: impl Into<String>) -> Self {
        self.extractor = Some(v.into());
        self
    }

    pub fn with_transformer(mut self, v: impl Into<String>) -> Self {
        self.transformer = Some(v.into());
        self
    }

    pub fn with_loader(mut self, v: impl Into<String>) -> Self {
        self.loader = Some(v.into());
        self
    }

    pub fn with_scraper(mut self, v: impl Into<String>) -> Self {
        self.scraper = Some(v.into());
        self
    }
}

/// Document counters for one run, incremented by stage handlers under the
/// store's single-writer lock (spec.md SS4.3 "atomic counters").
///
/// Every increment is status-guarded by the handler, not by this struct:
/// the struct itself just holds the numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounters {
    pub documents_total: u32,
    pub documents_fetched: u32,
    pub documents_ocred: u32,
    pub documents_ocr_failed: u32,
    pub documents_compiled: u32,
    pub documents_extracted: u32,
    /// `compile`/`extract` run as one all-or-nothing job over every page in
    /// the txt tree, so `_total` is the attempted page count and `_failed`
    /// is either 0 (job succeeded, `documents_compiled`/`documents_extracted`
    /// holds the completed count) or the same value as `_total` (job failed
    /// before writing any page) — there's no partial-progress tracking
    /// inside the job loop itself.
    pub documents_compile_total: u32,
    pub documents_compile_failed: u32,
    pub documents_extract_total: u32,
    pub documents_extract_failed: u32,
    /// `deploy` acts on one site, not a page count, so these are 0/1.
    pub documents_deploy_total: u32,
    pub documents_deploy_completed: u32,
    pub documents_deploy_failed: u32,
}

impl StageCounters {
    /// True once every fetched document has been through OCR, one way or
    /// the other. The OCR coordinator polls this to decide whether to
    /// enqueue the `compile` job (spec.md SS4.6.1).
    pub fn ocr_complete(&self) -> bool {
        self.documents_ocred + self.documents_ocr_failed >= self.documents_fetched
    }
}

/// One civic-band site and its current place in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub subdomain: String,
    pub status: SiteStatus,
    pub stage: Stage,
    pub extraction_status: ExtractionStatus,
    pub counters: StageCounters,
    pub pipeline_config: PipelineConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_run_id: Option<RunId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_run_id: Option<RunId>,
    /// Set true when the OCR coordinator job has been enqueued for the
    /// current run; cleared once its fan-in resolves. The scheduler skips
    /// sites where this is true and OCR is still in flight (spec.md SS4.7).
    #[serde(default)]
    pub coordinator_enqueued: bool,
    pub created_at_ms: u64,
    /// Timestamp of the last scheduler-relevant activity on this site, or
    /// `None` for a site that has never been enqueued. `get_oldest_site`
    /// treats `None` as older than any timestamp (spec.md SS4.2).
    #[serde(default)]
    pub last_updated_ms: Option<u64>,
}

impl Site {
    pub fn new(subdomain: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            subdomain: subdomain.into(),
            status: SiteStatus::New,
            stage: Stage::None,
            extraction_status: ExtractionStatus::Pending,
            counters: StageCounters::default(),
            pipeline_config: PipelineConfig::default(),
            current_run_id: None,
            last_completed_run_id: None,
            coordinator_enqueued: false,
            created_at_ms,
            last_updated_ms: None,
        }
    }
}

crate::builder! {
    pub struct SiteBuilder => Site {
        into {
            subdomain: String = "example.civic.band",
        }
        set {
            status: SiteStatus = SiteStatus::New,
            stage: Stage = Stage::None,
            extraction_status: ExtractionStatus = ExtractionStatus::Pending,
            counters: StageCounters = StageCounters::default(),
            pipeline_config: PipelineConfig = PipelineConfig::default(),
            coordinator_enqueued: bool = false,
            created_at_ms: u64 = 1_700_000_000_000,
        }
        option {
            current_run_id: RunId = None,
            last_completed_run_id: RunId = None,
        }
        computed {
            last_updated_ms: Option<u64> = None,
        }
    }
}
