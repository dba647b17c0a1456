// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `CentralStore`: the single-writer, WAL-backed source of truth for site
//! and job state (spec.md SS4.3).
//!
//! Every mutation takes the same shape: compute the absolute new value
//! under the lock, append a [`StoreEvent`] describing it, apply it to the
//! in-memory [`MaterializedState`], then release the lock. That ordering
//! is what makes concurrent `increment_counter`/`read_counters` calls on
//! the same site serializable without losing updates.

use std::path::{Path, PathBuf};

use clerk_core::{DocumentKind, Job, JobId, JobStatus, JobType, PipelineConfig, RunId, Site, SiteStatus, StageCounters, StorageLayout};
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::event::{CounterField, StoreEvent};
use crate::fs_scan::{self, OnDiskCounts};
use crate::state::MaterializedState;
use crate::wal::Wal;

const DEFAULT_LOOKBACK_HOURS: u64 = 23;

pub struct CentralStore {
    inner: Mutex<Inner>,
    storage_dir: PathBuf,
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
}

impl CentralStore {
    /// Open (or create) the store's WAL at `wal_path` and replay it into a
    /// fresh [`MaterializedState`]. `storage_dir` is the `STORAGE_DIR` root
    /// used to resolve each site's on-disk tree.
    pub fn open(wal_path: impl AsRef<Path>, storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut wal = Wal::open(wal_path, 0)?;
        let mut state = MaterializedState::default();
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }
        Ok(Self { inner: Mutex::new(Inner { wal, state }), storage_dir: storage_dir.into() })
    }

    fn append(&self, inner: &mut Inner, event: StoreEvent) -> Result<()> {
        inner.wal.append(&event)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        inner.state.apply_event(&event);
        Ok(())
    }

    pub fn get_site(&self, subdomain: &str) -> Option<Site> {
        self.inner.lock().state.get_site(subdomain).cloned()
    }

    pub fn create_site(&self, subdomain: &str, created_at_ms: u64) -> Result<Site> {
        let mut inner = self.inner.lock();
        if inner.state.get_site(subdomain).is_some() {
            return Err(StoreError::SiteAlreadyExists(subdomain.to_string()));
        }
        let site = Site::new(subdomain, created_at_ms);
        self.append(&mut inner, StoreEvent::SiteCreated { subdomain: subdomain.to_string(), created_at_ms })?;
        Ok(site)
    }

    pub fn update_pipeline_config(&self, subdomain: &str, config: PipelineConfig) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::PipelineConfigUpdated { subdomain: subdomain.to_string(), config })
    }

    pub fn start_run(&self, subdomain: &str, run_id: RunId, at_ms: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::RunStarted { subdomain: subdomain.to_string(), run_id, at_ms })
    }

    pub fn complete_run(&self, subdomain: &str, run_id: RunId) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::RunCompleted { subdomain: subdomain.to_string(), run_id })
    }

    pub fn set_stage(&self, subdomain: &str, stage: clerk_core::Stage) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::StageAdvanced { subdomain: subdomain.to_string(), stage })
    }

    pub fn set_status(&self, subdomain: &str, status: SiteStatus) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::StatusChanged { subdomain: subdomain.to_string(), status })
    }

    pub fn set_extraction_status(&self, subdomain: &str, status: clerk_core::ExtractionStatus) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::ExtractionStatusChanged { subdomain: subdomain.to_string(), status })
    }

    pub fn set_coordinator_enqueued(&self, subdomain: &str, enqueued: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::CoordinatorEnqueuedChanged { subdomain: subdomain.to_string(), enqueued })
    }

    /// Set `last_updated_ms` directly, without starting a new run.
    pub fn touch(&self, subdomain: &str, at_ms: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::LastUpdatedTouched { subdomain: subdomain.to_string(), at_ms })
    }

    /// Returns the subdomain of the least-recently-updated eligible site:
    /// `last_updated` is `None` or older than `now_ms - lookback_hours`.
    /// Ties break NULL-first, then by ascending timestamp (spec.md SS4.3).
    pub fn get_oldest_site(&self, now_ms: u64, lookback_hours: Option<u64>) -> Option<String> {
        let lookback_ms = lookback_hours.unwrap_or(DEFAULT_LOOKBACK_HOURS) * 3600 * 1000;
        let cutoff = now_ms.saturating_sub(lookback_ms);
        let inner = self.inner.lock();
        let mut candidates: Vec<&Site> = inner
            .state
            .sites
            .values()
            .filter(|site| match site.last_updated_ms {
                None => true,
                Some(ts) => ts < cutoff,
            })
            .collect();
        candidates.sort_by_key(|site| (site.last_updated_ms.is_some(), site.last_updated_ms));
        candidates.first().map(|site| site.subdomain.clone())
    }

    pub fn increment_counter(&self, subdomain: &str, field: CounterField, delta: i64) -> Result<u32> {
        let mut inner = self.inner.lock();
        let current = self.counter_value(&inner, subdomain, field)?;
        let next = (current as i64 + delta).max(0) as u32;
        self.append(&mut inner, StoreEvent::CounterSet { subdomain: subdomain.to_string(), field, value: next })?;
        Ok(next)
    }

    pub fn set_counter(&self, subdomain: &str, field: CounterField, value: u32) -> Result<()> {
        let mut inner = self.inner.lock();
        self.require_site(&inner, subdomain)?;
        self.append(&mut inner, StoreEvent::CounterSet { subdomain: subdomain.to_string(), field, value })
    }

    pub fn read_counters(&self, subdomain: &str) -> Result<StageCounters> {
        let inner = self.inner.lock();
        Ok(self.require_site(&inner, subdomain)?.counters)
    }

    /// Recompute `ocr_total`/`ocr_completed` straight from the storage
    /// tree, bypassing the store's own bookkeeping (spec.md SS3.5).
    pub fn count_documents_on_disk(&self, subdomain: &str, kind: DocumentKind) -> Result<OnDiskCounts> {
        let layout = StorageLayout::new(&self.storage_dir, subdomain);
        fs_scan::count_documents_on_disk(&layout, kind)
    }

    pub fn storage_layout(&self, subdomain: &str) -> StorageLayout {
        StorageLayout::new(&self.storage_dir, subdomain)
    }

    pub fn track_job(&self, job: Job) -> Result<()> {
        let mut inner = self.inner.lock();
        self.append(&mut inner, StoreEvent::JobTracked { job: Box::new(job) })
    }

    pub fn set_job_status(&self, job_id: JobId, status: JobStatus, attempt: u32, error: Option<String>) -> Result<()> {
        let mut inner = self.inner.lock();
        self.append(&mut inner, StoreEvent::JobStatusChanged { job_id, status, attempt, error })
    }

    pub fn get_job(&self, job_id: &JobId) -> Option<Job> {
        self.inner.lock().state.get_job(job_id).cloned()
    }

    /// Every tracked site, for scans that have to walk the whole store
    /// (the scheduler's staleness gate, the reconciler's stuck-site sweep).
    pub fn list_sites(&self) -> Vec<Site> {
        self.inner.lock().state.sites.values().cloned().collect()
    }

    /// Non-terminal jobs of `job_type` for `(subdomain, run_id)`, used by
    /// the reconciler to avoid enqueueing a second live `ocr-coordinator`
    /// for the same run (spec.md SS4.8 "never enqueue a coordinator while
    /// one is live").
    pub fn live_jobs_of_type(&self, subdomain: &str, run_id: &RunId, job_type: JobType) -> Vec<Job> {
        self.inner
            .lock()
            .state
            .jobs
            .values()
            .filter(|job| {
                job.subdomain == subdomain
                    && job.run_id == *run_id
                    && job.job_type == job_type
                    && !job.status.is_terminal()
            })
            .cloned()
            .collect()
    }

    fn require_site(&self, inner: &Inner, subdomain: &str) -> Result<Site> {
        inner.state.get_site(subdomain).cloned().ok_or_else(|| StoreError::SiteNotFound(subdomain.to_string()))
    }

    fn counter_value(&self, inner: &Inner, subdomain: &str, field: CounterField) -> Result<u32> {
        let counters = self.require_site(inner, subdomain)?.counters;
        Ok(match field {
            CounterField::Total => counters.documents_total,
            CounterField::Fetched => counters.documents_fetched,
            CounterField::Ocred => counters.documents_ocred,
            CounterField::OcrFailed => counters.documents_ocr_failed,
            CounterField::Compiled => counters.documents_compiled,
            CounterField::Extracted => counters.documents_extracted,
            CounterField::CompileTotal => counters.documents_compile_total,
            CounterField::CompileFailed => counters.documents_compile_failed,
            CounterField::ExtractTotal => counters.documents_extract_total,
            CounterField::ExtractFailed => counters.documents_extract_failed,
            CounterField::DeployTotal => counters.documents_deploy_total,
            CounterField::DeployCompleted => counters.documents_deploy_completed,
            CounterField::DeployFailed => counters.documents_deploy_failed,
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
