// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Materialized state rebuilt by replaying [`StoreEvent`]s from the WAL.

use std::collections::HashMap;

use clerk_core::{Job, JobId, Site};
use serde::{Deserialize, Serialize};

use crate::event::{CounterField, StoreEvent};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub sites: HashMap<String, Site>,
    pub jobs: HashMap<JobId, Job>,
}

impl MaterializedState {
    pub fn get_site(&self, subdomain: &str) -> Option<&Site> {
        self.sites.get(subdomain)
    }

    pub fn get_job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Apply one event to derive the next state.
    ///
    /// All handlers are idempotent: applying the same event twice leaves
    /// state identical to applying it once. Counter events and status
    /// events carry absolute values for exactly this reason; only
    /// `SiteCreated`/`JobTracked` are guarded by an explicit existence
    /// check since they're the one place an insert, not an assignment,
    /// happens.
    pub fn apply_event(&mut self, event: &StoreEvent) {
        match event {
            StoreEvent::SiteCreated { subdomain, created_at_ms } => {
                self.sites.entry(subdomain.clone()).or_insert_with(|| Site::new(subdomain.clone(), *created_at_ms));
            }
            StoreEvent::PipelineConfigUpdated { subdomain, config } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.pipeline_config = config.clone();
                }
            }
            StoreEvent::RunStarted { subdomain, run_id, at_ms } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.current_run_id = Some(run_id.clone());
                    site.last_updated_ms = Some(*at_ms);
                }
            }
            StoreEvent::RunCompleted { subdomain, run_id } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.current_run_id = None;
                    site.last_completed_run_id = Some(run_id.clone());
                }
            }
            StoreEvent::StageAdvanced { subdomain, stage } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.stage = *stage;
                }
            }
            StoreEvent::StatusChanged { subdomain, status } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.status = *status;
                }
            }
            StoreEvent::ExtractionStatusChanged { subdomain, status } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.extraction_status = *status;
                }
            }
            StoreEvent::CoordinatorEnqueuedChanged { subdomain, enqueued } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.coordinator_enqueued = *enqueued;
                }
            }
            StoreEvent::LastUpdatedTouched { subdomain, at_ms } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    site.last_updated_ms = Some(*at_ms);
                }
            }
            StoreEvent::CounterSet { subdomain, field, value } => {
                if let Some(site) = self.sites.get_mut(subdomain) {
                    let counters = &mut site.counters;
                    match field {
                        CounterField::Total => counters.documents_total = *value,
                        CounterField::Fetched => counters.documents_fetched = *value,
                        CounterField::Ocred => counters.documents_ocred = *value,
                        CounterField::OcrFailed => counters.documents_ocr_failed = *value,
                        CounterField::Compiled => counters.documents_compiled = *value,
                        CounterField::Extracted => counters.documents_extracted = *value,
                        CounterField::CompileTotal => counters.documents_compile_total = *value,
                        CounterField::CompileFailed => counters.documents_compile_failed = *value,
                        CounterField::ExtractTotal => counters.documents_extract_total = *value,
                        CounterField::ExtractFailed => counters.documents_extract_failed = *value,
                        CounterField::DeployTotal => counters.documents_deploy_total = *value,
                        CounterField::DeployCompleted => counters.documents_deploy_completed = *value,
                        CounterField::DeployFailed => counters.documents_deploy_failed = *value,
                    }
                }
            }
            StoreEvent::JobTracked { job } => {
                self.jobs.entry(job.id).or_insert_with(|| (**job).clone());
            }
            StoreEvent::JobStatusChanged { job_id, status, attempt, error } => {
                if let Some(job) = self.jobs.get_mut(job_id) {
                    job.status = *status;
                    job.attempt = *attempt;
                    job.error = error.clone();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
