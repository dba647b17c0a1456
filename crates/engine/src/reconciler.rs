// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Reconciler: a single-shot command invoked periodically (spec.md SS4.8)
//! that re-derives state from disk for sites a worker crash left stuck.

use std::collections::HashSet;

use clerk_core::{Clock, DocumentKind, JobPayload, JobType, Priority, Site, Stage};

use crate::context::Context;
use crate::error::Result;

/// One site's reconciliation outcome, returned for tests and for the CLI
/// to summarize a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A fresh `ocr-coordinator` was enqueued.
    CoordinatorReenqueued,
    /// A coordinator is already live; nothing to do.
    CoordinatorAlreadyLive,
    /// Zero documents OCRed after the stuck window; needs an operator.
    AllOcrFailed,
}

/// Scans every non-terminal, non-`none` site whose `last_updated_ms` is
/// older than [`crate::context::EngineConfig::reconcile_stuck_after_ms`]
/// and re-derives its OCR progress from the storage tree.
pub async fn run<C: Clock>(ctx: &Context<C>) -> Result<Vec<(String, Outcome)>> {
    let now_ms = ctx.clock.epoch_ms();
    let mut outcomes = Vec::new();

    for site in stuck_sites(ctx, now_ms) {
        if let Some(outcome) = reconcile_site(ctx, &site).await? {
            outcomes.push((site.subdomain.clone(), outcome));
        }
    }
    Ok(outcomes)
}

fn stuck_sites<C: Clock>(ctx: &Context<C>, now_ms: u64) -> Vec<Site> {
    let cutoff = now_ms.saturating_sub(ctx.config.reconcile_stuck_after_ms);
    ctx.store
        .list_sites()
        .into_iter()
        .filter(|site| site.stage != Stage::Completed && site.stage != Stage::None)
        .filter(|site| matches!(site.last_updated_ms, Some(ts) if ts < cutoff))
        .collect()
}

async fn reconcile_site<C: Clock>(ctx: &Context<C>, site: &Site) -> Result<Option<Outcome>> {
    let Some(run_id) = site.current_run_id.clone() else { return Ok(None) };

    let minutes = ctx.store.count_documents_on_disk(&site.subdomain, DocumentKind::Minutes)?;
    let agendas = ctx.store.count_documents_on_disk(&site.subdomain, DocumentKind::Agenda)?;
    let ocr_completed = minutes.ocr_completed + agendas.ocr_completed;

    if ocr_completed == 0 {
        tracing::warn!(subdomain = %site.subdomain, run_id = %run_id, "all OCR failed");
        return Ok(Some(Outcome::AllOcrFailed));
    }

    let live = ctx.store.live_jobs_of_type(&site.subdomain, &run_id, JobType::OcrCoordinator);
    if !live.is_empty() {
        return Ok(Some(Outcome::CoordinatorAlreadyLive));
    }

    ctx.queue
        .enqueue(&site.subdomain, run_id.clone(), Priority::Normal, JobPayload::OcrCoordinator, HashSet::new(), None)
        .await?;
    ctx.store.set_coordinator_enqueued(&site.subdomain, true)?;
    tracing::info!(subdomain = %site.subdomain, run_id = %run_id, "reconciler re-enqueued ocr-coordinator");
    Ok(Some(Outcome::CoordinatorReenqueued))
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
