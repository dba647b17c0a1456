// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Scheduler: a single-shot tick invoked by an external periodic trigger
//! (spec.md SS4.7). Picks the oldest eligible site and auto-enqueues a
//! `fetch` at normal priority; a site whose OCR coordinator is already
//! live sits out the tick rather than getting a second run piled on top.

use std::collections::HashSet;

use clerk_core::{Clock, JobPayload, Priority, RunId, Site};

use crate::context::Context;
use crate::error::Result;

/// One scheduler tick. Returns the enqueued `run_id`, or `None` when no
/// site was eligible.
pub async fn tick<C: Clock>(ctx: &Context<C>) -> Result<Option<RunId>> {
    let now_ms = ctx.clock.epoch_ms();
    let lookback_ms = ctx.config.scheduler_lookback_hours * 3600 * 1000;
    let cutoff = now_ms.saturating_sub(lookback_ms);

    let Some(subdomain) = oldest_eligible_subdomain(ctx, cutoff) else {
        tracing::info!("No sites eligible for auto-enqueue");
        return Ok(None);
    };

    let run_id = RunId::new(&subdomain, &ctx.clock);
    ctx.queue
        .enqueue(&subdomain, run_id.clone(), Priority::Normal, JobPayload::fetch(false, false), HashSet::new(), None)
        .await?;
    tracing::info!(subdomain = %subdomain, run_id = %run_id, "scheduler enqueued fetch");
    Ok(Some(run_id))
}

/// The least-recently-updated site that isn't mid-run, within the
/// lookback window. A site with `coordinator_enqueued=true` and
/// non-terminal OCR counters sits out this tick (spec.md SS4.7 step 1);
/// ties break `None`-first, then ascending timestamp, same as
/// [`clerk_store::CentralStore::get_oldest_site`].
fn oldest_eligible_subdomain<C: Clock>(ctx: &Context<C>, cutoff: u64) -> Option<String> {
    let mut candidates: Vec<Site> = ctx
        .store
        .list_sites()
        .into_iter()
        .filter(|site| !(site.coordinator_enqueued && !site.counters.ocr_complete()))
        .filter(|site| match site.last_updated_ms {
            None => true,
            Some(ts) => ts < cutoff,
        })
        .collect();
    candidates.sort_by_key(|site| (site.last_updated_ms.is_some(), site.last_updated_ms));
    candidates.into_iter().next().map(|site| site.subdomain)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
