// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `ocr-coordinator`: fan-in once every `ocr-page` dependency is terminal
//! (spec.md SS4.6.3). Idempotent under reconciler retries: re-running
//! after the site has already moved past `Stage::Ocr` re-derives counters
//! but enqueues nothing further.

use std::collections::HashSet;

use clerk_core::{Clock, DocumentKind, JobPayload, Priority, RunId, Stage};
use clerk_store::CounterField;
use serde_json::json;

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct OcrCoordinatorInput {
    pub subdomain: String,
    pub run_id: RunId,
}

pub async fn ocr_coordinator<C: Clock>(ctx: &Context<C>, input: OcrCoordinatorInput) -> Result<()> {
    let start = ctx.clock.now();
    emit_started("ocr_coordinator");

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok((completed, failed, total)) => emit_completed(
            "ocr_coordinator",
            json!({ "completed": completed, "failed": failed, "total": total, "duration_seconds": duration_seconds }),
        ),
        Err(err) => emit_failed("ocr_coordinator", err, json!({ "duration_seconds": duration_seconds })),
    }
    result.map(|_| ())
}

async fn run<C: Clock>(ctx: &Context<C>, input: &OcrCoordinatorInput) -> Result<(u32, u32, u32)> {
    let site = ctx
        .store
        .get_site(&input.subdomain)
        .ok_or_else(|| EngineError::consistency(format!("site {} not found", input.subdomain)))?;

    let layout = ctx.layout(&input.subdomain);
    let minutes = clerk_store::count_documents_on_disk(&layout, DocumentKind::Minutes)?;
    let agendas = clerk_store::count_documents_on_disk(&layout, DocumentKind::Agenda)?;
    let completed = minutes.ocr_completed + agendas.ocr_completed;
    let total = site.counters.documents_total;
    let failed = total.saturating_sub(completed);

    ctx.store.set_counter(&input.subdomain, CounterField::Ocred, completed)?;
    ctx.store.set_counter(&input.subdomain, CounterField::OcrFailed, failed)?;

    if site.stage != Stage::Ocr {
        // Already handled by a prior run of this coordinator; re-derive
        // counters (useful after a reconciler-triggered rescan) but don't
        // enqueue `compile`/`extract` a second time.
        return Ok((completed, failed, total));
    }

    ctx.store.set_stage(&input.subdomain, Stage::Compilation)?;
    ctx.queue.enqueue(&input.subdomain, input.run_id.clone(), Priority::Normal, JobPayload::Compile, HashSet::new(), None).await?;
    ctx.queue
        .enqueue(
            &input.subdomain,
            input.run_id.clone(),
            Priority::Normal,
            JobPayload::Extract { enable_entities: site.pipeline_config.enable_entities },
            HashSet::new(),
            None,
        )
        .await?;
    ctx.store.set_coordinator_enqueued(&input.subdomain, false)?;

    Ok((completed, failed, total))
}

#[cfg(test)]
#[path = "ocr_coordinator_tests.rs"]
mod tests;
