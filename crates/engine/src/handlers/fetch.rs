// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `fetch`: populates a site's PDF tree and fans out OCR work (spec.md
//! SS4.6.1).

use std::collections::HashSet;
use std::sync::Arc;

use clerk_core::{Clock, DocumentKind, JobPayload, PipelineConfig, Priority, RunId, Stage};
use clerk_plugins::{Extractor, FetcherAdapter};
use clerk_store::CounterField;
use serde_json::json;

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct FetchInput {
    pub subdomain: String,
    pub run_id: RunId,
    pub all_years: bool,
    pub all_agendas: bool,
}

pub async fn fetch<C: Clock>(ctx: &Context<C>, input: FetchInput) -> Result<()> {
    let start = ctx.clock.now();
    emit_started("fetch");

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok(total) => emit_completed("fetch", json!({ "total_pdfs": total, "duration_seconds": duration_seconds })),
        Err(err) => emit_failed("fetch", err, json!({ "duration_seconds": duration_seconds })),
    }
    result.map(|_| ())
}

async fn run<C: Clock>(ctx: &Context<C>, input: &FetchInput) -> Result<u32> {
    let site = ctx
        .store
        .get_site(&input.subdomain)
        .ok_or_else(|| EngineError::consistency(format!("site {} not found", input.subdomain)))?;
    let extractor = resolve_extractor(ctx, &site.pipeline_config)?;

    ctx.store.start_run(&input.subdomain, input.run_id.clone(), ctx.clock.epoch_ms())?;
    ctx.store.set_stage(&input.subdomain, Stage::Fetch)?;

    let layout = ctx.layout(&input.subdomain);
    extractor.extract(&input.subdomain, &layout, input.all_years, input.all_agendas).await?;

    let mut pdfs = clerk_store::list_pdfs(&layout, DocumentKind::Minutes)?;
    pdfs.extend(clerk_store::list_pdfs(&layout, DocumentKind::Agenda)?);
    let total = pdfs.len() as u32;

    ctx.store.set_counter(&input.subdomain, CounterField::Total, total)?;
    ctx.store.set_counter(&input.subdomain, CounterField::Fetched, total)?;
    ctx.store.set_counter(&input.subdomain, CounterField::Ocred, 0)?;
    ctx.store.set_counter(&input.subdomain, CounterField::OcrFailed, 0)?;
    ctx.store.set_coordinator_enqueued(&input.subdomain, false)?;

    if total == 0 {
        ctx.store.set_stage(&input.subdomain, Stage::Completed)?;
        ctx.store.complete_run(&input.subdomain, input.run_id.clone())?;
        return Ok(0);
    }

    let backend = site.pipeline_config.ocr_backend;
    let mut ocr_job_ids = HashSet::with_capacity(pdfs.len());
    for pdf_path in pdfs {
        let payload = JobPayload::ocr_page(pdf_path, backend);
        let job_id = ctx.queue.enqueue(&input.subdomain, input.run_id.clone(), Priority::Normal, payload, HashSet::new(), None).await?;
        ocr_job_ids.insert(job_id);
    }

    ctx.queue
        .enqueue(&input.subdomain, input.run_id.clone(), Priority::Normal, JobPayload::OcrCoordinator, ocr_job_ids, None)
        .await?;
    ctx.store.set_coordinator_enqueued(&input.subdomain, true)?;
    ctx.store.set_stage(&input.subdomain, Stage::Ocr)?;

    Ok(total)
}

/// `pipeline.extractor` wins over `scraper` when both are set (spec.md
/// SS3.1). A site configured with neither is a configuration error, not a
/// silent no-op.
fn resolve_extractor<C: Clock>(ctx: &Context<C>, config: &PipelineConfig) -> Result<Arc<dyn Extractor>> {
    if let Some(label) = &config.extractor {
        return ctx
            .plugins
            .extractor_class(label)
            .ok_or_else(|| EngineError::config(format!("no extractor registered for label {label:?}")));
    }
    if let Some(label) = &config.scraper {
        let fetcher = ctx
            .plugins
            .fetcher_class(label)
            .ok_or_else(|| EngineError::config(format!("no legacy fetcher registered for label {label:?}")))?;
        return Ok(Arc::new(FetcherAdapter::new(fetcher)));
    }
    Err(EngineError::config("site has neither pipeline.extractor nor scraper configured"))
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
