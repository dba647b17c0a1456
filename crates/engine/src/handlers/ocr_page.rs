// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `ocr-page`: renders one PDF to text (spec.md SS4.6.2).

use std::path::PathBuf;

use clerk_core::{txt_dir_for_pdf, Clock, OcrBackendKind, RunId};
use clerk_store::CounterField;
use serde_json::json;

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct OcrPageInput {
    pub subdomain: String,
    pub run_id: RunId,
    pub pdf_path: PathBuf,
    pub backend: OcrBackendKind,
}

pub async fn ocr_page<C: Clock>(ctx: &Context<C>, input: OcrPageInput) -> Result<()> {
    let start = ctx.clock.now();
    let pdf_name = input.pdf_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    emit_started("ocr_page");
    tracing::info!(pdf_name = %pdf_name, backend = %input.backend, "ocr_started");

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok(pages) => emit_completed(
            "ocr_page",
            json!({ "pdf_name": pdf_name, "pages": pages, "duration_seconds": duration_seconds }),
        ),
        Err(err) => {
            // No `page_number` here: this job renders every page of one PDF,
            // not a single page, despite the job's name.
            emit_failed(
                "ocr_page",
                err,
                json!({
                    "pdf_name": pdf_name,
                    "pdf_path": input.pdf_path.display().to_string(),
                    "backend": input.backend.to_string(),
                    "duration_seconds": duration_seconds,
                }),
            );
            record_failure(ctx, &input, err);
        }
    }
    result.map(|_| ())
}

async fn run<C: Clock>(ctx: &Context<C>, input: &OcrPageInput) -> Result<u32> {
    let txt_dir = txt_dir_for_pdf(&input.pdf_path)
        .ok_or_else(|| EngineError::consistency(format!("{} is not inside a pdfs/ tree", input.pdf_path.display())))?;

    match ctx.ocr_backend(input.backend).ocr_pdf(&input.pdf_path, &txt_dir).await {
        Ok(pages) => {
            ctx.store.increment_counter(&input.subdomain, CounterField::Ocred, 1)?;
            Ok(pages)
        }
        Err(primary_err) => {
            let Some(fallback) = input.backend.fallback() else {
                return Err(primary_err);
            };
            tracing::warn!(
                pdf_name = %input.pdf_path.display(),
                primary_backend = %input.backend,
                primary_error = %primary_err,
                "ocr_page falling back to {fallback}"
            );
            match ctx.ocr_backend(fallback).ocr_pdf(&input.pdf_path, &txt_dir).await {
                Ok(pages) => {
                    ctx.store.increment_counter(&input.subdomain, CounterField::Ocred, 1)?;
                    Ok(pages)
                }
                Err(fallback_err) => Err(EngineError::new(
                    "ocr_permanent_failure",
                    format!(
                        "both backends failed for {}: {} ({}) then {} ({})",
                        input.pdf_path.display(),
                        input.backend,
                        primary_err,
                        fallback,
                        fallback_err
                    ),
                )),
            }
        }
    }
}

/// Per-document permanent failures are recorded on disk (spec.md SS7
/// "Permanent per-document"), not in the `ocr_failed` counter — the
/// coordinator re-derives that from `ocr_total - ocr_completed`.
fn record_failure<C: Clock>(ctx: &Context<C>, input: &OcrPageInput, err: &EngineError) {
    let layout = ctx.layout(&input.subdomain);
    let manifest_path = layout.failure_manifest_path(input.run_id.as_str());
    let entry = json!({
        "pdf_path": input.pdf_path.display().to_string(),
        "backend": input.backend.to_string(),
        "error_type": err.error_type,
        "error_message": err.error_message,
    });
    if let Some(parent) = manifest_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!(error = %e, "failed to create failure manifest directory");
            return;
        }
    }
    let line = match serde_json::to_string(&entry) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize failure manifest entry");
            return;
        }
    };
    use std::io::Write;
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&manifest_path);
    match file {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{line}") {
                tracing::error!(error = %e, "failed to append to failure manifest");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to open failure manifest"),
    }
}

#[cfg(test)]
#[path = "ocr_page_tests.rs"]
mod tests;
