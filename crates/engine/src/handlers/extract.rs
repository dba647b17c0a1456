// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `extract`: entity/vote extraction over the txt tree, cached by
//! fingerprint (spec.md SS4.6.5). Runs in parallel with `compile`; both
//! write `meetings.db` additively, so writes here never touch the
//! `minutes`/`agendas` tables `compile` owns.

use clerk_core::{fingerprint, Clock, DocumentKind, RunId};
use rusqlite::{params, Connection};
use serde_json::json;

use crate::context::Context;
use crate::error::Result;
use crate::extraction::ExtractedPage;
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct ExtractInput {
    pub subdomain: String,
    pub run_id: RunId,
    pub enable_entities: bool,
}

pub async fn extract<C: Clock>(ctx: &Context<C>, input: ExtractInput) -> Result<()> {
    let start = ctx.clock.now();
    emit_started("extract");

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok((processed, cache_hits)) => {
            emit_completed(
                "extract",
                json!({ "pages_processed": processed, "cache_hits": cache_hits, "duration_seconds": duration_seconds }),
            );
            if let Err(e) = ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::ExtractFailed, 0) {
                tracing::error!(error = %e, "failed to clear extract_failed counter");
            }
        }
        Err(err) => {
            emit_failed("extract", err, json!({ "duration_seconds": duration_seconds }));
            let total = ctx.store.read_counters(&input.subdomain).map(|c| c.documents_extract_total).unwrap_or(0);
            if let Err(e) = ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::ExtractFailed, total) {
                tracing::error!(error = %e, "failed to set extract_failed counter");
            }
        }
    }
    result.map(|_| ())
}

async fn run<C: Clock>(ctx: &Context<C>, input: &ExtractInput) -> Result<(u32, u32)> {
    if !input.enable_entities {
        return Ok((0, 0));
    }

    let layout = ctx.layout(&input.subdomain);
    let minutes = clerk_store::list_txt_pages(&layout, DocumentKind::Minutes)?;
    let agendas = clerk_store::list_txt_pages(&layout, DocumentKind::Agenda)?;
    let total = (minutes.len() + agendas.len()) as u32;
    ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::ExtractTotal, total)?;

    let mut processed = 0u32;
    let mut cache_hits = 0u32;
    for (kind, pages) in [(DocumentKind::Minutes, &minutes), (DocumentKind::Agenda, &agendas)] {
        for page in pages {
            let text = tokio::fs::read_to_string(&page.path).await?;
            let key = fingerprint(&json!({
                "kind": kind.to_string(),
                "meeting": page.meeting,
                "date": page.date,
                "page": page.page,
                "text": text,
                "subdomain": input.subdomain,
            }))?;
            let cache_path = layout.extracted_cache_path(&page.path);

            let extracted = if let Some(cached) = read_cache(&cache_path, &key).await {
                cache_hits += 1;
                cached
            } else {
                let extracted = ctx.entity_extractor.extract_page(&text).await?;
                write_cache(&cache_path, &key, &extracted).await?;
                extracted
            };

            let db_path = layout.meetings_db_path();
            let key = key.clone();
            let page = page.clone();
            tokio::task::spawn_blocking(move || -> Result<()> {
                let conn = Connection::open(&db_path)?;
                init_schema(&conn)?;
                upsert_extraction(&conn, &key, &page, &extracted)?;
                Ok(())
            })
            .await
            .map_err(|e| crate::error::EngineError::consistency(e.to_string()))??;

            processed += 1;
        }
    }

    ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::Extracted, processed)?;
    Ok((processed, cache_hits))
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    fingerprint: String,
    extracted: ExtractedPage,
}

async fn read_cache(cache_path: &std::path::Path, key: &str) -> Option<ExtractedPage> {
    let bytes = tokio::fs::read(cache_path).await.ok()?;
    let entry: CacheEntry = serde_json::from_slice(&bytes).ok()?;
    (entry.fingerprint == key).then_some(entry.extracted)
}

async fn write_cache(cache_path: &std::path::Path, key: &str, extracted: &ExtractedPage) -> Result<()> {
    let entry = CacheEntry { fingerprint: key.to_string(), extracted: extracted.clone() };
    let bytes = serde_json::to_vec(&entry)?;
    tokio::fs::write(cache_path, bytes).await?;
    Ok(())
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entities (
            fingerprint TEXT PRIMARY KEY,
            meeting TEXT NOT NULL,
            date TEXT NOT NULL,
            page INTEGER NOT NULL,
            entity_count INTEGER NOT NULL,
            vote_count INTEGER NOT NULL
        );",
    )
}

fn upsert_extraction(conn: &Connection, key: &str, page: &clerk_store::PageFile, extracted: &ExtractedPage) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO entities (fingerprint, meeting, date, page, entity_count, vote_count) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(fingerprint) DO UPDATE SET entity_count = excluded.entity_count, vote_count = excluded.vote_count",
        params![key, page.meeting, page.date, page.page, extracted.entity_count, extracted.vote_count],
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
