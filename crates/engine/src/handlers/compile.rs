// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `compile`: builds `meetings.db` from the txt tree (spec.md SS4.6.4).

use clerk_core::{fingerprint, Clock, DocumentKind, JobPayload, Priority, RunId};
use rusqlite::{params, Connection};
use serde_json::json;

use crate::context::Context;
use crate::error::Result;
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct CompileInput {
    pub subdomain: String,
    pub run_id: RunId,
}

pub async fn compile<C: Clock>(ctx: &Context<C>, input: CompileInput) -> Result<()> {
    let start = ctx.clock.now();
    emit_started("compile");

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok(rows) => {
            emit_completed("compile", json!({ "rows": rows, "duration_seconds": duration_seconds }));
            if let Err(e) = ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::CompileFailed, 0) {
                tracing::error!(error = %e, "failed to clear compile_failed counter");
            }
        }
        Err(err) => {
            emit_failed("compile", err, json!({ "duration_seconds": duration_seconds }));
            let total = ctx.store.read_counters(&input.subdomain).map(|c| c.documents_compile_total).unwrap_or(0);
            if let Err(e) = ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::CompileFailed, total) {
                tracing::error!(error = %e, "failed to set compile_failed counter");
            }
        }
    }
    result.map(|_| ())
}

async fn run<C: Clock>(ctx: &Context<C>, input: &CompileInput) -> Result<u32> {
    let layout = ctx.layout(&input.subdomain);
    let db_path = layout.meetings_db_path();
    let subdomain = input.subdomain.clone();

    let minutes = clerk_store::list_txt_pages(&layout, DocumentKind::Minutes)?;
    let agendas = clerk_store::list_txt_pages(&layout, DocumentKind::Agenda)?;
    let total = (minutes.len() + agendas.len()) as u32;
    ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::CompileTotal, total)?;

    let rows = tokio::task::spawn_blocking(move || -> Result<u32> {
        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;
        let mut written = 0u32;
        for (kind, table, fts_table) in [
            (DocumentKind::Minutes, "minutes", "minutes_fts"),
            (DocumentKind::Agenda, "agendas", "agendas_fts"),
        ] {
            let pages = if kind == DocumentKind::Minutes { &minutes } else { &agendas };
            for page in pages {
                let text = std::fs::read_to_string(&page.path)?;
                let key = fingerprint(&json!({
                    "kind": kind.to_string(),
                    "meeting": page.meeting,
                    "date": page.date,
                    "page": page.page,
                    "text": text,
                    "subdomain": subdomain,
                }))?;
                upsert_page(&conn, table, fts_table, &key, page, &text)?;
                written += 1;
            }
        }
        Ok(written)
    })
    .await
    .map_err(|e| crate::error::EngineError::consistency(e.to_string()))??;

    ctx.store.set_counter(&input.subdomain, clerk_store::CounterField::Compiled, rows)?;
    ctx.queue.enqueue(&input.subdomain, input.run_id.clone(), Priority::Normal, JobPayload::Deploy, Default::default(), None).await?;
    Ok(rows)
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS minutes (
            fingerprint TEXT PRIMARY KEY,
            meeting TEXT NOT NULL,
            date TEXT NOT NULL,
            page INTEGER NOT NULL,
            text TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS agendas (
            fingerprint TEXT PRIMARY KEY,
            meeting TEXT NOT NULL,
            date TEXT NOT NULL,
            page INTEGER NOT NULL,
            text TEXT NOT NULL
        );
        CREATE VIRTUAL TABLE IF NOT EXISTS minutes_fts USING fts5(fingerprint UNINDEXED, text);
        CREATE VIRTUAL TABLE IF NOT EXISTS agendas_fts USING fts5(fingerprint UNINDEXED, text);
        ",
    )
}

/// Upsert by fingerprint (spec.md SS4.6.4): recompiling the same txt tree
/// must be idempotent, and the fingerprint is the stable identity across
/// runs.
fn upsert_page(
    conn: &Connection,
    table: &str,
    fts_table: &str,
    key: &str,
    page: &clerk_store::PageFile,
    text: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {table} (fingerprint, meeting, date, page, text) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(fingerprint) DO UPDATE SET text = excluded.text"
        ),
        params![key, page.meeting, page.date, page.page, text],
    )?;
    conn.execute(
        &format!("DELETE FROM {fts_table} WHERE fingerprint = ?1"),
        params![key],
    )?;
    conn.execute(
        &format!("INSERT INTO {fts_table} (fingerprint, text) VALUES (?1, ?2)"),
        params![key, text],
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
