// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! One-shot operational commands: `migrate-extraction-schema`,
//! `migrate-stuck-sites`, `db upgrade` (spec.md SS6).

use clerk_core::{DocumentKind, JobType, SystemClock};
use clerk_engine::Context;
use clerk_store::list_txt_pages;

use crate::exit_error::ExitError;

/// Deletes every `.extracted.json` cache file across every site, forcing
/// `extract` to regenerate them against the current extractor version.
/// There is no schema-version counter to bump; clearing the
/// fingerprint-keyed cache is the only operation a future extractor
/// change would actually need.
pub async fn migrate_extraction_schema(ctx: &Context<SystemClock>) -> Result<(), ExitError> {
    let mut removed = 0usize;
    for site in ctx.store.list_sites() {
        let layout = ctx.layout(&site.subdomain);
        for kind in [DocumentKind::Minutes, DocumentKind::Agenda] {
            for page in list_txt_pages(&layout, kind)? {
                let cache_path = layout.extracted_cache_path(&page.path);
                if cache_path.exists() {
                    std::fs::remove_file(&cache_path)?;
                    removed += 1;
                }
            }
        }
    }
    println!("Removed {removed} stale extraction cache files");
    Ok(())
}

/// Clears `coordinator_enqueued` on any site where it's stuck `true`
/// with no live `ocr-coordinator` job, then runs the reconciler once
/// to re-derive progress for those sites (a historical bug left some
/// sites in exactly this state after a worker crash).
pub async fn migrate_stuck_sites(ctx: &Context<SystemClock>) -> Result<(), ExitError> {
    let mut cleared = 0usize;
    for site in ctx.store.list_sites() {
        if !site.coordinator_enqueued {
            continue;
        }
        let Some(run_id) = site.current_run_id.as_ref() else { continue };
        let live = ctx.store.live_jobs_of_type(&site.subdomain, run_id, JobType::OcrCoordinator);
        if live.is_empty() {
            ctx.store.set_coordinator_enqueued(&site.subdomain, false)?;
            cleared += 1;
        }
    }
    println!("Cleared {cleared} orphaned coordinator-enqueued flags");

    let outcomes = clerk_engine::reconciler::run(ctx).await?;
    println!("Reconciler ran, {} site(s) touched", outcomes.len());
    Ok(())
}

/// `db upgrade`: there is no separate migrations system — `CentralStore::open`
/// already validates and replays the WAL on every open. This command exists
/// for CLI-contract parity and is otherwise a smoke check.
pub async fn db_upgrade(ctx: &Context<SystemClock>) -> Result<(), ExitError> {
    let sites = ctx.store.list_sites().len();
    println!("Store opened cleanly, {sites} site(s) on record. No migrations to apply.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    #[tokio::test]
    async fn extraction_schema_migration_removes_every_cache_file() {
        let fx = fixture("oakdale.civic.band");
        let layout = fx.ctx.layout("oakdale.civic.band");
        let page = layout.page_txt_path(DocumentKind::Minutes, "council", "2024-01-01", 1);
        std::fs::create_dir_all(page.parent().unwrap()).unwrap();
        std::fs::write(&page, b"ocr text").unwrap();
        let cache_path = layout.extracted_cache_path(&page);
        std::fs::write(&cache_path, b"{}").unwrap();

        migrate_extraction_schema(&fx.ctx).await.unwrap();
        assert!(!cache_path.exists());
    }

    #[tokio::test]
    async fn stuck_sites_migration_clears_orphaned_flag_and_reconciles() {
        let fx = fixture("oakdale.civic.band");
        let run_id = clerk_core::RunId::new("oakdale.civic.band", &fx.ctx.clock);
        fx.ctx.store.start_run("oakdale.civic.band", run_id, 0).unwrap();
        fx.ctx.store.set_coordinator_enqueued("oakdale.civic.band", true).unwrap();

        migrate_stuck_sites(&fx.ctx).await.unwrap();

        let site = fx.ctx.store.get_site("oakdale.civic.band").unwrap();
        assert!(!site.coordinator_enqueued);
    }

    #[tokio::test]
    async fn db_upgrade_is_a_clean_smoke_check() {
        let fx = fixture("oakdale.civic.band");
        db_upgrade(&fx.ctx).await.unwrap();
    }
}
