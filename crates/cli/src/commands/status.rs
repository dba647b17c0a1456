// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk status`: per-queue counts, and per-site stage/counters
//! (spec.md SS6).

use clap::Args;
use clerk_core::SystemClock;
use clerk_engine::Context;

use crate::exit_error::ExitError;

const QUEUES: &[&str] = &["high", "fetch", "ocr", "compilation", "extraction", "deploy", "reconcile"];

#[derive(Args)]
pub struct StatusArgs {
    #[arg(short = 's', long = "subdomain")]
    pub subdomain: Option<String>,
}

pub async fn run(ctx: &Context<SystemClock>, args: StatusArgs) -> Result<(), ExitError> {
    println!("Queues:");
    for queue in QUEUES {
        let length = ctx.queue.length(queue).await?;
        println!("  {queue:<12} {length}");
    }
    println!("  {:<12} {}", "deferred", ctx.queue.deferred_registry().len());
    println!("  {:<12} {}", "failed", ctx.queue.failed_registry().len());

    let sites = match &args.subdomain {
        Some(subdomain) => {
            let site = ctx.store.get_site(subdomain).ok_or_else(|| ExitError::usage(format!("unknown site {subdomain}")))?;
            vec![site]
        }
        None => ctx.store.list_sites(),
    };

    println!("Sites:");
    for site in sites {
        println!(
            "  {:<24} status={:?} stage={:?} extraction={:?} run={}",
            site.subdomain,
            site.status,
            site.stage,
            site.extraction_status,
            site.current_run_id.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
        );
        let c = site.counters;
        println!(
            "      total={} fetched={} ocred={} ocr_failed={} compiled={} extracted={}",
            c.documents_total, c.documents_fetched, c.documents_ocred, c.documents_ocr_failed, c.documents_compiled, c.documents_extracted,
        );
        println!(
            "      compile_total={} compile_failed={} extract_total={} extract_failed={} deploy_total={} deploy_completed={} deploy_failed={}",
            c.documents_compile_total,
            c.documents_compile_failed,
            c.documents_extract_total,
            c.documents_extract_failed,
            c.documents_deploy_total,
            c.documents_deploy_completed,
            c.documents_deploy_failed,
        );
    }

    Ok(())
}
