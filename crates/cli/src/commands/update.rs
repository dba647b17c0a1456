// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk update`: re-enqueue `fetch` for one site (high priority) or for
//! the scheduler's next eligible site (normal priority, spec.md SS6/SS4.7).

use std::collections::HashSet;

use clap::Args;
use clerk_core::{Clock, JobPayload, OcrBackendKind, Priority, RunId, SystemClock};
use clerk_engine::Context;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct UpdateArgs {
    /// Update exactly this subdomain, at high priority.
    #[arg(short = 's', long = "subdomain", conflicts_with = "next_site")]
    pub subdomain: Option<String>,

    /// Let the scheduler pick the oldest eligible site, at normal priority.
    #[arg(long)]
    pub next_site: bool,

    #[arg(long)]
    pub all_years: bool,

    #[arg(long)]
    pub all_agendas: bool,

    /// Update the site's pipeline config without enqueueing a `fetch`.
    #[arg(long)]
    pub skip_fetch: bool,

    #[arg(long, value_name = "tesseract|vision")]
    pub ocr_backend: Option<OcrBackendKind>,
}

pub async fn run(ctx: &Context<SystemClock>, args: UpdateArgs) -> Result<(), ExitError> {
    if args.subdomain.is_none() && !args.next_site {
        return Err(ExitError::usage("update requires either -s SUBDOMAIN or --next-site"));
    }

    let subdomain = match &args.subdomain {
        Some(s) => s.clone(),
        None => {
            return run_next_site(ctx, &args).await;
        }
    };

    if ctx.store.get_site(&subdomain).is_none() {
        return Err(ExitError::usage(format!("unknown site {subdomain}")));
    }

    if let Some(backend) = args.ocr_backend {
        let site = ctx.store.get_site(&subdomain).ok_or_else(|| ExitError::usage(format!("unknown site {subdomain}")))?;
        let config = site.pipeline_config.with_ocr_backend(backend);
        ctx.store.update_pipeline_config(&subdomain, config)?;
    }

    if args.skip_fetch {
        println!("Updated {subdomain} (fetch skipped)");
        return Ok(());
    }

    let run_id = RunId::new(&subdomain, &ctx.clock);
    ctx.queue
        .enqueue(&subdomain, run_id.clone(), Priority::High, JobPayload::fetch(args.all_years, args.all_agendas), HashSet::new(), None)
        .await?;
    println!("Enqueued fetch for {subdomain} (run {run_id}, priority high)");
    Ok(())
}

async fn run_next_site(ctx: &Context<SystemClock>, args: &UpdateArgs) -> Result<(), ExitError> {
    match clerk_engine::scheduler::tick(ctx).await? {
        Some(run_id) => {
            println!("Enqueued fetch for {} (run {run_id}, priority normal)", run_id.subdomain());
            let _ = args;
            Ok(())
        }
        None => {
            println!("No sites eligible for auto-enqueue");
            Ok(())
        }
    }
}
