// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk enqueue`: enqueue `fetch` for one or more sites directly
//! (spec.md SS6).

use std::collections::HashSet;

use clap::Args;
use clerk_core::{Clock, JobPayload, Priority, RunId, SystemClock};
use clerk_engine::Context;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct EnqueueArgs {
    /// Subdomains to enqueue a `fetch` job for.
    #[arg(required = true)]
    pub subdomains: Vec<String>,

    #[arg(long, default_value = "normal", value_name = "high|normal|low")]
    pub priority: Priority,
}

pub async fn run(ctx: &Context<SystemClock>, args: EnqueueArgs) -> Result<(), ExitError> {
    for subdomain in &args.subdomains {
        if ctx.store.get_site(subdomain).is_none() {
            return Err(ExitError::usage(format!("unknown site {subdomain}")));
        }

        let run_id = RunId::new(subdomain, &ctx.clock);
        ctx.queue
            .enqueue(subdomain, run_id.clone(), args.priority, JobPayload::fetch(false, false), HashSet::new(), None)
            .await?;
        println!("Enqueued fetch for {subdomain} (run {run_id}, priority {})", args.priority);
    }
    Ok(())
}
