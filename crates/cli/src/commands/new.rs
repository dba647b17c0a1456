// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk new`: create a site, auto-enqueue at high priority (spec.md SS6).

use std::collections::HashSet;

use clap::Args;
use clerk_core::{Clock, JobPayload, Priority, RunId, SystemClock};
use clerk_engine::Context;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct NewArgs {
    /// The civic-band subdomain to create, e.g. `oakdale.civic.band`.
    pub subdomain: String,

    /// Display name, forwarded to plugin hooks as metadata only (the core
    /// `Site` aggregate carries no name field — spec.md SS1 "the specific
    /// scraping logic... is an opaque plugin implementation").
    #[arg(long)]
    pub name: Option<String>,

    /// State/province, metadata-only (see `--name`).
    #[arg(long)]
    pub state: Option<String>,

    /// Governing-body kind (city, county, school board...), metadata-only.
    #[arg(long)]
    pub kind: Option<String>,

    /// Legacy scraper label, stored on the site's `PipelineConfig`.
    #[arg(long)]
    pub scraper: Option<String>,

    /// Country, metadata-only (see `--name`).
    #[arg(long)]
    pub country: Option<String>,
}

/// The store write itself happens inside [`clerk_plugins::PluginRegistry::create_site`]
/// via `DefaultStoreWriter`, always the first registered plugin — a
/// failure there is the only `create_site` failure this command treats
/// as fatal; every other plugin's failure is log-and-continue (spec.md
/// SS7 "plugin hook exceptions are isolated per plugin").
pub async fn run(ctx: &Context<SystemClock>, args: NewArgs) -> Result<(), ExitError> {
    let now_ms = ctx.clock.epoch_ms();

    let (_, failures) = ctx.plugins.create_site(&args.subdomain, now_ms).await;
    if let Some((_, error)) = failures.iter().find(|(plugin, _)| plugin == "default_store_writer") {
        return Err(ExitError::runtime(error.to_string()));
    }
    for (plugin, error) in &failures {
        tracing::warn!(plugin = %plugin, error = %error, subdomain = %args.subdomain, "create_site hook failed");
    }

    if let Some(scraper) = &args.scraper {
        let site = ctx.store.get_site(&args.subdomain).ok_or_else(|| ExitError::runtime("site vanished after create_site"))?;
        let config = site.pipeline_config.with_scraper(scraper.clone());
        ctx.store.update_pipeline_config(&args.subdomain, config)?;
    }

    let (_, failures) = ctx.plugins.post_create(&args.subdomain).await;
    for (plugin, error) in &failures {
        tracing::warn!(plugin = %plugin, error = %error, subdomain = %args.subdomain, "post_create hook failed");
    }

    tracing::info!(
        subdomain = %args.subdomain,
        name = ?args.name,
        state = ?args.state,
        kind = ?args.kind,
        country = ?args.country,
        "site created"
    );

    let run_id = RunId::new(&args.subdomain, &ctx.clock);
    ctx.queue
        .enqueue(&args.subdomain, run_id.clone(), Priority::High, JobPayload::fetch(false, false), HashSet::new(), None)
        .await?;
    println!("Created {} and enqueued fetch (run {run_id}, priority high)", args.subdomain);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    fn args(subdomain: &str) -> NewArgs {
        NewArgs { subdomain: subdomain.to_string(), name: None, state: None, kind: None, scraper: None, country: None }
    }

    #[tokio::test]
    async fn creates_site_and_enqueues_high_priority_fetch() {
        let fx = fixture("placeholder.civic.band");
        run(&fx.ctx, args("oakdale.civic.band")).await.unwrap();

        let site = fx.ctx.store.get_site("oakdale.civic.band").unwrap();
        assert_eq!(site.stage, clerk_core::Stage::None);

        let job = fx.ctx.queue.claim(&["high"], "w").await.unwrap().unwrap();
        assert_eq!(job.subdomain, "oakdale.civic.band");
        assert_eq!(job.priority, Priority::High);
    }

    #[tokio::test]
    async fn scraper_flag_sets_pipeline_config() {
        let fx = fixture("placeholder.civic.band");
        let mut a = args("riverside.civic.band");
        a.scraper = Some("legacy-selenium".to_string());
        run(&fx.ctx, a).await.unwrap();

        let site = fx.ctx.store.get_site("riverside.civic.band").unwrap();
        assert_eq!(site.pipeline_config.scraper.as_deref(), Some("legacy-selenium"));
    }

    #[tokio::test]
    async fn duplicate_site_is_rejected_by_the_default_store_writer() {
        let fx = fixture("oakdale.civic.band");
        let err = run(&fx.ctx, args("oakdale.civic.band")).await.unwrap_err();
        assert_eq!(err.code, 2);
    }
}
