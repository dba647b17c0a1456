// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Test-mode runner: invokes every stage handler in-process, sequentially,
//! for one subdomain, without Redis (spec.md SS4.9). Reuses the exact same
//! handler functions the distributed worker path dispatches to, so a green
//! test-mode run is evidence the real pipeline would behave the same way.

use std::collections::HashSet;

use clerk_core::{Clock, RunId};

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::handlers;

/// One run's record of which handlers actually fired.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub called: HashSet<&'static str>,
    pub missing: HashSet<&'static str>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// `clerk test-pipeline`'s stage toggles (spec.md SS6). All default to a
/// full, real run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Assume documents are already on disk from a prior run; don't call
    /// `fetch`.
    pub skip_fetch: bool,
    /// Don't call `ocr_page`; the coordinator still runs against whatever
    /// counters are already on record.
    pub skip_ocr: bool,
    /// Force the entity-extraction branch off regardless of the site's
    /// `PipelineConfig`.
    pub no_extract_entities: bool,
    /// Report the handlers a full run would invoke without invoking any of
    /// them or touching the store.
    pub dry_run: bool,
}

/// Run `fetch -> ocr_page* -> ocr_coordinator -> compile + extract -> deploy`
/// for `subdomain`, in this process, then diff the handlers actually
/// called against the set the site's [`clerk_core::PipelineConfig`]
/// expects.
pub async fn run<C: Clock>(ctx: &Context<C>, subdomain: &str) -> Result<Report> {
    run_with_options(ctx, subdomain, Options::default()).await
}

pub async fn run_with_options<C: Clock>(ctx: &Context<C>, subdomain: &str, options: Options) -> Result<Report> {
    let site = ctx.store.get_site(subdomain).ok_or_else(|| EngineError::consistency(format!("site {subdomain} not found")))?;
    let expected = expected_handlers_for(&site.pipeline_config, options);

    if options.dry_run {
        return Ok(Report { called: expected.clone(), missing: HashSet::new() });
    }

    let mut called = HashSet::new();
    let run_id = RunId::new(subdomain, &ctx.clock);

    if !options.skip_fetch {
        handlers::fetch(
            ctx,
            handlers::FetchInput { subdomain: subdomain.into(), run_id: run_id.clone(), all_years: false, all_agendas: false },
        )
        .await?;
        called.insert("fetch");
    }

    if !options.skip_ocr {
        let layout = ctx.layout(subdomain);
        let backend = site.pipeline_config.ocr_backend;
        for kind in [clerk_core::DocumentKind::Minutes, clerk_core::DocumentKind::Agenda] {
            for pdf_path in clerk_store::list_pdfs(&layout, kind)? {
                handlers::ocr_page(ctx, handlers::OcrPageInput { subdomain: subdomain.into(), run_id: run_id.clone(), pdf_path, backend })
                    .await?;
                called.insert("ocr_page");
            }
        }
    }

    handlers::ocr_coordinator(ctx, handlers::OcrCoordinatorInput { subdomain: subdomain.into(), run_id: run_id.clone() }).await?;
    called.insert("ocr_coordinator");

    handlers::compile(ctx, handlers::CompileInput { subdomain: subdomain.into(), run_id: run_id.clone() }).await?;
    called.insert("compile");

    let enable_entities = site.pipeline_config.enable_entities && !options.no_extract_entities;
    handlers::extract(ctx, handlers::ExtractInput { subdomain: subdomain.into(), run_id: run_id.clone(), enable_entities }).await?;
    if enable_entities {
        called.insert("extract");
    }

    handlers::deploy(ctx, handlers::DeployInput { subdomain: subdomain.into() }).await?;
    called.insert("deploy");

    let missing: HashSet<&'static str> = expected.difference(&called).copied().collect();
    Ok(Report { called, missing })
}

/// The handler set a complete pipeline run for `config` must invoke.
fn expected_handlers(config: &clerk_core::PipelineConfig) -> HashSet<&'static str> {
    expected_handlers_for(config, Options::default())
}

fn expected_handlers_for(config: &clerk_core::PipelineConfig, options: Options) -> HashSet<&'static str> {
    let mut expected: HashSet<&'static str> = HashSet::new();
    if !options.skip_fetch {
        expected.insert("fetch");
    }
    expected.insert("ocr_coordinator");
    expected.insert("compile");
    expected.insert("deploy");
    if config.enable_entities && !options.no_extract_entities {
        expected.insert("extract");
    }
    expected
}

#[cfg(test)]
#[path = "test_mode_tests.rs"]
mod tests;
