// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk test-pipeline`: synchronous in-process execution with hook
//! verification (spec.md SS4.9, SS6).

use clap::Args;
use clerk_core::SystemClock;
use clerk_engine::{Context, TestModeOptions};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct TestPipelineArgs {
    pub subdomain: String,

    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub skip_fetch: bool,

    #[arg(long)]
    pub skip_ocr: bool,

    #[arg(long)]
    pub no_extract_entities: bool,
}

pub async fn run(ctx: &Context<SystemClock>, args: TestPipelineArgs) -> Result<(), ExitError> {
    let options = TestModeOptions {
        skip_fetch: args.skip_fetch,
        skip_ocr: args.skip_ocr,
        no_extract_entities: args.no_extract_entities,
        dry_run: args.dry_run,
    };

    let report = clerk_engine::test_mode::run_with_options(ctx, &args.subdomain, options).await?;

    println!("Called: {:?}", report.called);
    if report.passed() {
        println!("PASSED");
        Ok(())
    } else {
        println!("FAILED, missing: {:?}", report.missing);
        Err(ExitError::runtime(format!("test-pipeline for {} missing handlers {:?}", args.subdomain, report.missing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    #[tokio::test]
    async fn dry_run_reports_expected_handlers_without_touching_the_store() {
        let fx = fixture("oakdale.civic.band");
        let args = TestPipelineArgs {
            subdomain: "oakdale.civic.band".to_string(),
            dry_run: true,
            skip_fetch: false,
            skip_ocr: false,
            no_extract_entities: false,
        };
        run(&fx.ctx, args).await.unwrap();

        let site = fx.ctx.store.get_site("oakdale.civic.band").unwrap();
        assert_eq!(site.stage, clerk_core::Stage::None);
    }

    #[tokio::test]
    async fn unknown_subdomain_is_a_runtime_error() {
        let fx = fixture("oakdale.civic.band");
        let args = TestPipelineArgs {
            subdomain: "ghost.civic.band".to_string(),
            dry_run: true,
            skip_fetch: false,
            skip_ocr: false,
            no_extract_entities: false,
        };
        let err = run(&fx.ctx, args).await.unwrap_err();
        assert_eq!(err.code, 2);
    }
}
