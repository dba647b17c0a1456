// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `deploy`: the pipeline's final stage (spec.md SS4.6.6).

use clerk_core::{Clock, SiteStatus, Stage};
use clerk_store::CounterField;
use serde_json::json;

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::logging::{emit_completed, emit_failed, emit_started};

pub struct DeployInput {
    pub subdomain: String,
}

pub async fn deploy<C: Clock>(ctx: &Context<C>, input: DeployInput) -> Result<()> {
    let start = ctx.clock.now();
    emit_started("deploy");
    if let Err(e) = ctx.store.set_counter(&input.subdomain, CounterField::DeployTotal, 1) {
        tracing::error!(error = %e, "failed to set deploy_total counter");
    }

    let result = run(ctx, &input).await;

    let duration_seconds = start.elapsed().as_secs_f64();
    match &result {
        Ok(()) => {
            emit_completed("deploy", json!({ "duration_seconds": duration_seconds }));
            if let Err(e) = ctx.store.set_counter(&input.subdomain, CounterField::DeployCompleted, 1) {
                tracing::error!(error = %e, "failed to set deploy_completed counter");
            }
        }
        Err(err) => {
            emit_failed("deploy", err, json!({ "duration_seconds": duration_seconds }));
            if let Err(e) = ctx.store.set_counter(&input.subdomain, CounterField::DeployFailed, 1) {
                tracing::error!(error = %e, "failed to set deploy_failed counter");
            }
        }
    }
    result
}

async fn run<C: Clock>(ctx: &Context<C>, input: &DeployInput) -> Result<()> {
    let site = ctx
        .store
        .get_site(&input.subdomain)
        .ok_or_else(|| EngineError::consistency(format!("site {} not found", input.subdomain)))?;

    let (_, deploy_failures) = ctx.plugins.deploy_municipality(&input.subdomain).await;
    if !deploy_failures.is_empty() {
        return Err(EngineError::new(
            "plugin_error",
            format!("deploy_municipality failed for {} plugin(s): {:?}", deploy_failures.len(), deploy_failures),
        ));
    }

    let (_, post_deploy_failures) = ctx.plugins.post_deploy(&site).await;
    if !post_deploy_failures.is_empty() {
        return Err(EngineError::new(
            "plugin_error",
            format!("post_deploy failed for {} plugin(s): {:?}", post_deploy_failures.len(), post_deploy_failures),
        ));
    }

    ctx.store.set_status(&input.subdomain, SiteStatus::Deployed)?;
    ctx.store.set_stage(&input.subdomain, Stage::Completed)?;
    ctx.store.touch(&input.subdomain, ctx.clock.epoch_ms())?;
    if let Some(run_id) = site.current_run_id {
        ctx.store.complete_run(&input.subdomain, run_id)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
