// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk reconcile-pipeline`: runs the reconciler once (spec.md SS6).

use clerk_core::SystemClock;
use clerk_engine::{Context, ReconcileOutcome};

use crate::exit_error::ExitError;

pub async fn run(ctx: &Context<SystemClock>) -> Result<(), ExitError> {
    let outcomes = clerk_engine::reconciler::run(ctx).await?;
    if outcomes.is_empty() {
        println!("No stuck sites found");
        return Ok(());
    }
    for (subdomain, outcome) in &outcomes {
        let label = match outcome {
            ReconcileOutcome::CoordinatorReenqueued => "re-enqueued ocr-coordinator",
            ReconcileOutcome::CoordinatorAlreadyLive => "coordinator already live",
            ReconcileOutcome::AllOcrFailed => "all OCR failed, needs an operator",
        };
        println!("{subdomain}: {label}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    #[tokio::test]
    async fn no_stuck_sites_is_a_clean_no_op() {
        let fx = fixture("oakdale.civic.band");
        run(&fx.ctx).await.unwrap();
    }
}
