use clerk_core::{JobId, JobPayload, RunId, Stage};

use super::*;

fn sample_context() -> JobContext {
    JobContext {
        job_id: JobId::new(),
        parent_job_id: None,
        run_id: RunId::from_string("oakdale_1_abcdef"),
        subdomain: "oakdale".to_string(),
        stage: Stage::Fetch,
    }
}

#[tokio::test]
async fn no_context_outside_a_scope() {
    assert!(current_job_context().is_none());
}

#[tokio::test]
async fn context_is_visible_inside_its_scope() {
    let ctx = sample_context();
    let subdomain = with_job_context(ctx.clone(), async { current_job_context().map(|c| c.subdomain) }).await;
    assert_eq!(subdomain, Some("oakdale".to_string()));
}

#[tokio::test]
async fn context_does_not_leak_after_its_scope() {
    let ctx = sample_context();
    with_job_context(ctx, async {}).await;
    assert!(current_job_context().is_none());
}

#[tokio::test]
async fn emit_helpers_do_not_panic_without_context() {
    let _ = JobPayload::Compile;
    emit_started("fetch");
    emit_completed("fetch", serde_json::json!({"total_pdfs": 3}));
    emit_failed("fetch", &EngineError::config("bad label"), serde_json::json!({}));
}
