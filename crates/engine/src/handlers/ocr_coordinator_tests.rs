use clerk_core::{DocumentKind, JobType, RunId, Stage};
use clerk_store::CounterField;

use super::*;
use crate::test_support::fixture;

fn run_id() -> RunId {
    RunId::from_string("oakdale_1_abcdef")
}

fn write_txt_page(fx: &crate::test_support::Fixture, meeting: &str, date: &str) {
    let layout = fx.ctx.layout("oakdale");
    let dir = layout.txt_dir(DocumentKind::Minutes, meeting, date);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("page-1.txt"), b"hello").unwrap();
}

#[tokio::test]
async fn derives_counters_and_enqueues_compile_and_extract() {
    let fx = fixture("oakdale");
    fx.store
        .update_pipeline_config("oakdale", clerk_core::PipelineConfig::default())
        .unwrap();
    fx.store.set_counter("oakdale", CounterField::Total, 2).unwrap();
    fx.store.set_stage("oakdale", Stage::Ocr).unwrap();
    write_txt_page(&fx, "council", "2024-01-05");
    write_txt_page(&fx, "council", "2024-02-02");

    let input = OcrCoordinatorInput { subdomain: "oakdale".into(), run_id: run_id() };
    ocr_coordinator(&fx.ctx, input).await.unwrap();

    let site = fx.store.get_site("oakdale").unwrap();
    assert_eq!(site.stage, Stage::Compilation);
    assert_eq!(site.counters.documents_ocred, 2);
    assert_eq!(site.counters.documents_ocr_failed, 0);
    assert!(!site.coordinator_enqueued);

    assert_eq!(fx.ctx.queue.length(JobType::Compile.queue_name()).await.unwrap(), 1);
    assert_eq!(fx.ctx.queue.length(JobType::Extract.queue_name()).await.unwrap(), 1);
}

#[tokio::test]
async fn partial_failure_is_derived_from_the_total_completed_gap() {
    let fx = fixture("oakdale");
    fx.store.set_counter("oakdale", CounterField::Total, 3).unwrap();
    fx.store.set_stage("oakdale", Stage::Ocr).unwrap();
    write_txt_page(&fx, "council", "2024-01-05");
    write_txt_page(&fx, "council", "2024-02-02");

    let input = OcrCoordinatorInput { subdomain: "oakdale".into(), run_id: run_id() };
    ocr_coordinator(&fx.ctx, input).await.unwrap();

    let counters = fx.store.read_counters("oakdale").unwrap();
    assert_eq!(counters.documents_ocred, 2);
    assert_eq!(counters.documents_ocr_failed, 1);
}

#[tokio::test]
async fn running_twice_enqueues_at_most_one_compile_and_extract() {
    let fx = fixture("oakdale");
    fx.store.set_counter("oakdale", CounterField::Total, 1).unwrap();
    fx.store.set_stage("oakdale", Stage::Ocr).unwrap();
    write_txt_page(&fx, "council", "2024-01-05");

    let input = OcrCoordinatorInput { subdomain: "oakdale".into(), run_id: run_id() };
    ocr_coordinator(&fx.ctx, input).await.unwrap();
    let input2 = OcrCoordinatorInput { subdomain: "oakdale".into(), run_id: run_id() };
    ocr_coordinator(&fx.ctx, input2).await.unwrap();

    assert_eq!(fx.ctx.queue.length(JobType::Compile.queue_name()).await.unwrap(), 1);
    assert_eq!(fx.ctx.queue.length(JobType::Extract.queue_name()).await.unwrap(), 1);

    let counters = fx.store.read_counters("oakdale").unwrap();
    assert_eq!(counters.documents_ocred, 1);
}
