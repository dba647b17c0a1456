use std::collections::HashSet;
use std::time::Duration;

use clerk_core::{Priority, RunId};

use super::*;
use crate::test_support::fixture;

fn config(queues: &[&str]) -> WorkerConfig {
    WorkerConfig {
        worker_name: "worker-test".into(),
        queues: queues.iter().map(|q| q.to_string()).collect(),
        poll_interval: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn claims_and_completes_a_compile_job() {
    let fx = fixture("oakdale");
    let run_id = RunId::from_string("oakdale_1_abcdef");
    let job_id = fx
        .ctx
        .queue
        .enqueue("oakdale", run_id, Priority::Normal, clerk_core::JobPayload::Compile, HashSet::new(), None)
        .await
        .unwrap();

    let worker = Worker::new(fx.ctx.clone(), config(&["compilation"]));
    let mut claimed_once = false;
    worker
        .run(|| {
            let done = claimed_once;
            claimed_once = true;
            done
        })
        .await
        .unwrap();

    let job = fx.store.get_job(&job_id).unwrap();
    assert_eq!(job.status, clerk_core::JobStatus::Completed);
}

#[tokio::test]
async fn a_panicking_handler_fails_the_job_instead_of_crashing_the_worker() {
    let fx = fixture("oakdale");
    let run_id = RunId::from_string("oakdale_1_abcdef");
    let bad_path = std::path::PathBuf::from("/not/a/pdfs/tree/a.pdf");
    let job_id = fx
        .ctx
        .queue
        .enqueue(
            "oakdale",
            run_id,
            Priority::Normal,
            clerk_core::JobPayload::ocr_page(bad_path, clerk_core::OcrBackendKind::Tesseract),
            HashSet::new(),
            None,
        )
        .await
        .unwrap();

    let worker = Worker::new(fx.ctx.clone(), config(&["ocr"]));
    let mut claimed_once = false;
    worker
        .run(|| {
            let done = claimed_once;
            claimed_once = true;
            done
        })
        .await
        .unwrap();

    let job = fx.store.get_job(&job_id).unwrap();
    assert_eq!(job.status, clerk_core::JobStatus::Failed);
}

#[tokio::test]
async fn high_priority_job_is_claimed_before_a_normal_one() {
    let fx = fixture("oakdale");
    let run_id = RunId::from_string("oakdale_1_abcdef");
    fx.ctx
        .queue
        .enqueue("oakdale", run_id.clone(), Priority::Normal, clerk_core::JobPayload::Compile, HashSet::new(), None)
        .await
        .unwrap();
    let high_job_id = fx
        .ctx
        .queue
        .enqueue("oakdale", run_id, Priority::High, clerk_core::JobPayload::Deploy, HashSet::new(), None)
        .await
        .unwrap();

    let job = fx.ctx.queue.claim(&["high", "compilation"], "w").await.unwrap().unwrap();
    assert_eq!(job.id, high_job_id);
}
