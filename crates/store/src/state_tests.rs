// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

use super::*;
use clerk_core::{JobStatus, RunId, SiteStatus, Stage};

#[test]
fn site_created_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = StoreEvent::SiteCreated { subdomain: "oakdale".into(), created_at_ms: 10 };
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.sites.len(), 1);
    assert_eq!(state.get_site("oakdale").unwrap().created_at_ms, 10);
}

#[test]
fn counter_set_is_an_assignment_not_a_mutation() {
    let mut state = MaterializedState::default();
    state.apply_event(&StoreEvent::SiteCreated { subdomain: "oakdale".into(), created_at_ms: 0 });
    let event = StoreEvent::CounterSet { subdomain: "oakdale".into(), field: CounterField::Fetched, value: 3 };
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.get_site("oakdale").unwrap().counters.documents_fetched, 3);
}

#[test]
fn stage_advanced_replays_to_same_value() {
    let mut state = MaterializedState::default();
    state.apply_event(&StoreEvent::SiteCreated { subdomain: "oakdale".into(), created_at_ms: 0 });
    let event = StoreEvent::StageAdvanced { subdomain: "oakdale".into(), stage: Stage::Ocr };
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.get_site("oakdale").unwrap().stage, Stage::Ocr);
}

#[test]
fn events_for_unknown_site_are_dropped_silently() {
    let mut state = MaterializedState::default();
    state.apply_event(&StoreEvent::StageAdvanced { subdomain: "ghost-town".into(), stage: Stage::Ocr });
    assert!(state.get_site("ghost-town").is_none());
}

#[test]
fn run_started_then_completed_clears_current_run() {
    let mut state = MaterializedState::default();
    state.apply_event(&StoreEvent::SiteCreated { subdomain: "oakdale".into(), created_at_ms: 0 });
    let run_id = RunId::from_string("oakdale_1_abcdef");
    state.apply_event(&StoreEvent::RunStarted { subdomain: "oakdale".into(), run_id: run_id.clone(), at_ms: 5 });
    assert_eq!(state.get_site("oakdale").unwrap().current_run_id, Some(run_id.clone()));

    state.apply_event(&StoreEvent::RunCompleted { subdomain: "oakdale".into(), run_id: run_id.clone() });
    let site = state.get_site("oakdale").unwrap();
    assert!(site.current_run_id.is_none());
    assert_eq!(site.last_completed_run_id, Some(run_id));
}

#[test]
fn job_tracked_does_not_overwrite_existing_entry() {
    let mut state = MaterializedState::default();
    let job = Job::builder().subdomain("oakdale").status(JobStatus::Queued).build();
    let id = job.id;
    state.apply_event(&StoreEvent::JobTracked { job: Box::new(job.clone()) });
    state.apply_event(&StoreEvent::JobStatusChanged {
        job_id: id,
        status: JobStatus::Running,
        attempt: 0,
        error: None,
    });
    // Re-tracking the same id must not clobber the status change above.
    state.apply_event(&StoreEvent::JobTracked { job: Box::new(job) });
    assert_eq!(state.get_job(&id).unwrap().status, JobStatus::Running);
}

#[test]
fn job_status_changed_sets_absolute_attempt() {
    let mut state = MaterializedState::default();
    let job = Job::builder().subdomain("oakdale").build();
    let id = job.id;
    state.apply_event(&StoreEvent::JobTracked { job: Box::new(job) });
    let event =
        StoreEvent::JobStatusChanged { job_id: id, status: JobStatus::Failed, attempt: 1, error: Some("ocr backend timed out".into()) };
    state.apply_event(&event);
    state.apply_event(&event);
    let job = state.get_job(&id).unwrap();
    assert_eq!(job.attempt, 1);
    assert_eq!(job.status, JobStatus::Failed);
}

#[test]
fn site_status_changed_is_idempotent() {
    let mut state = MaterializedState::default();
    state.apply_event(&StoreEvent::SiteCreated { subdomain: "oakdale".into(), created_at_ms: 0 });
    let event = StoreEvent::StatusChanged { subdomain: "oakdale".into(), status: SiteStatus::Deployed };
    state.apply_event(&event);
    state.apply_event(&event);
    assert_eq!(state.get_site("oakdale").unwrap().status, SiteStatus::Deployed);
}
