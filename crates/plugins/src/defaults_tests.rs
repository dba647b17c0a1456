use std::sync::Arc;

use clerk_core::{SiteStatus, Stage};
use clerk_store::CentralStore;
use tempfile::tempdir;

use super::*;

fn new_store() -> (Arc<CentralStore>, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = Arc::new(CentralStore::open(dir.path().join("wal.log"), dir.path()).unwrap());
    (store, dir)
}

#[tokio::test]
async fn default_store_writer_creates_site() {
    let (store, _dir) = new_store();
    let writer = DefaultStoreWriter::new(store.clone());

    writer.create_site("oakdale", 1_000).await.unwrap();

    assert!(store.get_site("oakdale").is_some());
}

#[tokio::test]
async fn default_store_writer_applies_status_and_stage_updates() {
    let (store, _dir) = new_store();
    store.create_site("oakdale", 1_000).unwrap();
    let writer = DefaultStoreWriter::new(store.clone());

    let update = SiteUpdate::default().status(SiteStatus::Deployed).stage(Stage::Completed);
    writer.update_site("oakdale", &update).await.unwrap();

    let site = store.get_site("oakdale").unwrap();
    assert_eq!(site.status, SiteStatus::Deployed);
    assert_eq!(site.stage, Stage::Completed);
}

#[tokio::test]
async fn identity_transformer_passes_text_through() {
    let out = IdentityTransformer.transform("hello").await.unwrap();
    assert_eq!(out, "hello");
}

#[tokio::test]
async fn generic_loader_is_a_no_op() {
    GenericLoader.load("oakdale", "some text").await.unwrap();
}

#[tokio::test]
async fn audit_log_plugin_reports_its_name() {
    assert_eq!(AuditLogPlugin.name(), "audit_log");
    AuditLogPlugin.create_site("oakdale", 1_000).await.unwrap();
}
