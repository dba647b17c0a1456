use clerk_core::{DocumentKind, RunId};
use rusqlite::Connection;

use super::*;
use crate::test_support::fixture;

fn run_id() -> RunId {
    RunId::from_string("oakdale_1_abcdef")
}

fn write_page(fx: &crate::test_support::Fixture, text: &str) -> std::path::PathBuf {
    let layout = fx.ctx.layout("oakdale");
    let dir = layout.txt_dir(DocumentKind::Minutes, "council", "2024-01-05");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("page-1.txt");
    std::fs::write(&path, text).unwrap();
    path
}

#[tokio::test]
async fn disabled_entities_is_a_no_op() {
    let fx = fixture("oakdale");
    write_page(&fx, "Mayor Jones spoke");

    let input = ExtractInput { subdomain: "oakdale".into(), run_id: run_id(), enable_entities: false };
    extract(&fx.ctx, input).await.unwrap();

    let counters = fx.store.read_counters("oakdale").unwrap();
    assert_eq!(counters.documents_extracted, 0);
}

#[tokio::test]
async fn writes_entity_counts_into_meetings_db() {
    let fx = fixture("oakdale");
    write_page(&fx, "Mayor Jones called the meeting to order");

    let input = ExtractInput { subdomain: "oakdale".into(), run_id: run_id(), enable_entities: true };
    extract(&fx.ctx, input).await.unwrap();

    let counters = fx.store.read_counters("oakdale").unwrap();
    assert_eq!(counters.documents_extracted, 1);
    assert_eq!(counters.documents_extract_total, 1);
    assert_eq!(counters.documents_extract_failed, 0);

    let layout = fx.ctx.layout("oakdale");
    let conn = Connection::open(layout.meetings_db_path()).unwrap();
    let entity_count: u32 = conn.query_row("SELECT entity_count FROM entities", [], |row| row.get(0)).unwrap();
    assert_eq!(entity_count, 2);
}

#[tokio::test]
async fn second_run_hits_the_cache() {
    let fx = fixture("oakdale");
    write_page(&fx, "Mayor Jones called the meeting to order");

    let input = ExtractInput { subdomain: "oakdale".into(), run_id: run_id(), enable_entities: true };
    extract(&fx.ctx, input).await.unwrap();
    let input2 = ExtractInput { subdomain: "oakdale".into(), run_id: run_id(), enable_entities: true };
    let (_processed, cache_hits) = run(&fx.ctx, &input2).await.unwrap();
    assert_eq!(cache_hits, 1);
}
