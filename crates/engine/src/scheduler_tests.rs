use clerk_core::Stage;

use super::*;
use crate::test_support::fixture;

#[tokio::test]
async fn enqueues_fetch_for_a_never_run_site() {
    let fx = fixture("oakdale");
    fx.ctx.clock.set_epoch_ms(1_700_000_000_000);

    let run_id = tick(&fx.ctx).await.unwrap();
    assert!(run_id.is_some());
    assert_eq!(fx.ctx.queue.length("fetch").await.unwrap(), 1);
}

#[tokio::test]
async fn a_recently_touched_site_is_not_eligible() {
    let fx = fixture("oakdale");
    fx.ctx.clock.set_epoch_ms(1_700_000_000_000);
    fx.store.touch("oakdale", 1_700_000_000_000).unwrap();

    let run_id = tick(&fx.ctx).await.unwrap();
    assert!(run_id.is_none());
    assert_eq!(fx.ctx.queue.length("fetch").await.unwrap(), 0);
}

#[tokio::test]
async fn a_site_with_a_live_coordinator_sits_out_the_tick() {
    let fx = fixture("oakdale");
    fx.ctx.clock.set_epoch_ms(1_700_000_000_000);
    fx.store.set_stage("oakdale", Stage::Ocr).unwrap();
    fx.store.set_coordinator_enqueued("oakdale", true).unwrap();
    fx.store.set_counter("oakdale", clerk_store::CounterField::Fetched, 5).unwrap();
    fx.store.set_counter("oakdale", clerk_store::CounterField::Ocred, 2).unwrap();

    let run_id = tick(&fx.ctx).await.unwrap();
    assert!(run_id.is_none());
}

#[tokio::test]
async fn picks_the_oldest_of_several_eligible_sites() {
    let fx = fixture("oakdale");
    fx.ctx.clock.set_epoch_ms(1_700_100_000_000);
    fx.store.create_site("riverside", 0).unwrap();
    fx.store.touch("oakdale", 1_600_000_000_000).unwrap();
    fx.store.touch("riverside", 1_650_000_000_000).unwrap();

    let run_id = tick(&fx.ctx).await.unwrap().unwrap();
    assert_eq!(run_id.subdomain(), "oakdale");
}
