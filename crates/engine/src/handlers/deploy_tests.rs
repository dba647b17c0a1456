use clerk_core::{RunId, SiteStatus, Stage};

use super::*;
use crate::test_support::fixture;

#[tokio::test]
async fn success_marks_site_deployed_and_completed() {
    let fx = fixture("oakdale");
    fx.store.start_run("oakdale", RunId::from_string("oakdale_1_abcdef"), 0).unwrap();

    let input = DeployInput { subdomain: "oakdale".into() };
    deploy(&fx.ctx, input).await.unwrap();

    let site = fx.store.get_site("oakdale").unwrap();
    assert_eq!(site.status, SiteStatus::Deployed);
    assert_eq!(site.stage, Stage::Completed);
    assert!(site.current_run_id.is_none());
    assert!(site.last_completed_run_id.is_some());
    assert_eq!(site.counters.documents_deploy_total, 1);
    assert_eq!(site.counters.documents_deploy_completed, 1);
    assert_eq!(site.counters.documents_deploy_failed, 0);
}
