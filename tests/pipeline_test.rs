// End-to-end pipeline runs against stub collaborators

mod common;

use std::sync::Arc;
use tempfile::TempDir;

use common::{market_reply, pipeline, CannedProvider, OfflineProvider};

#[tokio::test]
async fn test_offline_run_degrades_every_stage_and_is_stored() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(Arc::new(OfflineProvider), &dir);

    let run = pipeline.run("AI fitness coach", "u1", "s1").await;

    assert_eq!(run.market.status_label(), "degraded");
    assert_eq!(run.product.as_ref().unwrap().status_label(), "degraded");
    let technical = run.technical.as_ref().unwrap();
    assert_eq!(technical.status_label(), "degraded");
    assert!(technical
        .reasons()
        .iter()
        .any(|r| r.contains("provider offline")));
    assert_eq!(run.failure(), None);

    let stored = run.stored.expect("run should be stored");
    assert_eq!(stored.session_id, "s1");
    assert_eq!(
        stored.outputs.market_analyst_response["startup_idea"],
        "AI fitness coach"
    );

    let fetched = pipeline.store().get_by_session("s1").await.unwrap().unwrap();
    assert_eq!(fetched.id, stored.id);
}

#[tokio::test]
async fn test_model_market_report_flows_into_product_stage() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(
        Arc::new(CannedProvider(market_reply("Meal planning for shift workers"))),
        &dir,
    );

    let market = pipeline.market("Meal planning for shift workers").await;
    assert_eq!(market.status_label(), "success");

    let report = market.into_record().unwrap();
    let product = pipeline.product(&report).await;
    let roadmap = product.record().unwrap();
    assert_eq!(roadmap.startup_idea, "Meal planning for shift workers");
    assert!(!roadmap.user_personas.is_empty());
    assert!(!roadmap.features.is_empty());
}

#[tokio::test]
async fn test_each_run_is_listed_newest_first() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(Arc::new(OfflineProvider), &dir);

    pipeline.run("First startup idea", "u1", "s1").await;
    pipeline.run("Second startup idea", "u1", "s2").await;

    let outputs = pipeline.store().get_by_user("u1").await.unwrap();
    let sessions: Vec<&str> = outputs.iter().map(|o| o.session_id.as_str()).collect();
    assert_eq!(sessions, ["s2", "s1"]);
}
