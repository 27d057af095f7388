// Integration tests for the HTTP surface

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use common::{market_reply, pipeline, CannedProvider, OfflineProvider};
use ideaforge::config::ServerConfig;
use ideaforge::providers::LlmProvider;
use ideaforge::server::{app, STAGE_STATUS_HEADER};

fn router(provider: Arc<dyn LlmProvider>, dir: &TempDir) -> Router {
    app(pipeline(provider, dir), &ServerConfig::default())
}

fn offline_router(dir: &TempDir) -> Router {
    router(Arc::new(OfflineProvider), dir)
}

async fn get(app: &Router, path: &str) -> Response {
    let req = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn post(app: &Router, path: &str, body: &Value) -> Response {
    post_raw(app, path, body.to_string()).await
}

async fn post_raw(app: &Router, path: &str, body: String) -> Response {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 4 * 1024 * 1024)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

fn stage_status(resp: &Response) -> &str {
    resp.headers()
        .get(STAGE_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_health_and_root() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = get(&app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"status": "ok"}));

    let resp = get(&app, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["endpoints"]["market_analyst"], "/market-analyst");
    assert!(body["message"].as_str().unwrap().contains("ideaforge"));
}

#[tokio::test]
async fn test_short_idea_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = post(
        &app,
        "/market-analyst",
        &json!({"startup_idea": "  app  ", "user_id": "u1", "session_id": "s1"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["detail"],
        "Please provide a valid startup idea with at least 5 characters"
    );
}

#[tokio::test]
async fn test_malformed_body_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = post_raw(&app, "/market-analyst", "{\"startup_idea\": ".to_string()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["detail"].is_string());

    let resp = post(&app, "/market-analyst", &json!({"startup_idea": "AI fitness coach"})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_market_analyst_uses_model_report() {
    let dir = TempDir::new().unwrap();
    let app = router(Arc::new(CannedProvider(market_reply("AI fitness coach"))), &dir);

    let resp = post(
        &app,
        "/market-analyst",
        &json!({"startup_idea": "AI fitness coach", "user_id": "u1", "session_id": "s1"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stage_status(&resp), "success");
    let body = body_json(resp).await;
    assert_eq!(body["startup_idea"], "AI fitness coach");
    assert_eq!(body["user_id"], "u1");
    assert_eq!(body["session_id"], "s1");
    assert!(body["executive_summary"].is_string());
}

#[tokio::test]
async fn test_market_analyst_falls_back_when_model_is_down() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = post(
        &app,
        "/market-analyst",
        &json!({"startup_idea": "AI fitness coach", "user_id": "u1", "session_id": "s1"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stage_status(&resp), "degraded");
    let body = body_json(resp).await;
    assert_eq!(body["startup_idea"], "AI fitness coach");
    assert!(body["competitors"].is_array());
}

#[tokio::test]
async fn test_product_manager_rejects_invalid_report() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = post(
        &app,
        "/product-manager",
        &json!({"market_report": {"startup_idea": "x"}, "user_id": "u1", "session_id": "s1"}),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body_json(resp).await["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("Invalid market report"));
}

#[tokio::test]
async fn test_full_flow_is_stored_and_retrievable() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let market = body_json(
        post(
            &app,
            "/market-analyst",
            &json!({"startup_idea": "AI fitness coach", "user_id": "u1", "session_id": "s1"}),
        )
        .await,
    )
    .await;

    let resp = post(
        &app,
        "/product-manager",
        &json!({"market_report": market, "user_id": "u1", "session_id": "s1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stage_status(&resp), "degraded");
    let product = body_json(resp).await;
    assert_eq!(product["user_id"], "u1");
    assert_eq!(product["_market_analyst_data"]["startup_idea"], "AI fitness coach");
    assert!(product["_market_analyst_data"].get("user_id").is_none());
    assert_eq!(product["features"][0]["name"], "Core Functionality");

    let resp = post(
        &app,
        "/technical-architect",
        &json!({"product_roadmap": product, "user_id": "u1", "session_id": "s1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(stage_status(&resp), "degraded");
    let blueprint = body_json(resp).await;
    assert_eq!(blueprint["session_id"], "s1");
    assert!(blueprint.get("_market_analyst_data").is_none());
    assert!(blueprint["architecture_diagram"]
        .as_str()
        .unwrap()
        .starts_with("flowchart"));

    let resp = get(&app, "/outputs/user/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outputs = body_json(resp).await["outputs"].as_array().unwrap().clone();
    assert_eq!(outputs.len(), 1);
    let stored = &outputs[0];
    assert_eq!(stored["session_id"], "s1");
    assert_eq!(
        stored["market_analyst_response"]["startup_idea"],
        "AI fitness coach"
    );
    assert!(stored["product_manager_response"].get("_market_analyst_data").is_none());
    assert!(stored["tech_architect_response"].get("user_id").is_none());

    let resp = post(&app, "/outputs/session", &json!({"session_id": "s1"})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["user_id"], "u1");

    let resp = get(&app, "/outputs/user/someone-else").await;
    assert_eq!(body_json(resp).await, json!({"outputs": []}));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);

    let resp = post(&app, "/outputs/session", &json!({"session_id": "nope"})).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await["detail"],
        "No output found for session nope"
    );
}
