// Route handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::error::ApiError;
use crate::agents::StageOutcome;
use crate::pipeline::Pipeline;
use crate::records::{MarketAnalysisReport, ProductRoadmap};

/// Response header carrying `success` or `degraded`.
pub const STAGE_STATUS_HEADER: &str = "x-stage-status";

const MARKET_DATA_KEY: &str = "_market_analyst_data";
const MIN_IDEA_CHARS: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Deserialize)]
pub struct StartupIdeaRequest {
    pub startup_idea: String,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketReportRequest {
    pub market_report: Map<String, Value>,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductRoadmapRequest {
    pub product_roadmap: Map<String, Value>,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the ideaforge startup MVP builder API",
        "endpoints": {
            "market_analyst": "/market-analyst",
            "product_manager": "/product-manager",
            "technical_architect": "/technical-architect",
            "user_outputs": "/outputs/user/{user_id}",
            "session_output": "/outputs/session",
            "health": "/health",
        }
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn market_analyst(
    State(state): State<AppState>,
    payload: Result<Json<StartupIdeaRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    if req.startup_idea.trim().chars().count() < MIN_IDEA_CHARS {
        return Err(ApiError::BadRequest(
            "Please provide a valid startup idea with at least 5 characters".into(),
        ));
    }
    tracing::debug!(user_id = %req.user_id, session_id = %req.session_id, "Market analysis requested");

    let outcome = state.pipeline.market(&req.startup_idea).await;
    let (status, body) = settle(outcome, "Failed to generate market analysis report")?;
    Ok(respond(status, with_ids(body, &req.user_id, &req.session_id)))
}

pub async fn product_manager(
    State(state): State<AppState>,
    payload: Result<Json<MarketReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let market_data = strip_keys(req.market_report, &["user_id", "session_id"]);
    let report: MarketAnalysisReport = serde_json::from_value(Value::Object(market_data.clone()))
        .map_err(|e| ApiError::Unprocessable(format!("Invalid market report: {}", e)))?;
    tracing::debug!(user_id = %req.user_id, session_id = %req.session_id, "Product roadmap requested");

    let outcome = state.pipeline.product(&report).await;
    let (status, body) = settle(outcome, "Failed to generate product roadmap")?;
    let mut body = with_ids(body, &req.user_id, &req.session_id);
    body.insert(MARKET_DATA_KEY.to_string(), Value::Object(market_data));
    Ok(respond(status, body))
}

pub async fn technical_architect(
    State(state): State<AppState>,
    payload: Result<Json<ProductRoadmapRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(mut req) = payload?;
    let market_data = req
        .product_roadmap
        .remove(MARKET_DATA_KEY)
        .unwrap_or_else(|| Value::Object(Map::new()));
    let roadmap_data = strip_keys(req.product_roadmap, &["user_id", "session_id"]);
    let roadmap: ProductRoadmap = serde_json::from_value(Value::Object(roadmap_data.clone()))
        .map_err(|e| ApiError::Unprocessable(format!("Invalid product roadmap: {}", e)))?;
    tracing::debug!(user_id = %req.user_id, session_id = %req.session_id, "Technical blueprint requested");

    let outcome = state.pipeline.technical(&roadmap).await;
    let (status, blueprint) = settle(outcome, "Failed to generate technical blueprint")?;

    state
        .pipeline
        .persist(
            &req.user_id,
            &req.session_id,
            market_data,
            Value::Object(roadmap_data),
            Value::Object(blueprint.clone()),
        )
        .await;

    Ok(respond(status, with_ids(blueprint, &req.user_id, &req.session_id)))
}

pub async fn user_outputs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let outputs = state
        .pipeline
        .store()
        .get_by_user(&user_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Error retrieving agent outputs: {:#}", e)))?;
    Ok(Json(json!({ "outputs": outputs })))
}

pub async fn session_output(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let output = state
        .pipeline
        .store()
        .get_by_session(&req.session_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Error retrieving session output: {:#}", e)))?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No output found for session {}", req.session_id))
        })?;
    Ok(Json(Value::Object(to_object(&output)?)))
}

/// Unpack a stage outcome into its status label and JSON object body.
fn settle<T: Serialize>(
    outcome: StageOutcome<T>,
    failure: &str,
) -> Result<(&'static str, Map<String, Value>), ApiError> {
    let status = outcome.status_label();
    match outcome.into_record() {
        Some(record) => Ok((status, to_object(&record)?)),
        None => Err(ApiError::Internal(failure.to_string())),
    }
}

fn to_object(value: &impl Serialize) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::Internal("Record did not serialize to an object".into())),
        Err(e) => Err(ApiError::Internal(format!("Could not serialize record: {}", e))),
    }
}

fn strip_keys(mut map: Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    for key in keys {
        map.remove(*key);
    }
    map
}

fn with_ids(mut body: Map<String, Value>, user_id: &str, session_id: &str) -> Map<String, Value> {
    body.insert("user_id".to_string(), Value::String(user_id.to_string()));
    body.insert("session_id".to_string(), Value::String(session_id.to_string()));
    body
}

fn respond(status: &'static str, body: Map<String, Value>) -> Response {
    ([(STAGE_STATUS_HEADER, status)], Json(Value::Object(body))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_keys_leaves_other_fields() {
        let map = json!({"user_id": "u", "session_id": "s", "executive_summary": "x"})
            .as_object()
            .cloned()
            .unwrap();
        let stripped = strip_keys(map, &["user_id", "session_id"]);
        assert_eq!(stripped.len(), 1);
        assert!(stripped.contains_key("executive_summary"));
    }

    #[test]
    fn test_settle_failed_stage_is_internal_error() {
        let outcome: StageOutcome<Value> = StageOutcome::Failed {
            reason: "provider down".into(),
        };
        let err = settle(outcome, "Failed to generate product roadmap").unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg == "Failed to generate product roadmap"));
    }

    #[test]
    fn test_settle_keeps_degraded_label() {
        let outcome = StageOutcome::Degraded {
            record: json!({"a": 1}),
            reasons: vec!["personas: fallback".into()],
        };
        let (status, body) = settle(outcome, "unused").unwrap();
        assert_eq!(status, "degraded");
        assert_eq!(body["a"], 1);
    }
}
