// Ideaforge - HTTP server
// One endpoint per pipeline stage plus read access to stored outputs

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{AppState, STAGE_STATUS_HEADER};

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::pipeline::Pipeline;

/// Routes without middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/market-analyst", post(handlers::market_analyst))
        .route("/product-manager", post(handlers::product_manager))
        .route("/technical-architect", post(handlers::technical_architect))
        .route("/outputs/user/:user_id", get(handlers::user_outputs))
        .route("/outputs/session", post(handlers::session_output))
        .with_state(state)
}

/// Full application: routes, permissive CORS, body limit and request tracing.
pub fn app(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Router {
    create_router(AppState { pipeline })
        .layer(CorsLayer::permissive())
        .layer(axum::extract::DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = app(pipeline, config);

    tracing::info!("Starting ideaforge server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
