//! Endpoint handlers.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/v1/mindmap/update` - Propose mind-map changes for new input
//! - `POST /api/v1/thought/analyze` - Summarize a thought into keywords
//! - `POST /api/v1/inspiration/recommend` - Suggest new mind-map branches
//! - `GET /api/v1/inspiration?query=` - Web search for inspiration links

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{HttpError, SharedState};
use crate::agents::{InspirationParams, MindmapUpdateParams, ThoughtParams};
use crate::schema::{
    InspirationRecommendResult, InspirationSearchResult, MindmapUpdateResult,
    ThoughtAnalysisResult,
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `ok` while the process is serving
    pub status: String,
    /// Crate version
    pub version: String,
    /// Whether an LLM API key is configured
    pub model_configured: bool,
    /// Whether a search API key is configured
    pub search_configured: bool,
}

/// Query parameters for the inspiration search
#[derive(Debug, Deserialize)]
pub struct InspirationQuery {
    /// Search terms; blank yields no results
    #[serde(default)]
    pub query: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_configured: state.config.model.is_configured(),
        search_configured: state.search.is_configured(),
    })
}

/// Propose mind-map changes for the latest message
pub async fn update_mindmap(
    State(state): State<SharedState>,
    body: Result<Json<MindmapUpdateParams>, JsonRejection>,
) -> Result<Json<MindmapUpdateResult>, HttpError> {
    let Json(params) = body?;
    let result = state.mindmap_agent.process(params).await?;
    Ok(Json(result))
}

/// Summarize a thought
pub async fn analyze_thought(
    State(state): State<SharedState>,
    body: Result<Json<ThoughtParams>, JsonRejection>,
) -> Result<Json<ThoughtAnalysisResult>, HttpError> {
    let Json(params) = body?;
    let result = state.thought_agent.process(params).await?;
    Ok(Json(result))
}

/// Recommend inspirations for the current mind-map
pub async fn recommend_inspirations(
    State(state): State<SharedState>,
    body: Result<Json<InspirationParams>, JsonRejection>,
) -> Result<Json<InspirationRecommendResult>, HttpError> {
    let Json(params) = body?;
    let result = state.inspiration_agent.process(params).await?;
    Ok(Json(result))
}

/// Web search for inspiration links; empty when search is unavailable
pub async fn search_inspiration(
    State(state): State<SharedState>,
    query: Result<Query<InspirationQuery>, QueryRejection>,
) -> Result<Json<InspirationSearchResult>, HttpError> {
    let Query(params) = query?;
    let items = state.search.search(&params.query).await;
    Ok(Json(InspirationSearchResult { items }))
}

/// JSON 404 used when no frontend bundle is deployed
pub async fn not_found() -> HttpError {
    HttpError::new("Not Found", "NOT_FOUND")
}
