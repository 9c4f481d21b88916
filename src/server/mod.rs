//! HTTP server.
//!
//! This module provides:
//! - Shared application state (config, agents, search client)
//! - The axum router with the `/api` endpoints
//! - Static serving of the frontend bundle with SPA fallback

mod handlers;
mod http_error;

pub use handlers::*;
pub use http_error::HttpError;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agents::{InspirationAgent, MindmapAgent, ThoughtAgent};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::llm::{ChatClient, ChatCompletion, StructuredClient};
use crate::search::SearchClient;

/// Application state shared across handlers.
///
/// Everything here is read-only after startup; requests never share
/// mutable state.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Mind-map update agent.
    pub mindmap_agent: MindmapAgent,
    /// Thought analysis agent.
    pub thought_agent: ThoughtAgent,
    /// Inspiration recommendation agent.
    pub inspiration_agent: InspirationAgent,
    /// Web search client.
    pub search: SearchClient,
}

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state around an arbitrary chat backend
    pub fn new(config: Config, chat: Arc<dyn ChatCompletion>, search: SearchClient) -> Self {
        let structured = StructuredClient::new(
            chat,
            config.request.clone(),
            config.model.response_language.clone(),
        );

        Self {
            mindmap_agent: MindmapAgent::new(structured.clone()),
            thought_agent: ThoughtAgent::new(structured.clone()),
            inspiration_agent: InspirationAgent::new(structured),
            search,
            config,
        }
    }

    /// Create state with the real provider clients described by `config`
    pub fn from_config(config: Config) -> AppResult<Self> {
        let chat = ChatClient::new(&config.model, config.request.clone())?;
        let search = SearchClient::new(&config.search, &config.request).map_err(|e| {
            AppError::Internal {
                message: format!("Failed to create search client: {}", e),
            }
        })?;

        if !config.model.is_configured() {
            warn!("MODEL_SCOPE_API_KEY not set; AI endpoints will fail until it is configured");
        }
        if !config.search.is_configured() {
            warn!("SERPHOUSE_API_KEY not set; inspiration search returns empty results");
        }

        Ok(Self::new(config, Arc::new(chat), search))
    }
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    // Unknown `/api` paths get a JSON 404 even when the SPA fallback is active
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/v1/mindmap/update", post(update_mindmap))
        .route("/v1/thought/analyze", post(analyze_thought))
        .route("/v1/inspiration/recommend", post(recommend_inspirations))
        .route("/v1/inspiration", get(search_inspiration))
        .fallback(not_found);

    let static_dir = state.config.server.static_dir.clone();
    let index = static_dir.join("index.html");

    let router = Router::new().nest("/api", api);
    let router = if index.is_file() {
        router.fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
    } else {
        warn!(path = %static_dir.display(), "Frontend bundle not found; serving API only");
        router.fallback(not_found)
    };

    let router = match cors_layer(&state.config) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// CORS for a separately hosted frontend, if `CORS_ALLOW_ORIGIN` is set.
///
/// `*` allows any origin.
fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origin = config.server.cors_allow_origin.as_deref()?;

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origin == "*" {
        return Some(layer.allow_origin(Any));
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(_) => {
            warn!(origin = %origin, "Ignoring invalid CORS_ALLOW_ORIGIN");
            None
        }
    }
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: SharedState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
