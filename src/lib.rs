//! # Mindmap Assistant
//!
//! An HTTP backend that keeps a client's mind-map growing as the user talks,
//! by delegating to an OpenAI-compatible LLM for structured output.
//!
//! ## Features
//!
//! - **Mind-map Update**: turn new input into changed or added nodes
//! - **Thought Analysis**: summarize free text into 3-5 keywords
//! - **Inspiration Recommendation**: suggest new branches that do not repeat existing nodes
//! - **Inspiration Search**: optional web search for related links
//!
//! ## Architecture
//!
//! ```text
//! Client → axum handlers → agents → prompts + StructuredClient → LLM (HTTP)
//! ```
//!
//! The server is stateless: every request carries the full mind-map snapshot
//! and the caller merges `updated_nodes` into its own store.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mindmap_assistant::{AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::from_config(config)?);
//!     mindmap_assistant::server::serve(state).await
//! }
//! ```

#![warn(missing_docs)]

/// Use-case agents (mind-map update, thought analysis, inspiration).
pub mod agents;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// LLM provider client and structured completion.
pub mod llm;
/// Prompt templates and builders.
pub mod prompts;
/// Output schemas and validation for model responses.
pub mod schema;
/// Optional web search integration.
pub mod search;
/// HTTP server, routing, and handlers.
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
