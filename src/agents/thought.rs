use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use crate::error::{AppResult, ToolError};
use crate::llm::StructuredClient;
use crate::prompts::{build_thought_analysis_prompt, excerpt, THOUGHT_ANALYSIS_PROMPT};
use crate::schema::ThoughtAnalysisResult;

/// Input parameters for thought analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtParams {
    /// Free text to analyze
    pub text: String,
}

/// Thought analysis agent
#[derive(Clone)]
pub struct ThoughtAgent {
    client: StructuredClient,
}

impl ThoughtAgent {
    /// Create a new thought agent
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// Summarize `text` and extract 3-5 keywords
    pub async fn analyze(&self, text: &str) -> AppResult<ThoughtAnalysisResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ToolError::validation("text", "Text cannot be empty").into());
        }

        let prompt = build_thought_analysis_prompt(text);

        let result: ThoughtAnalysisResult = self
            .client
            .complete(THOUGHT_ANALYSIS_PROMPT, &prompt)
            .await
            .map_err(|e| {
                error!(error = %e, prompt = %excerpt(&prompt), "Error analyzing thought");
                e
            })?;

        info!(
            keywords = ?result.keywords,
            latency_ms = start.elapsed().as_millis(),
            "Thought analysis completed"
        );

        Ok(result)
    }

    /// Process a thought analysis request
    pub async fn process(&self, params: ThoughtParams) -> AppResult<ThoughtAnalysisResult> {
        self.analyze(&params.text).await
    }
}
