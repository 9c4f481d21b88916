use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info};

use super::{null_as_default, validate_snapshot};
use crate::error::{AppResult, ToolError};
use crate::llm::StructuredClient;
use crate::prompts::{build_inspiration_prompt, excerpt, INSPIRATION_PROMPT};
use crate::schema::{InspirationRecommendResult, Mindmap};

/// Input parameters for inspiration recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspirationParams {
    /// Input history, oldest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<String>,
    /// Current mind-map snapshot
    #[serde(default, deserialize_with = "null_as_default")]
    pub mindmap: Mindmap,
}

/// Inspiration recommendation agent
#[derive(Clone)]
pub struct InspirationAgent {
    client: StructuredClient,
}

impl InspirationAgent {
    /// Create a new inspiration agent
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// Recommend 3-5 new branches for the mind-map.
    ///
    /// Suggestions that reuse an existing node id or attach to a missing
    /// parent are rejected and retried like any other schema violation.
    /// Callers should still re-check them before merging.
    pub async fn recommend(
        &self,
        messages: &[String],
        mindmap: &Mindmap,
    ) -> AppResult<InspirationRecommendResult> {
        let start = Instant::now();

        if messages.iter().all(|m| m.trim().is_empty()) && mindmap.is_empty() {
            return Err(ToolError::validation(
                "messages",
                "Messages and mindmap cannot both be empty",
            )
            .into());
        }
        validate_snapshot(mindmap)?;

        let prompt = build_inspiration_prompt(messages, mindmap);
        debug!(prompt = %prompt, "Inspiration recommend prompt");

        let result = self
            .client
            .complete_with(
                INSPIRATION_PROMPT,
                &prompt,
                |r: &InspirationRecommendResult| r.check_references(mindmap),
            )
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    prompt = %excerpt(&prompt),
                    "Error recommending inspirations"
                );
                e
            })?;

        info!(
            suggestions = result.suggestions.len(),
            latency_ms = start.elapsed().as_millis(),
            "Inspiration recommendation completed"
        );

        Ok(result)
    }

    /// Process a recommendation request
    pub async fn process(
        &self,
        params: InspirationParams,
    ) -> AppResult<InspirationRecommendResult> {
        self.recommend(&params.messages, &params.mindmap).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_defaults() {
        let params: InspirationParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.messages.is_empty());
        assert!(params.mindmap.is_empty());

        let params: InspirationParams =
            serde_json::from_value(json!({"messages": null, "mindmap": null})).unwrap();
        assert!(params.messages.is_empty());
    }
}
