use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::{null_as_default, validate_snapshot};
use crate::error::{AppResult, ToolError};
use crate::llm::StructuredClient;
use crate::prompts::{build_mindmap_update_prompt, excerpt, MINDMAP_UPDATE_PROMPT};
use crate::schema::{Mindmap, MindmapUpdateResult};

/// Input parameters for a mind-map update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindmapUpdateParams {
    /// Input history, oldest first; the last entry is the current input
    pub messages: Vec<String>,
    /// Current mind-map snapshot
    #[serde(default, deserialize_with = "null_as_default")]
    pub mindmap: Mindmap,
}

impl MindmapUpdateParams {
    /// Create params from the input history
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            mindmap: Mindmap::new(),
        }
    }

    /// Set the mind-map snapshot
    pub fn with_mindmap(mut self, mindmap: Mindmap) -> Self {
        self.mindmap = mindmap;
        self
    }
}

/// Mind-map update agent
#[derive(Clone)]
pub struct MindmapAgent {
    client: StructuredClient,
}

impl MindmapAgent {
    /// Create a new mind-map agent
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// Process an update request, splitting `messages` into history and current input.
    pub async fn process(&self, params: MindmapUpdateParams) -> AppResult<MindmapUpdateResult> {
        let Some((current_input, history_inputs)) = params.messages.split_last() else {
            return Err(ToolError::validation("messages", "Messages cannot be empty").into());
        };

        self.update(current_input, history_inputs, &params.mindmap)
            .await
    }

    /// Ask the model how the mind-map should change given the new input.
    ///
    /// The result lists only changed or added nodes. Child references are
    /// not enforced; dangling ones are logged and passed through.
    pub async fn update(
        &self,
        current_input: &str,
        history_inputs: &[String],
        mindmap: &Mindmap,
    ) -> AppResult<MindmapUpdateResult> {
        let start = Instant::now();

        if current_input.trim().is_empty() {
            return Err(ToolError::validation("messages", "Current input cannot be empty").into());
        }
        validate_snapshot(mindmap)?;

        let prompt = build_mindmap_update_prompt(current_input, history_inputs, mindmap);
        debug!(
            nodes = mindmap.len(),
            history = history_inputs.len(),
            prompt = %prompt,
            "Mindmap update prompt"
        );

        let result: MindmapUpdateResult = match self
            .client
            .complete(MINDMAP_UPDATE_PROMPT, &prompt)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(
                    error = %e,
                    prompt = %excerpt(&prompt),
                    "Error updating mindmap"
                );
                return Err(e.into());
            }
        };

        let dangling = result.dangling_children(mindmap);
        if !dangling.is_empty() {
            warn!(
                dangling = ?dangling,
                "Mindmap update references children that are not in the snapshot"
            );
        }

        info!(
            updated_nodes = result.updated_nodes.len(),
            latency_ms = start.elapsed().as_millis(),
            summary = %result.summary,
            "Mindmap update completed"
        );

        Ok(result)
    }
}
