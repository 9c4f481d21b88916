//! Centralized prompt definitions for the mind-map agents
//!
//! System prompts set the role of the model for each use case; the builder
//! functions serialize caller state into the user prompt. All builders are
//! pure so prompts can be asserted on in tests.

use serde::Serialize;
use tracing::warn;

use crate::schema::{Mindmap, MindmapNode, MAX_ITEMS, MIN_ITEMS};

/// System prompt for the mind-map update agent.
pub const MINDMAP_UPDATE_PROMPT: &str = r#"You are a professional mind-map assistant. You update the user's mind-map from what they say, growing and restructuring it so it stays well organized with a clear hierarchy."#;

/// System prompt for the thought analysis agent.
pub const THOUGHT_ANALYSIS_PROMPT: &str = r#"You are an expert at distilling ideas. Your goal is to summarize the user's input into one concise idea summary and extract the relevant keywords or tags."#;

/// System prompt for the inspiration recommendation agent.
pub const INSPIRATION_PROMPT: &str = r#"You are a creative inspiration expert. Based on the user's current text input and mind-map structure, recommend 3 to 5 inspiring and original ideas. They must relate to the current topic but must not repeat anything the user already has. Good inspirations help the user widen their thinking, find new angles, or deepen existing ideas."#;

/// Marker used when a list section has no entries.
pub const NONE_MARKER: &str = "(none)";

/// Render the output contract appended to every system prompt.
///
/// The schema's `description` strings are the per-field guidance the model
/// relies on, so the schema is sent verbatim.
pub fn schema_instructions(name: &str, schema: &serde_json::Value, language: &str) -> String {
    let rendered = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
    format!(
        r#"Your response MUST be a single valid JSON object ({name}) matching this JSON Schema:
{rendered}

Rules:
- Output JSON only, with no surrounding text or markdown.
- Include every required field.
- Write all human-readable text in {language}; ids stay in English snake_case."#
    )
}

/// Build the user prompt for a mind-map update.
pub fn build_mindmap_update_prompt(
    current_input: &str,
    history_inputs: &[String],
    mindmap: &Mindmap,
) -> String {
    let mindmap_json = serialize_for_prompt(&nodes_of(mindmap), "mindmap");
    let history_json = serde_json::to_string(history_inputs).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Update the current mind-map based on the user's new input, using the current mind-map as the starting point.

How your answer is applied:
- Every node you return overwrites the existing node with the same id; nodes you do not return stay unchanged.
- Return only nodes that changed or were added. When you add a node, also return its parent with the updated children list.

Guidelines:
- Turn new concepts from the input into new nodes with new unique snake_case ids.
- You may rewrite node text, for example changing the root text to the central keyword.
- If a parent's text no longer covers the scope of its children, rewrite the parent.
- If nodes at the same depth differ in abstraction level, insert an intermediate parent node to restore a consistent hierarchy.
- Keep the structure reasonable and the levels clear.
- The input may contain errors or be incomplete (for example speech-to-text mistakes). You may infer and complete it, but inferences must be reasonable and must not change the user's intended meaning.

Current mind-map:
{mindmap_json}

User input history:
{history_json}

User current input:
{current_input}
"#
    )
}

/// Build the user prompt for a thought analysis.
pub fn build_thought_analysis_prompt(text: &str) -> String {
    format!("Please analyze the following input:\n{}", text)
}

/// Build the user prompt for inspiration recommendations.
pub fn build_inspiration_prompt(messages: &[String], mindmap: &Mindmap) -> String {
    let nodes = nodes_of(mindmap);
    let mindmap_json = serialize_for_prompt(&nodes, "mindmap");

    let existing_texts = if nodes.is_empty() {
        NONE_MARKER.to_string()
    } else {
        nodes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    let all_messages = if messages.is_empty() {
        NONE_MARKER.to_string()
    } else {
        messages
            .iter()
            .map(|m| format!("- {}", m))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Recommend {MIN_ITEMS} to {MAX_ITEMS} inspirations for the user based on the information below.

## User input history
{all_messages}

## Current mind-map structure
{mindmap_json}

## Existing content (must not be repeated)
{existing_texts}

## Requirements
1. Every inspiration must relate to the current topic.
2. Do not repeat anything already present in the user's input.
3. Do not repeat any node already present in the mind-map.
4. Each inspiration needs a clear title, a concrete description, and a reason for recommending it.
5. Inspirations should be thought-provoking and help the user look at the problem from a new angle.
6. Recommend {MIN_ITEMS} to {MAX_ITEMS} inspirations.
7. Each inspiration must have a node_id (English snake_case, not used by any existing node).
8. Each inspiration must have a parent_node_id naming the existing mind-map node it should be attached under; parent_node_id must be an id that already exists in the current mind-map.
"#
    )
}

/// First characters of a prompt, for error logs.
pub fn excerpt(prompt: &str) -> String {
    const MAX_CHARS: usize = 200;
    let mut out: String = prompt.chars().take(MAX_CHARS).collect();
    if prompt.chars().count() > MAX_CHARS {
        out.push_str("...");
    }
    out
}

fn nodes_of(mindmap: &Mindmap) -> Vec<&MindmapNode> {
    mindmap.values().collect()
}

/// Serialize a value as pretty JSON for a prompt, with warning on failure.
fn serialize_for_prompt<T: Serialize>(value: &T, context: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        warn!(
            error = %e,
            context = %context,
            "Failed to serialize value for prompt"
        );
        "[]".to_string()
    })
}
