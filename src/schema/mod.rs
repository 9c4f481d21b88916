//! Output contracts for structured completions.
//!
//! Every value the model must return implements [`StructuredOutput`]: a JSON
//! Schema whose `description` strings are sent to the model as guidance, and
//! a `validate` pass for invariants serde cannot express. [`parse_structured`]
//! turns raw completion text into a checked value.

mod types;

pub use types::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A result type the model is asked to produce.
pub trait StructuredOutput: DeserializeOwned + Serialize + Send + 'static {
    /// Short name used in prompts and logs.
    const NAME: &'static str;

    /// JSON Schema describing the expected object, including per-field guidance.
    fn schema() -> serde_json::Value;

    /// Check invariants beyond field presence and types.
    fn validate(&self) -> Result<(), String>;
}

/// Parse and validate a raw completion into `T`.
///
/// The returned error message is meant to be fed back to the model on retry,
/// so it names the offending field where possible.
pub fn parse_structured<T: StructuredOutput>(completion: &str) -> Result<T, String> {
    let json = extract_json_from_completion(completion)?;
    let value: T = serde_json::from_str(json)
        .map_err(|e| format!("Response is not a valid {}: {}", T::NAME, e))?;
    value.validate()?;
    Ok(value)
}

/// Extract JSON from a completion string, handling markdown code blocks.
///
/// Attempts extraction in this order:
/// 1. Raw JSON object or array
/// 2. ```json ... ``` code blocks
/// 3. ``` ... ``` code blocks
pub fn extract_json_from_completion(completion: &str) -> Result<&str, String> {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    if completion.contains("```json") {
        return completion
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ```json block but content was empty or malformed".to_string());
    }

    if completion.contains("```") {
        return completion
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ``` block but content was empty or malformed".to_string());
    }

    Err(format!(
        "No JSON found in response. First 100 chars: '{}'",
        completion.chars().take(100).collect::<String>()
    ))
}

/// Whether `id` is a lowercase snake_case token such as `user_research` or `step_2`.
pub fn is_snake_case_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('_')
        && !id.ends_with('_')
        && !id.contains("__")
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
