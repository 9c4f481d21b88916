//! Use-case agents.
//!
//! Each agent composes a prompt builder, the [`StructuredClient`], and
//! domain checks:
//! - [`MindmapAgent`]: grow and restructure a caller-supplied mind-map
//! - [`ThoughtAgent`]: summarize free text into a thought with keywords
//! - [`InspirationAgent`]: suggest new branches for the mind-map
//!
//! Agents hold no state between calls; every request carries the full
//! mind-map snapshot. Errors are logged with a prompt excerpt and returned
//! unchanged.
//!
//! [`StructuredClient`]: crate::llm::StructuredClient

mod inspiration;
mod mindmap;
mod thought;

pub use inspiration::*;
pub use mindmap::*;
pub use thought::*;

use serde::{Deserialize, Deserializer};

use crate::error::ToolError;
use crate::schema::{is_snake_case_id, Mindmap};

/// Check that every snapshot key matches the id of the node stored under it,
/// and that the id is a snake_case token the model is able to echo back.
pub fn validate_snapshot(mindmap: &Mindmap) -> Result<(), ToolError> {
    for (key, node) in mindmap {
        if key != &node.id {
            return Err(ToolError::validation(
                "mindmap",
                format!("key '{}' does not match node id '{}'", key, node.id),
            ));
        }
        if !is_snake_case_id(&node.id) {
            return Err(ToolError::validation(
                "mindmap",
                format!("node id '{}' must be a lowercase snake_case token", node.id),
            ));
        }
    }
    Ok(())
}

/// Deserialize `null` as the type's default, for optional request fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
