use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};

use super::{is_snake_case_id, StructuredOutput};

/// Caller-supplied mind-map snapshot keyed by node id.
///
/// A `BTreeMap` keeps serialization order stable, so identical snapshots
/// always render identical prompts.
pub type Mindmap = BTreeMap<String, MindmapNode>;

/// Minimum number of keywords or suggestions the model must return.
pub const MIN_ITEMS: usize = 3;
/// Maximum number of keywords or suggestions the model must return.
pub const MAX_ITEMS: usize = 5;

/// A single labeled node in the mind-map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmapNode {
    /// Unique snake_case identifier
    pub id: String,
    /// Display label, any script
    pub text: String,
    /// Ordered child node ids
    #[serde(default)]
    pub children: Vec<String>,
}

impl MindmapNode {
    /// Create a leaf node
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Set the ordered child ids
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Unique node identifier in English snake_case. Reuse the existing id to overwrite a node; use a new id to add one."
                },
                "text": {
                    "type": "string",
                    "description": "Text displayed on the node, in the response language."
                },
                "children": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Ordered list of child node ids."
                }
            },
            "required": ["id", "text", "children"]
        })
    }

    fn check(&self, field: &str) -> Result<(), String> {
        if !is_snake_case_id(&self.id) {
            return Err(format!(
                "{}.id '{}' must be a lowercase snake_case token",
                field, self.id
            ));
        }
        if self.text.trim().is_empty() {
            return Err(format!("{}.text for node '{}' cannot be empty", field, self.id));
        }
        Ok(())
    }
}

/// Changes the model proposes for a mind-map.
///
/// Only changed or added nodes are listed; the caller merges them into its
/// own store with same-id entries overwriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmapUpdateResult {
    pub summary: String,
    pub updated_nodes: Vec<MindmapNode>,
}

impl MindmapUpdateResult {
    /// Child ids that resolve neither to the snapshot nor to an updated node.
    pub fn dangling_children(&self, snapshot: &Mindmap) -> Vec<String> {
        let returned: HashSet<&str> = self.updated_nodes.iter().map(|n| n.id.as_str()).collect();
        self.updated_nodes
            .iter()
            .flat_map(|n| n.children.iter())
            .filter(|c| !snapshot.contains_key(c.as_str()) && !returned.contains(c.as_str()))
            .cloned()
            .collect()
    }
}

impl StructuredOutput for MindmapUpdateResult {
    const NAME: &'static str = "MindmapUpdateResult";

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Short natural-language summary of what this update changed."
                },
                "updated_nodes": {
                    "type": "array",
                    "items": MindmapNode::schema(),
                    "description": "Nodes that changed or were added in this update. Unchanged nodes must be omitted."
                }
            },
            "required": ["summary", "updated_nodes"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for node in &self.updated_nodes {
            node.check("updated_nodes")?;
            if !seen.insert(node.id.as_str()) {
                return Err(format!("updated_nodes contains duplicate id '{}'", node.id));
            }
        }
        Ok(())
    }
}

/// Condensed form of a free-text thought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtAnalysisResult {
    pub summary: String,
    pub keywords: Vec<String>,
}

impl StructuredOutput for ThoughtAnalysisResult {
    const NAME: &'static str = "ThoughtAnalysisResult";

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "A concise summary of the user's input/thought."
                },
                "keywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": MIN_ITEMS,
                    "maxItems": MAX_ITEMS,
                    "description": "A list of 3-5 keywords extracted from the input."
                }
            },
            "required": ["summary", "keywords"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.summary.trim().is_empty() {
            return Err("summary cannot be empty".to_string());
        }
        check_count("keywords", self.keywords.len())?;
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("keywords cannot contain empty strings".to_string());
        }
        Ok(())
    }
}

/// A single idea the user has not explored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspirationSuggestion {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub node_id: String,
    pub parent_node_id: String,
}

/// Suggestions returned by the inspiration recommender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspirationRecommendResult {
    pub suggestions: Vec<InspirationSuggestion>,
}

impl InspirationRecommendResult {
    /// Check suggestions against the snapshot they were generated for.
    ///
    /// A `node_id` may not reuse an existing id, and a `parent_node_id` must
    /// name an existing node. The parent check is skipped for an empty
    /// snapshot since there is nothing to attach to.
    pub fn check_references(&self, snapshot: &Mindmap) -> Result<(), String> {
        for s in &self.suggestions {
            if snapshot.contains_key(&s.node_id) {
                return Err(format!(
                    "node_id '{}' already exists in the mind-map; choose a new id",
                    s.node_id
                ));
            }
            if !snapshot.is_empty() && !snapshot.contains_key(&s.parent_node_id) {
                return Err(format!(
                    "parent_node_id '{}' does not exist in the mind-map",
                    s.parent_node_id
                ));
            }
        }
        Ok(())
    }
}

impl StructuredOutput for InspirationRecommendResult {
    const NAME: &'static str = "InspirationRecommendResult";

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "suggestions": {
                    "type": "array",
                    "minItems": MIN_ITEMS,
                    "maxItems": MAX_ITEMS,
                    "description": "Recommended inspirations, 3-5 items.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Inspiration title, a short summary."
                            },
                            "description": {
                                "type": "string",
                                "description": "What the inspiration is and why it is valuable."
                            },
                            "reason": {
                                "type": "string",
                                "description": "Why this inspiration is relevant to the current topic."
                            },
                            "node_id": {
                                "type": "string",
                                "description": "Mind-map node id for this inspiration, English snake_case, unique and different from every existing node id."
                            },
                            "parent_node_id": {
                                "type": "string",
                                "description": "Id of the existing mind-map node this inspiration should be attached under. Must already exist in the current mind-map."
                            }
                        },
                        "required": ["title", "description", "reason", "node_id", "parent_node_id"]
                    }
                }
            },
            "required": ["suggestions"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        check_count("suggestions", self.suggestions.len())?;
        let mut seen = HashSet::new();
        for (i, s) in self.suggestions.iter().enumerate() {
            for (name, value) in [
                ("title", &s.title),
                ("description", &s.description),
                ("reason", &s.reason),
                ("parent_node_id", &s.parent_node_id),
            ] {
                if value.trim().is_empty() {
                    return Err(format!("suggestions[{}].{} cannot be empty", i, name));
                }
            }
            if !is_snake_case_id(&s.node_id) {
                return Err(format!(
                    "suggestions[{}].node_id '{}' must be a lowercase snake_case token",
                    i, s.node_id
                ));
            }
            if !seen.insert(s.node_id.as_str()) {
                return Err(format!("suggestions contain duplicate node_id '{}'", s.node_id));
            }
        }
        Ok(())
    }
}

/// A web search hit shown as inspiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspirationItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Response body of the web inspiration search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspirationSearchResult {
    pub items: Vec<InspirationItem>,
}

fn check_count(field: &str, len: usize) -> Result<(), String> {
    if !(MIN_ITEMS..=MAX_ITEMS).contains(&len) {
        return Err(format!(
            "{} must contain between {} and {} items, got {}",
            field, MIN_ITEMS, MAX_ITEMS, len
        ));
    }
    Ok(())
}
