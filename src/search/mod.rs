//! Web search for inspiration links.
//!
//! Optional integration with the SerpHouse live SERP API. Search is a
//! best-effort feature: a missing key or any provider failure yields an
//! empty list instead of an error.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{RequestConfig, SearchConfig};
use crate::error::{SearchError, SearchResult};
use crate::schema::InspirationItem;

/// Maximum number of items returned per query
pub const MAX_ITEMS: usize = 10;

/// Client for the SerpHouse live search endpoint
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SerpRequest<'a> {
    data: SerpQuery<'a>,
}

#[derive(Debug, Serialize)]
struct SerpQuery<'a> {
    q: &'a str,
    domain: &'static str,
    lang: &'static str,
    device: &'static str,
    serp_type: &'static str,
    page: &'static str,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(config: &SearchConfig, request_config: &RequestConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search the web, degrading to an empty list on any failure
    pub async fn search(&self, query: &str) -> Vec<InspirationItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(items) => {
                info!(query = %query, items = items.len(), "Inspiration search completed");
                items
            }
            Err(SearchError::NotConfigured) => {
                debug!("Inspiration search skipped: SERPHOUSE_API_KEY not set");
                Vec::new()
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Inspiration search failed");
                Vec::new()
            }
        }
    }

    /// Search the web, surfacing provider errors
    pub async fn try_search(&self, query: &str) -> SearchResult<Vec<InspirationItem>> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::NotConfigured)?;

        let body = SerpRequest {
            data: SerpQuery {
                q: query,
                domain: "google.com",
                lang: "en",
                device: "desktop",
                serp_type: "web",
                page: "1",
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(parse_organic_results(&value))
    }
}

/// Map `results.results.organic[]` into inspiration items.
///
/// Entries without a title or link are skipped; a missing snippet becomes
/// an empty string.
pub fn parse_organic_results(value: &Value) -> Vec<InspirationItem> {
    value
        .pointer("/results/results/organic")
        .and_then(Value::as_array)
        .map(|organic| {
            organic
                .iter()
                .filter_map(|entry| {
                    let title = entry.get("title")?.as_str()?;
                    let link = entry.get("link")?.as_str()?;
                    let snippet = entry
                        .get("snippet")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    Some(InspirationItem {
                        title: title.to_string(),
                        link: link.to_string(),
                        snippet: snippet.to_string(),
                    })
                })
                .take(MAX_ITEMS)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_organic_results() {
        let value = json!({
            "status": "success",
            "results": {
                "results": {
                    "organic": [
                        {"position": 1, "title": "Mind maps", "link": "https://a.example", "snippet": "How to"},
                        {"position": 2, "title": "No link"},
                        {"position": 3, "title": "No snippet", "link": "https://b.example"}
                    ]
                }
            }
        });

        let items = parse_organic_results(&value);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Mind maps");
        assert_eq!(items[0].snippet, "How to");
        assert_eq!(items[1].link, "https://b.example");
        assert_eq!(items[1].snippet, "");
    }

    #[test]
    fn test_parse_organic_results_caps_items() {
        let organic: Vec<Value> = (0..20)
            .map(|i| json!({"title": format!("t{}", i), "link": "https://x", "snippet": ""}))
            .collect();
        let value = json!({"results": {"results": {"organic": organic}}});
        assert_eq!(parse_organic_results(&value).len(), MAX_ITEMS);
    }

    #[test]
    fn test_parse_unexpected_shape() {
        assert!(parse_organic_results(&json!({"error": "quota"})).is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_search_is_empty() {
        let client =
            SearchClient::new(&SearchConfig::default(), &RequestConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert!(client.search("mind maps").await.is_empty());
        assert!(matches!(
            client.try_search("mind maps").await,
            Err(SearchError::NotConfigured)
        ));
    }
}
