use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, Message};
use crate::config::{ModelConfig, RequestConfig};
use crate::error::{CompletionError, CompletionResult};

/// Sampling temperature sent with every request
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Raw text-generation capability behind the structured client.
///
/// Implemented by [`ChatClient`] for real providers and by stubs in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send a conversation and return the assistant's reply text.
    async fn chat(&self, messages: Vec<Message>) -> CompletionResult<String>;
}

/// Client for OpenAI-compatible chat-completion endpoints
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    request_config: RequestConfig,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: &ModelConfig, request_config: RequestConfig) -> CompletionResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(CompletionError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model_name.clone(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> CompletionResult<ChatCompletionResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling chat completion endpoint"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            debug!(status = status.as_u16(), detail = %detail, "Provider returned error body");

            let message = format!("HTTP {}", status.as_u16());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CompletionError::Unauthenticated { message }
                }
                _ => CompletionError::ProviderUnavailable { message },
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    CompletionError::ProviderUnavailable {
                        message: format!("Failed to parse provider response: {}", e),
                    }
                }
            })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                timeout_ms: self.request_config.timeout_ms,
            }
        } else {
            CompletionError::ProviderUnavailable {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn chat(&self, messages: Vec<Message>) -> CompletionResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::Unauthenticated {
                message: "MODEL_SCOPE_API_KEY is not set".to_string(),
            })?;

        let request = ChatCompletionRequest::new(&self.model, messages)
            .with_temperature(DEFAULT_TEMPERATURE)
            .with_json_output();

        let start = Instant::now();

        match self.execute_request(api_key, &request).await {
            Ok(response) => {
                let content = response
                    .first_content()
                    .map(str::to_string)
                    .ok_or_else(|| CompletionError::ProviderUnavailable {
                        message: "No choices in response".to_string(),
                    })?;

                info!(
                    model = %self.model,
                    latency_ms = start.elapsed().as_millis(),
                    total_tokens = ?response.usage.as_ref().and_then(|u| u.total_tokens),
                    "Chat completion succeeded"
                );
                Ok(content)
            }
            Err(e) => {
                error!(
                    model = %self.model,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Chat completion failed"
                );
                Err(e)
            }
        }
    }
}
