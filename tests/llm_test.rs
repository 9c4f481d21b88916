//! Integration tests for the chat and structured completion clients
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use mindmap_assistant::config::{ModelConfig, RequestConfig};
use mindmap_assistant::error::CompletionError;
use mindmap_assistant::llm::{ChatClient, ChatCompletion, Message, StructuredClient};
use mindmap_assistant::schema::ThoughtAnalysisResult;

/// Create a test client pointing to mock server
fn create_test_client(base_url: &str, max_retries: u32) -> ChatClient {
    let config = ModelConfig {
        api_key: Some("test-api-key".to_string()),
        base_url: base_url.to_string(),
        model_name: "test-model".to_string(),
        response_language: "English".to_string(),
    };

    let request_config = RequestConfig {
        timeout_ms: 5000,
        max_retries,
        retry_delay_ms: 1,
    };

    ChatClient::new(&config, request_config).expect("Failed to create client")
}

fn create_structured_client(base_url: &str, max_retries: u32) -> StructuredClient {
    let chat = create_test_client(base_url, max_retries);
    StructuredClient::new(
        Arc::new(chat),
        RequestConfig {
            timeout_ms: 5000,
            max_retries,
            retry_delay_ms: 1,
        },
        "English",
    )
}

/// OpenAI-style completion envelope around `content`
fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
    })
}

#[cfg(test)]
mod chat_client_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_chat_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "stream": false,
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hello")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.chat(vec![Message::user("hi")]).await;

        assert_eq!(result.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_unauthenticated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid API key", "type": "authentication_error"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.chat(vec![Message::user("hi")]).await;

        assert!(matches!(
            result,
            Err(CompletionError::Unauthenticated { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_provider_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.chat(vec![Message::user("hi")]).await;

        match result {
            Err(CompletionError::ProviderUnavailable { message }) => {
                assert_eq!(message, "HTTP 503");
            }
            other => panic!("expected ProviderUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.chat(vec![Message::user("hi")]).await;

        assert!(matches!(
            result,
            Err(CompletionError::ProviderUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri(), 0);
        let result = client.chat(vec![Message::user("hi")]).await;

        assert!(matches!(
            result,
            Err(CompletionError::ProviderUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late"))
                    .set_delay(Duration::from_secs(10)), // Longer than timeout
            )
            .mount(&mock_server)
            .await;

        let config = ModelConfig {
            api_key: Some("test-api-key".to_string()),
            base_url: mock_server.uri(),
            ..ModelConfig::default()
        };
        let request_config = RequestConfig {
            timeout_ms: 100,
            max_retries: 0,
            retry_delay_ms: 1,
        };
        let client = ChatClient::new(&config, request_config).unwrap();

        let result = client.chat(vec![Message::user("hi")]).await;
        assert!(matches!(
            result,
            Err(CompletionError::Timeout { timeout_ms: 100 })
        ));
    }
}

#[cfg(test)]
mod structured_client_tests {
    use super::*;

    #[tokio::test]
    async fn test_structured_completion_from_code_block() {
        let mock_server = MockServer::start().await;

        let content = "```json\n{\"summary\": \"Plan a trip\", \"keywords\": [\"travel\", \"budget\", \"itinerary\"]}\n```";
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_structured_client(&mock_server.uri(), 2);
        let result: ThoughtAnalysisResult = client
            .complete("You summarize thoughts.", "I want to plan a trip")
            .await
            .expect("structured completion should succeed");

        assert_eq!(result.summary, "Plan a trip");
        assert_eq!(result.keywords, vec!["travel", "budget", "itinerary"]);
    }

    #[tokio::test]
    async fn test_malformed_output_raises_schema_violation() {
        let mock_server = MockServer::start().await;

        // One initial attempt plus two retries, then give up
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("Sure! Here are some thoughts...")),
            )
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = create_structured_client(&mock_server.uri(), 2);
        let result = client
            .complete::<ThoughtAnalysisResult>("system", "I want to plan a trip")
            .await;

        match result {
            Err(CompletionError::SchemaViolation { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_structured_client(&mock_server.uri(), 3);
        let result = client
            .complete::<ThoughtAnalysisResult>("system", "I want to plan a trip")
            .await;

        assert!(matches!(
            result,
            Err(CompletionError::ProviderUnavailable { .. })
        ));
    }
}
