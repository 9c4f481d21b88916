use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::client::ChatCompletion;
use super::types::Message;
use crate::config::RequestConfig;
use crate::error::{CompletionError, CompletionResult};
use crate::prompts::schema_instructions;
use crate::schema::{parse_structured, StructuredOutput};

/// Turns a prompt into a schema-conforming value.
///
/// The schema (with its per-field guidance) is appended to the system prompt.
/// Answers that do not parse or validate are sent back to the model with the
/// validation error, up to `max_retries` extra attempts with exponential
/// backoff. Transport failures are returned immediately.
#[derive(Clone)]
pub struct StructuredClient {
    chat: Arc<dyn ChatCompletion>,
    request_config: RequestConfig,
    language: String,
}

impl StructuredClient {
    /// Create a structured client over any chat backend
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        request_config: RequestConfig,
        language: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            request_config,
            language: language.into(),
        }
    }

    /// Total number of model calls allowed for one completion
    pub fn max_attempts(&self) -> u32 {
        self.request_config.max_retries.saturating_add(1)
    }

    /// Complete `prompt` into a validated `T`.
    pub async fn complete<T: StructuredOutput>(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> CompletionResult<T> {
        self.complete_with(system_prompt, prompt, |_: &T| Ok(())).await
    }

    /// Complete `prompt` into a validated `T` that also passes `check`.
    ///
    /// `check` failures count as schema violations and are retried like them.
    pub async fn complete_with<T, F>(
        &self,
        system_prompt: &str,
        prompt: &str,
        check: F,
    ) -> CompletionResult<T>
    where
        T: StructuredOutput,
        F: Fn(&T) -> Result<(), String> + Send + Sync,
    {
        if prompt.trim().is_empty() {
            return Err(CompletionError::EmptyPrompt);
        }

        let system = format!(
            "{}\n\n{}",
            system_prompt,
            schema_instructions(T::NAME, &T::schema(), &self.language)
        );
        let mut messages = vec![Message::system(system), Message::user(prompt)];

        let max_attempts = self.max_attempts();
        let mut attempts = 0;
        let mut last_error = String::new();

        while attempts < max_attempts {
            if attempts > 0 {
                let delay = self.backoff(attempts);
                warn!(
                    schema = T::NAME,
                    retry = attempts,
                    delay_ms = delay.as_millis(),
                    "Retrying structured completion"
                );
                tokio::time::sleep(delay).await;
            }
            attempts += 1;

            let completion = self.chat.chat(messages.clone()).await?;

            match parse_structured::<T>(&completion).and_then(|value| check(&value).map(|_| value))
            {
                Ok(value) => {
                    debug!(schema = T::NAME, attempts, "Structured completion accepted");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        schema = T::NAME,
                        attempt = attempts,
                        error = %e,
                        "Model output failed schema validation"
                    );
                    messages.push(Message::assistant(completion));
                    messages.push(Message::user(correction_prompt(&e)));
                    last_error = e;
                }
            }
        }

        Err(CompletionError::SchemaViolation {
            message: last_error,
            attempts,
        })
    }

    fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.request_config.retry_delay_ms.saturating_mul(factor))
    }
}

fn correction_prompt(error: &str) -> String {
    format!(
        "Your previous response was invalid: {}\nReply again with only a corrected JSON object that satisfies the schema.",
        error
    )
}
