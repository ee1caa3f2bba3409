//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All completions MUST go through this module, usually via the
//! [`CompletionClient`] trait so callers can be exercised with fakes.
//!
//! Retry policy: transport failures (connect, timeout, reset) are retried up to
//! `MAX_ATTEMPTS` total, and so is a response body that times out mid-read.
//! Any HTTP response that arrives in full, including 4xx/5xx, is terminal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;

pub mod prompts;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not set")]
    MissingApiKey,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no choices in response")]
    EmptyChoices,
}

/// Anything that can turn a prompt into completion text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    retry_delay: Duration,
}

impl LlmClient {
    pub fn new(config: &AiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(LlmError::Client)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            retry_delay: RETRY_DELAY,
        })
    }

    /// Overrides the fixed pause between transport retries.
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Replaces the HTTP client with one using a shorter request timeout.
    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Client)?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat request and returns the first choice's text verbatim.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut attempt = 0;
        let (status, body) = loop {
            attempt += 1;

            let sent = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let failure = match sent {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(body) => break (status, body),
                        // A body that stalls past the timeout is a transport failure.
                        Err(e) if e.is_timeout() => e,
                        Err(e) => return Err(LlmError::Body(e)),
                    }
                }
                Err(e) => e,
            };

            if attempt >= MAX_ATTEMPTS {
                return Err(LlmError::Transport {
                    attempts: attempt,
                    source: failure,
                });
            }
            warn!(
                "Completion attempt {}/{} failed: {}, retrying after {}ms...",
                attempt,
                MAX_ATTEMPTS,
                failure,
                self.retry_delay.as_millis()
            );
            tokio::time::sleep(self.retry_delay).await;
        };

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyChoices)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        LlmClient::complete(self, prompt).await
    }
}
