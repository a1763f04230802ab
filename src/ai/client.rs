//! Chat completion API client

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::error::CompletionError;
use super::prompts::{Message, PromptEnvelope};
use crate::config::AiConfig;

/// Anything that can turn a prompt envelope into completion text.
///
/// Implemented by [`CompletionClient`] for the real provider; tests script
/// their own implementations.
pub trait Completer: Send + Sync {
    fn complete(
        &self,
        envelope: PromptEnvelope,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [&'a Message; 2],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl CompletionClient {
    /// Create a client using the transport's default timeout.
    ///
    /// A missing key is sent as an empty bearer token; the provider's
    /// authentication error then comes back like any other upstream error.
    #[cfg(test)]
    pub fn new(endpoint: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.unwrap_or_default(),
            model,
        }
    }

    /// Create a client from the `[ai]` config section and a resolved key
    pub fn from_config(config: &AiConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        if api_key.is_none() {
            tracing::warn!("No API key configured; requests will be unauthenticated");
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.unwrap_or_default(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion request and return the first choice's text
    pub async fn complete(&self, envelope: PromptEnvelope) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: envelope.messages(),
            stream: false,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            system_len = envelope.system().content.len(),
            user_len = envelope.user().content.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_completion(status, &body)
    }
}

impl Completer for CompletionClient {
    fn complete(
        &self,
        envelope: PromptEnvelope,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        CompletionClient::complete(self, envelope)
    }
}

/// Interpret a provider response.
///
/// Non-success statuses use `error.message` from the body when present and
/// fall back to the status reason text.
pub(crate) fn parse_completion(status: StatusCode, body: &str) -> Result<String, CompletionError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_str().to_string())
            });
        return Err(CompletionError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let chat: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Malformed(format!("unexpected response body: {}", e)))?;

    chat.choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::Malformed("response contained no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| CompletionError::Malformed("first choice has no content".to_string()))
}
