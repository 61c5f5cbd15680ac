//! OpenAI-compatible chat-completions client
//!
//! This module implements [`CompletionGateway`] against a hosted inference
//! endpoint that speaks the `/chat/completions` protocol with bearer-token
//! authentication (for example GitHub Models on Azure AI inference).

use crate::config::ProviderConfig;
use crate::error::{Result, TutorError};
use crate::providers::{
    CompletionGateway, CompletionRequest, CompletionResponse, Message, TokenUsage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted inference API client
///
/// # Examples
///
/// ```no_run
/// use tutorchat::config::ProviderConfig;
/// use tutorchat::providers::{CompletionGateway, CompletionRequest, InferenceProvider, Message};
///
/// # async fn example() -> tutorchat::error::Result<()> {
/// let config = ProviderConfig {
///     api_key: Some("token".to_string()),
///     ..Default::default()
/// };
/// let provider = InferenceProvider::new(config)?;
/// let request = CompletionRequest::new("gpt-4o", vec![Message::user("What is a prime?")]);
/// let completion = provider.complete(&request).await?;
/// println!("{}", completion.content);
/// # Ok(())
/// # }
/// ```
pub struct InferenceProvider {
    client: Client,
    api_base: String,
    api_key: String,
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// Response body from the chat-completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

/// Choice in a chat-completions response
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Message inside a choice; content may be null for filtered output
#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token usage block
#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

fn format_api_error(status: reqwest::StatusCode, body: &str) -> TutorError {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        TutorError::Authentication(format!(
            "Inference endpoint returned {}: {}. Check TUTORCHAT_API_KEY / GITHUB_TOKEN",
            status, body
        ))
    } else {
        TutorError::Gateway(format!("Inference endpoint returned {}: {}", status, body))
    }
}

impl InferenceProvider {
    /// Create a new client from provider configuration
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or the HTTP client cannot
    /// be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TutorError::MissingCredentials("set TUTORCHAT_API_KEY or GITHUB_TOKEN".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("tutorchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TutorError::Gateway(format!("Failed to create HTTP client: {}", e)))?;

        let api_base = config.api_base().trim_end_matches('/').to_string();
        tracing::info!(
            "Initialized inference client: base={}, model={}",
            api_base,
            config.model
        );

        Ok(Self {
            client,
            api_base,
            api_key,
        })
    }

    /// Base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl CompletionGateway for InferenceProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
            top_p: request.params.top_p,
            stream: false,
        };

        tracing::debug!(
            "Sending completion request: model={}, {} messages",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                TutorError::Gateway(format!("Completion request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Inference endpoint returned error {}: {}", status, error_text);
            return Err(format_api_error(status, &error_text).into());
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            TutorError::Gateway(format!("Failed to parse completion response: {}", e))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TutorError::Gateway("No choices in completion response".to_string()))?;

        let content = choice
            .message
            .content
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                TutorError::Gateway(format!(
                    "Completion response had no content (finish_reason={})",
                    choice.finish_reason.as_deref().unwrap_or("unknown")
                ))
            })?;

        Ok(match parsed.usage {
            Some(usage) => {
                tracing::debug!(
                    "Completion usage: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
                CompletionResponse::with_usage(
                    content,
                    TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
                )
            }
            None => CompletionResponse::new(content),
        })
    }

    fn name(&self) -> &str {
        "inference"
    }
}
