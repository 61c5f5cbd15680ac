//! Completion gateway trait and common request/response types
//!
//! This module defines the [`CompletionGateway`] trait that every model
//! backend implements, along with the role-tagged message type, the fixed
//! generation parameters, and the request/response structures exchanged with
//! the gateway.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for a completion request
///
/// Represents one role-tagged entry in the ordered message list sent to the
/// model. Roles are `system`, `user` and `assistant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::providers::Message;
    ///
    /// let msg = Message::user("What is gravity?");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::providers::Message;
    ///
    /// let msg = Message::assistant("Gravity is a force.");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::providers::Message;
    ///
    /// let msg = Message::system("You are a tutor");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request
///
/// These are fixed for the tutor and are not exposed as runtime
/// configuration; see [`GenerationParams::TUTOR`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens the model may generate
    pub max_tokens: u32,
    /// Nucleus sampling parameter
    pub top_p: f32,
}

impl GenerationParams {
    /// Parameters used for every tutor answer
    pub const TUTOR: GenerationParams = GenerationParams {
        temperature: 0.8,
        max_tokens: 1200,
        top_p: 1.0,
    };
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::TUTOR
    }
}

/// A fully assembled request for the completion gateway
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier to complete with
    pub model: String,
    /// Ordered, role-tagged messages
    pub messages: Vec<Message>,
    /// Sampling parameters
    pub params: GenerationParams,
}

impl CompletionRequest {
    /// Create a request using the fixed tutor generation parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::providers::{CompletionRequest, Message};
    ///
    /// let request = CompletionRequest::new("gpt-4o", vec![Message::user("Hi?")]);
    /// assert_eq!(request.params.max_tokens, 1200);
    /// ```
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            params: GenerationParams::TUTOR,
        }
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the remote endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Generated text with optional token usage
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Raw text generated by the model
    pub content: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse without usage data
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(content: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: content.into(),
            usage: Some(usage),
        }
    }
}

/// Gateway to a remote text-completion model
///
/// Implementations send the assembled message list to a model and return
/// the generated text. Failures of any kind (network, authentication, quota,
/// malformed response) are returned as `Err`; callers decide how to surface
/// them. Implementations must not retry on their own.
///
/// # Examples
///
/// ```no_run
/// use tutorchat::providers::{CompletionGateway, CompletionRequest, CompletionResponse};
/// use tutorchat::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoGateway;
///
/// #[async_trait]
/// impl CompletionGateway for EchoGateway {
///     async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
///         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(last))
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Complete the given request
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails or the response is unusable
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Short name used in log lines
    fn name(&self) -> &str {
        "gateway"
    }
}
