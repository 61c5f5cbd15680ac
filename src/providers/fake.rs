//! Scripted in-process gateway for tests and offline runs
//!
//! [`FakeGateway`] returns queued replies in order and records every request
//! it receives, so handler and HTTP tests can run without a network.

use crate::error::{Result, TutorError};
use crate::providers::{CompletionGateway, CompletionRequest, CompletionResponse};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Successful completion with this raw text
    Text(String),
    /// Failure carrying this message
    Failure(String),
}

/// Gateway that replays scripted replies
///
/// When the script runs out, the fallback reply (if any) is repeated;
/// otherwise the call fails.
///
/// # Examples
///
/// ```
/// use tutorchat::providers::fake::FakeGateway;
/// use tutorchat::providers::{CompletionGateway, CompletionRequest, Message};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let gateway = FakeGateway::new().with_text("**Answer**");
///     let request = CompletionRequest::new("test", vec![Message::user("q?")]);
///     let reply = gateway.complete(&request).await.unwrap();
///     assert_eq!(reply.content, "**Answer**");
///     assert_eq!(gateway.requests().len(), 1);
/// });
/// ```
#[derive(Debug, Default)]
pub struct FakeGateway {
    script: Mutex<VecDeque<FakeReply>>,
    fallback: Option<FakeReply>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeGateway {
    /// Create a gateway with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(FakeReply::Text(text.into()));
        self
    }

    /// Queue a failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(FakeReply::Failure(message.into()));
        self
    }

    /// Reply used once the script is exhausted
    pub fn with_fallback(mut self, reply: FakeReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    fn push(&self, reply: FakeReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionGateway for FakeGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .script
            .lock()
            .map_err(|_| TutorError::Gateway("fake gateway script poisoned".to_string()))?
            .pop_front()
            .or_else(|| self.fallback.clone());

        match next {
            Some(FakeReply::Text(text)) => Ok(CompletionResponse::new(text)),
            Some(FakeReply::Failure(message)) => Err(TutorError::Gateway(message).into()),
            None => Err(TutorError::Gateway("fake gateway has no scripted reply".to_string()).into()),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;

    fn request() -> CompletionRequest {
        CompletionRequest::new("test-model", vec![Message::user("q?")])
    }

    #[tokio::test]
    async fn test_replies_in_order() {
        let gateway = FakeGateway::new().with_text("one").with_failure("boom");

        assert_eq!(gateway.complete(&request()).await.unwrap().content, "one");
        let err = gateway.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let gateway = FakeGateway::new();
        assert!(gateway.complete(&request()).await.is_err());
    }

    #[tokio::test]
    async fn test_fallback_repeats() {
        let gateway = FakeGateway::new().with_fallback(FakeReply::Text("again".to_string()));
        for _ in 0..3 {
            assert_eq!(gateway.complete(&request()).await.unwrap().content, "again");
        }
    }

    #[tokio::test]
    async fn test_records_requests() {
        let gateway = FakeGateway::new().with_text("ok");
        gateway.complete(&request()).await.unwrap();
        let recorded = gateway.requests();
        assert_eq!(recorded[0].model, "test-model");
        assert_eq!(recorded[0].messages[0].content, "q?");
    }
}
