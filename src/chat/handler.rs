//! Request handling for the tutor chat
//!
//! [`ChatService`] runs one submission through the topic filter, prompt
//! assembly, the completion gateway and the formatter, then persists the
//! updated conversation. Gateway failures are recovered here and stored as a
//! single assistant turn, so a submission only fails on infrastructure
//! errors (session storage).

use crate::chat::formatter::{escape_html, to_display};
use crate::chat::topic_filter::is_in_scope;
use crate::chat::Conversation;
use crate::error::Result;
use crate::prompts::build_messages_with_window;
use crate::providers::{CompletionGateway, CompletionRequest};
use crate::session::{SessionId, SessionLocks, SessionStore};

use std::sync::Arc;

/// Canned reply for out-of-scope input (before display formatting)
pub const REJECTION_MESSAGE: &str =
    "❌ Sorry, I can only assist with **education**, **knowledge**, or **questions**.";

/// How a submission was resolved
///
/// The stored conversation does not record this; it is returned so callers
/// can log or branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered
    Answered,
    /// The topic filter rejected the input; no model call was made
    Rejected,
    /// The model call failed and an error notice was stored
    Failed,
}

/// Settings for [`ChatService`]
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Model identifier sent with every request
    pub model: String,
    /// Replay only this many recent turns into the prompt
    pub max_history_turns: Option<usize>,
}

impl ChatSettings {
    /// Settings for `model` replaying the full history
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_history_turns: None,
        }
    }

    /// Build settings from loaded configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            model: config.provider.model.clone(),
            max_history_turns: config.session.max_history_turns,
        }
    }
}

/// Formats a gateway failure as a stored assistant turn
///
/// The failure text may carry an upstream response body, so it is escaped
/// before being placed next to the display markup.
pub fn error_notice(error: &anyhow::Error) -> String {
    format!("<strong>Error:</strong> {}", escape_html(&error.to_string()))
}

/// Orchestrates one chat exchange per submission
pub struct ChatService {
    gateway: Arc<dyn CompletionGateway>,
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
    settings: ChatSettings,
}

impl ChatService {
    /// Create a service from its collaborators
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tutorchat::chat::{ChatService, ChatSettings};
    /// use tutorchat::providers::FakeGateway;
    /// use tutorchat::session::InMemorySessionStore;
    ///
    /// let service = ChatService::new(
    ///     Arc::new(FakeGateway::new().with_text("**Hi**")),
    ///     Arc::new(InMemorySessionStore::new(None)),
    ///     ChatSettings::new("gpt-4o"),
    /// );
    /// assert_eq!(service.settings().model, "gpt-4o");
    /// ```
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        store: Arc<dyn SessionStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            locks: SessionLocks::new(),
            settings,
        }
    }

    /// Active settings
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Handle one user submission for a session
    ///
    /// Appends the user turn, then exactly one assistant turn (answer,
    /// rejection or error notice), and persists the result.
    ///
    /// # Errors
    ///
    /// Returns error only if the session store fails
    pub async fn submit(&self, session: &SessionId, user_input: &str) -> Result<Outcome> {
        let _guard = self.locks.acquire(session).await;

        let mut conversation = self.store.get(session).await?;
        conversation.push_user(user_input);
        tracing::debug!("Session {} received input: {:?}", session, user_input);

        let outcome = if is_in_scope(user_input) {
            self.answer(session, &mut conversation).await
        } else {
            tracing::info!("Session {}: input outside tutor scope, rejecting", session);
            conversation.push_assistant(to_display(REJECTION_MESSAGE));
            Outcome::Rejected
        };

        self.store.put(session, conversation).await?;
        Ok(outcome)
    }

    async fn answer(&self, session: &SessionId, conversation: &mut Conversation) -> Outcome {
        let result = match build_messages_with_window(conversation, self.settings.max_history_turns)
        {
            Ok(messages) => {
                let request = CompletionRequest::new(self.settings.model.clone(), messages);
                self.gateway.complete(&request).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                if let Some(usage) = response.usage {
                    tracing::info!(
                        "Session {}: answered via {} ({} tokens)",
                        session,
                        self.gateway.name(),
                        usage.total_tokens
                    );
                } else {
                    tracing::info!("Session {}: answered via {}", session, self.gateway.name());
                }
                conversation.push_assistant(to_display(&response.content));
                Outcome::Answered
            }
            Err(e) => {
                tracing::warn!("Session {}: completion failed: {}", session, e);
                conversation.push_assistant(error_notice(&e));
                Outcome::Failed
            }
        }
    }

    /// Current conversation for a session, without mutation
    ///
    /// # Errors
    ///
    /// Returns error if the session store fails
    pub async fn history(&self, session: &SessionId) -> Result<Conversation> {
        self.store.get(session).await
    }

    /// Reset a session's conversation to empty
    ///
    /// # Errors
    ///
    /// Returns error if the session store fails
    pub async fn clear(&self, session: &SessionId) -> Result<()> {
        let _guard = self.locks.acquire(session).await;
        self.store.remove(session).await?;
        tracing::info!("Session {}: conversation cleared", session);
        Ok(())
    }

    /// Drop expired sessions and idle lock entries
    ///
    /// # Errors
    ///
    /// Returns error if the session store fails
    pub async fn purge_expired(&self) -> Result<usize> {
        let purged = self.store.purge_expired().await?;
        self.locks.prune();
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }
}
