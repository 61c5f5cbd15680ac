//! Conversation turns and the per-session conversation log

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// The person using the chat
    #[serde(rename = "user")]
    User,
    /// The tutor (model reply, rejection or error notice)
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "ai"),
        }
    }
}

/// One message in the conversation
///
/// Turns are immutable once created. Assistant turns hold presentation
/// markup (see [`crate::chat::formatter::to_display`]), not raw model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    sender: Sender,
    text: String,
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn from already-formatted text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }

    /// Sender of this turn
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Text of this turn
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, append-only log of turns for one session
///
/// # Examples
///
/// ```
/// use tutorchat::chat::{Conversation, Sender};
///
/// let mut conversation = Conversation::new();
/// conversation.push_user("What is gravity?");
/// conversation.push_assistant("A force.");
/// assert_eq!(conversation.len(), 2);
/// assert_eq!(conversation.turns()[1].sender(), Sender::Assistant);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Append an assistant turn
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// All turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent `n` turns, or all of them when there are fewer
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Last turn, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Text of the final turn when it was sent by the user
    pub fn last_user_text(&self) -> Option<&str> {
        self.last()
            .filter(|turn| turn.sender() == Sender::User)
            .map(Turn::text)
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the conversation has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl FromIterator<Turn> for Conversation {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}
