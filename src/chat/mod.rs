//! Conversation state and the chat request flow
//!
//! - `turn`: turns and the per-session conversation log
//! - `topic_filter`: keyword/question gate for in-scope input
//! - `formatter`: emphasis markup to display markup and back
//! - `handler`: the request handler tying them to the gateway and store

pub mod formatter;
pub mod handler;
pub mod topic_filter;
pub mod turn;

pub use handler::{ChatService, ChatSettings, Outcome, REJECTION_MESSAGE};
pub use topic_filter::is_in_scope;
pub use turn::{Conversation, Sender, Turn};
