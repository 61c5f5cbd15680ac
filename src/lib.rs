//! TutorChat - education-focused web chat library
//!
//! This library provides the pieces behind the TutorChat server: a topic
//! filter that keeps the tutor on education questions, per-session
//! conversation storage, prompt assembly, a completion gateway to a hosted
//! chat-completions endpoint, and the HTTP surface.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Turns, the topic filter, the formatter, and the request handler
//! - `prompts`: System prompt and per-request message assembly
//! - `providers`: Completion gateway abstraction and implementations
//! - `session`: Session identity and conversation storage
//! - `server`: Axum routes, session cookie handling, and page rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tutorchat::chat::{ChatService, ChatSettings};
//! use tutorchat::cli::Cli;
//! use tutorchat::providers::create_gateway;
//! use tutorchat::session::InMemorySessionStore;
//! use tutorchat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_args();
//!     let config = Config::load("config/config.yaml", &cli)?;
//!     config.validate()?;
//!
//!     let chat = Arc::new(ChatService::new(
//!         create_gateway(&config.provider)?,
//!         Arc::new(InMemorySessionStore::with_ttl_seconds(config.session.ttl_seconds)),
//!         ChatSettings::from_config(&config),
//!     ));
//!     tutorchat::server::serve(&config, chat).await
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use chat::{ChatService, ChatSettings, Conversation, Outcome, Sender, Turn};
pub use config::Config;
pub use error::{Result, TutorError};
pub use session::{InMemorySessionStore, SessionId, SessionStore};

#[cfg(test)]
pub mod test_utils;
