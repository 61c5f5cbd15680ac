//! Error types for TutorChat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for TutorChat operations
///
/// Covers configuration loading, completion gateway calls, prompt assembly
/// and page rendering. Expected gateway failures are recovered by the chat
/// service and shown to the user as a conversation turn; everything else
/// propagates through [`Result`].
#[derive(Error, Debug)]
pub enum TutorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing API credential for the completion endpoint
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Completion gateway errors (transport, quota, malformed response)
    #[error("Completion gateway error: {0}")]
    Gateway(String),

    /// A prompt was requested for a conversation with no turns
    #[error("Cannot build a prompt from an empty conversation")]
    EmptyConversation,

    /// Page template errors
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Result type alias for TutorChat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
