//! Completion gateway module for TutorChat
//!
//! This module contains the gateway abstraction, the hosted inference client,
//! and a scripted fake used by tests.

pub mod base;
pub mod fake;
pub mod inference;

pub use base::{
    CompletionGateway, CompletionRequest, CompletionResponse, GenerationParams, Message,
    TokenUsage,
};
pub use fake::FakeGateway;
pub use inference::InferenceProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the completion gateway described by configuration
///
/// # Errors
///
/// Returns error if the API credential is missing or the client cannot be
/// initialized
///
/// # Examples
///
/// ```
/// use tutorchat::config::ProviderConfig;
/// use tutorchat::providers::{create_gateway, CompletionGateway};
///
/// let config = ProviderConfig {
///     api_key: Some("token".to_string()),
///     ..Default::default()
/// };
/// let gateway = create_gateway(&config).unwrap();
/// assert_eq!(gateway.name(), "inference");
/// ```
pub fn create_gateway(config: &ProviderConfig) -> Result<Arc<dyn CompletionGateway>> {
    Ok(Arc::new(InferenceProvider::new(config.clone())?))
}
