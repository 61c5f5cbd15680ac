//! Test utilities for TutorChat
//!
//! This module provides common test utilities including temporary config
//! files, chat services wired to a scripted gateway, and assertion helpers.

use crate::chat::{ChatService, ChatSettings};
use crate::config::Config;
use crate::providers::FakeGateway;
use crate::session::InMemorySessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Write a `config.yaml` with the given content into a fresh temp directory
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn temp_config_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).expect("Failed to write test config");
    (dir, path)
}

/// Chat service backed by `gateway` and an in-memory store without expiry
pub fn fake_service(gateway: Arc<FakeGateway>) -> ChatService {
    ChatService::new(
        gateway,
        Arc::new(InMemorySessionStore::new(None)),
        ChatSettings::new("test-model"),
    )
}

/// Assert that an error's display output contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: anyhow::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration that passes validation
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.api_key = Some("test-key".to_string());
    config
}

/// A complete configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
provider:
  model: gpt-4o-mini
  api_base: http://127.0.0.1:9999
  timeout_seconds: 30

server:
  bind: 0.0.0.0:8080
  cookie_name: tutor_sid

session:
  ttl_seconds: 600
  max_history_turns: 20
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TutorError;
    use crate::session::SessionId;

    #[test]
    fn test_temp_config_file() {
        let (_dir, path) = temp_config_file("server:\n  bind: 127.0.0.1:1\n");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("bind"));
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: anyhow::Result<()> =
            Err(TutorError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: anyhow::Result<()> =
            Err(TutorError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_test_config_yaml_parses() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.server.cookie_name, "tutor_sid");
        assert_eq!(config.session.max_history_turns, Some(20));
    }

    #[tokio::test]
    async fn test_fake_service_answers() {
        let service = fake_service(Arc::new(FakeGateway::new().with_text("ok")));
        let session = SessionId::generate();
        service.submit(&session, "what?").await.unwrap();
        assert_eq!(service.history(&session).await.unwrap().len(), 2);
    }
}
