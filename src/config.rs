//! Configuration management for TutorChat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default base URL of the hosted inference endpoint
pub const DEFAULT_API_BASE: &str = "https://models.inference.ai.azure.com";

/// Main configuration structure for TutorChat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Session and history settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Completion endpoint configuration
///
/// Generation parameters are intentionally absent: they are fixed
/// (see [`crate::providers::GenerationParams::TUTOR`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API base URL override (useful for tests and local mocks)
    ///
    /// When unset, [`DEFAULT_API_BASE`] is used.
    #[serde(default)]
    pub api_base: Option<String>,

    /// API credential. Usually supplied through the environment.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Transport timeout for a single completion call (seconds)
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: None,
            api_key: None,
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Base URL the completion client talks to
    ///
    /// # Examples
    ///
    /// ```
    /// use tutorchat::config::{ProviderConfig, DEFAULT_API_BASE};
    ///
    /// let config = ProviderConfig::default();
    /// assert_eq!(config.api_base(), DEFAULT_API_BASE);
    /// ```
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Name of the cookie carrying the session identity
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_cookie_name() -> String {
    "tutorchat_session".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cookie_name: default_cookie_name(),
        }
    }
}

/// Session and history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session's conversation is discarded (0 = never)
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,

    /// Replay only the most recent N turns into the prompt (None = all)
    #[serde(default)]
    pub max_history_turns: Option<usize>,
}

fn default_session_ttl() -> u64 {
    86_400
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
            max_history_turns: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TutorError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(key) = std::env::var("TUTORCHAT_API_KEY") {
            self.provider.api_key = Some(key);
        } else if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            tracing::debug!("Using GITHUB_TOKEN as the API credential");
            self.provider.api_key = Some(token);
        }

        if let Ok(model) = std::env::var("TUTORCHAT_MODEL") {
            self.provider.model = model;
        }

        if let Ok(api_base) = std::env::var("TUTORCHAT_API_BASE") {
            self.provider.api_base = Some(api_base);
        }

        if let Ok(bind) = std::env::var("TUTORCHAT_BIND") {
            self.server.bind = bind;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Serve {
            bind: Some(bind), ..
        } = &cli.command
        {
            self.server.bind = bind.clone();
        }
    }

    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns error if `server.bind` is not a valid socket address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            TutorError::Config(format!("Invalid bind address '{}': {}", self.server.bind, e))
                .into()
        })
    }

    /// Validate the configuration
    ///
    /// Ensures the API credential is present and that all values are
    /// within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(TutorError::Config("provider.model cannot be empty".to_string()).into());
        }

        match self.provider.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(TutorError::MissingCredentials(
                    "set TUTORCHAT_API_KEY or GITHUB_TOKEN".to_string(),
                )
                .into());
            }
        }

        if self.provider.timeout_seconds == 0 {
            return Err(TutorError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        self.bind_addr()?;

        let cookie = &self.server.cookie_name;
        if cookie.is_empty()
            || cookie
                .chars()
                .any(|c| c.is_whitespace() || c == ';' || c == '=' || c == ',')
        {
            return Err(TutorError::Config(format!(
                "server.cookie_name '{}' is not a valid cookie name",
                cookie
            ))
            .into());
        }

        if self.session.max_history_turns == Some(0) {
            return Err(TutorError::Config(
                "session.max_history_turns must be greater than 0 when set".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.provider.api_key = Some("test-key".to_string());
        config
    }

    fn serve_cli(bind: Option<&str>) -> crate::cli::Cli {
        crate::cli::Cli {
            config: None,
            verbose: false,
            json_logs: false,
            command: crate::cli::Commands::Serve {
                bind: bind.map(str::to_string),
            },
        }
    }

    fn clear_env() {
        for var in [
            "TUTORCHAT_API_KEY",
            "GITHUB_TOKEN",
            "TUTORCHAT_MODEL",
            "TUTORCHAT_API_BASE",
            "TUTORCHAT_BIND",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.provider.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.server.cookie_name, "tutorchat_session");
        assert_eq!(config.session.ttl_seconds, 86_400);
        assert!(config.session.max_history_turns.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Missing credentials"));
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = valid_config();
        config.provider.api_key = Some("   ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = valid_config();
        config.provider.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = valid_config();
        config.provider.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_bind() {
        let mut config = valid_config();
        config.server.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_cookie_name() {
        let mut config = valid_config();
        config.server.cookie_name = "bad name;".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_history_window() {
        let mut config = valid_config();
        config.session.max_history_turns = Some(0);
        assert!(config.validate().is_err());

        config.session.max_history_turns = Some(4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  model: gpt-4o-mini
  api_base: http://localhost:9999
  timeout_seconds: 30
server:
  bind: 0.0.0.0:8080
session:
  ttl_seconds: 600
  max_history_turns: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.api_base(), "http://localhost:9999");
        assert_eq!(config.provider.timeout_seconds, 30);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.cookie_name, "tutorchat_session");
        assert_eq!(config.session.ttl_seconds, 600);
        assert_eq!(config.session.max_history_turns, Some(10));
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = valid_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("test-key"));
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let config = Config::load("nonexistent.yaml", &serve_cli(None)).unwrap();
        assert_eq!(config.provider.model, "gpt-4o");
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_cli_bind_override() {
        clear_env();
        let config = Config::load("nonexistent.yaml", &serve_cli(Some("127.0.0.1:9000"))).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[test]
    #[serial]
    fn test_env_api_key_precedence() {
        clear_env();
        std::env::set_var("GITHUB_TOKEN", "github-token");
        let mut config = Config::default();
        config.apply_env_vars();
        assert_eq!(config.provider.api_key.as_deref(), Some("github-token"));

        std::env::set_var("TUTORCHAT_API_KEY", "explicit-key");
        let mut config = Config::default();
        config.apply_env_vars();
        assert_eq!(config.provider.api_key.as_deref(), Some("explicit-key"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_overrides_model_base_and_bind() {
        clear_env();
        std::env::set_var("TUTORCHAT_MODEL", "phi-4");
        std::env::set_var("TUTORCHAT_API_BASE", "http://127.0.0.1:1234");
        std::env::set_var("TUTORCHAT_BIND", "0.0.0.0:80");

        let mut config = Config::default();
        config.apply_env_vars();
        assert_eq!(config.provider.model, "phi-4");
        assert_eq!(config.provider.api_base(), "http://127.0.0.1:1234");
        assert_eq!(config.server.bind, "0.0.0.0:80");
        clear_env();
    }
}
