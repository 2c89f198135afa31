//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use lesson_assistant_core::chat::{RequestPolicy, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub chat_api_base: String,
    pub qa_model: String,
    pub qa_max_tokens: u32,
    pub credential_path: PathBuf,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Chat Service Settings ---
        let chat_api_base =
            lookup("CHAT_API_BASE").unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        if chat_api_base.trim().is_empty() {
            return Err(ConfigError::MissingVar("CHAT_API_BASE".to_string()));
        }

        let qa_model = lookup("QA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let qa_max_tokens = match lookup("QA_MAX_TOKENS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|tokens| *tokens > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "QA_MAX_TOKENS".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    )
                })?,
            None => DEFAULT_MAX_TOKENS,
        };

        // --- Durable Credential Slot ---
        let credential_path = lookup("CREDENTIAL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.lesson_assistant/credential.json"));

        Ok(Self {
            bind_address,
            log_level,
            chat_api_base,
            qa_model,
            qa_max_tokens,
            credential_path,
            cors_origin,
        })
    }

    pub fn request_policy(&self) -> RequestPolicy {
        RequestPolicy {
            model: self.qa_model.clone(),
            max_tokens: self.qa_max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.chat_api_base, "https://api.openai.com/v1");
        assert_eq!(config.request_policy(), RequestPolicy::default());
        assert_eq!(
            config.credential_path,
            PathBuf::from("./.lesson_assistant/credential.json")
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("QA_MODEL", "gpt-4o-mini"),
            ("QA_MAX_TOKENS", "120"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.request_policy().model, "gpt-4o-mini");
        assert_eq!(config.request_policy().max_tokens, 120);
    }

    #[test]
    fn invalid_values_are_reported_by_name() {
        let err = load(&[("QA_MAX_TOKENS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "QA_MAX_TOKENS"));

        let err = load(&[("BIND_ADDRESS", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "BIND_ADDRESS"));

        let err = load(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(err.to_string().contains("RUST_LOG"));
    }
}
