// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: required credentials, non-empty paths, positive timeouts.

use crate::diagnostic::ConfigError;
use crate::model::{LlmVendor, SavantConfig, StorageBackend};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SavantConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    match &config.telegram.bot_token {
        None => errors.push(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
        Some(token) if token.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.llm.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "llm.timeout_secs must be greater than zero".to_string(),
        });
    }

    // Only the active vendor's key is required.
    match config.llm.provider {
        LlmVendor::OpenAi => {
            if config
                .openai
                .api_key
                .as_deref()
                .is_none_or(|k| k.trim().is_empty())
            {
                errors.push(ConfigError::MissingKey {
                    key: "openai.api_key".to_string(),
                });
            }
        }
        LlmVendor::Gemini => {
            if config
                .gemini
                .api_key
                .as_deref()
                .is_none_or(|k| k.trim().is_empty())
            {
                errors.push(ConfigError::MissingKey {
                    key: "gemini.api_key".to_string(),
                });
            }
        }
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> SavantConfig {
        let mut config = SavantConfig::default();
        config.telegram.bot_token = Some("123:abc".to_string());
        config.openai.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn complete_config_validates() {
        assert!(validate_config(&complete_config()).is_ok());
    }

    #[test]
    fn default_config_reports_missing_credentials() {
        let errors = validate_config(&SavantConfig::default()).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::MissingKey { key } if key == "telegram.bot_token")
        ));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "openai.api_key")));
    }

    #[test]
    fn gemini_vendor_requires_gemini_key_only() {
        let mut config = complete_config();
        config.llm.provider = LlmVendor::Gemini;
        config.openai.api_key = None;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "gemini.api_key")));
        assert!(!errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "openai.api_key")));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = complete_config();
        config.llm.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("timeout_secs"))
        ));
    }

    #[test]
    fn empty_database_path_fails_for_sqlite() {
        let mut config = complete_config();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn empty_database_path_ok_for_memory_backend() {
        let mut config = complete_config();
        config.storage.backend = StorageBackend::Memory;
        config.storage.database_path = "".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let mut config = complete_config();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = SavantConfig::default();
        config.llm.timeout_secs = 0;
        config.agent.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
