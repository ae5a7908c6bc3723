// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and sane token limits.

use crate::diagnostic::ConfigError;
use crate::model::TaskpilotConfig;

/// Valid log level names accepted by the tracing EnvFilter.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TaskpilotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of trace, debug, info, warn, error",
                config.agent.log_level
            ),
        });
    }

    // Validate gateway.host is not empty and looks like an IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "gateway.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.provider.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "provider.model must not be empty".to_string(),
        });
    }

    if config.provider.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.max_tokens must be at least 1".to_string(),
        });
    }

    if let Some(secret) = &config.gateway.auth_secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gateway.auth_secret must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = TaskpilotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = TaskpilotConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn zero_max_tokens_fails_validation() {
        let mut config = TaskpilotConfig::default();
        config.provider.max_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_tokens"))));
    }

    #[test]
    fn bogus_log_level_fails_validation() {
        let mut config = TaskpilotConfig::default();
        config.agent.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn empty_auth_secret_fails_validation() {
        let mut config = TaskpilotConfig::default();
        config.gateway.auth_secret = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("auth_secret"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = TaskpilotConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.gateway.auth_secret = Some("shared-secret".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = TaskpilotConfig::default();
        config.agent.name = "".to_string();
        config.storage.database_path = "".to_string();
        config.provider.max_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
