// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as paging bounds and non-empty paths.

use thiserror::Error;

use crate::model::VolleyConfig;

/// A configuration error surfaced at load or validation time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to parse or merge the configuration sources.
    #[error("config parse error: {message}")]
    Parse { message: String },

    /// A deserialized value violates a semantic constraint.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

/// The carrier per-call destination ceiling. Pages larger than this would be
/// rejected upstream.
const CARRIER_PAGE_CEILING: i64 = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VolleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.dispatch.page_size < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.page_size must be at least 1, got {}",
                config.dispatch.page_size
            ),
        });
    }

    if config.dispatch.page_size > CARRIER_PAGE_CEILING {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.page_size must not exceed the carrier ceiling of {CARRIER_PAGE_CEILING}, got {}",
                config.dispatch.page_size
            ),
        });
    }

    if config.dispatch.max_pages_per_run < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.max_pages_per_run must be at least 1, got {}",
                config.dispatch.max_pages_per_run
            ),
        });
    }

    if config.carriers.request_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "carriers.request_timeout_secs must be at least 1, got {}",
                config.carriers.request_timeout_secs
            ),
        });
    }

    let level = config.service.log_level.trim();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!("service.log_level `{level}` is not a recognized level"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = VolleyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn page_size_beyond_carrier_ceiling_is_rejected() {
        let mut config = VolleyConfig::default();
        config.dispatch.page_size = 500;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("page_size")));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = VolleyConfig::default();
        config.dispatch.page_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bogus_log_level_is_rejected() {
        let mut config = VolleyConfig::default();
        config.service.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("log_level"));
    }

    #[test]
    fn all_errors_are_collected_not_just_the_first() {
        let mut config = VolleyConfig::default();
        config.dispatch.page_size = 0;
        config.dispatch.max_pages_per_run = 0;
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
