// SPDX-FileCopyrightText: 2026 Jobdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, positive limits, and well-formed base URLs.

use crate::diagnostic::ConfigError;
use crate::model::JobdeckConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &JobdeckConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of: {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.http.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "http.timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.scrape.max_results == 0 {
        errors.push(ConfigError::Validation {
            message: "scrape.max_results must be greater than zero".to_string(),
        });
    }

    if config.scrape.max_age_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "scrape.max_age_hours must be greater than zero".to_string(),
        });
    }

    if config.scrape.source_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scrape.source_timeout_secs must be greater than zero".to_string(),
        });
    }

    for source in jobdeck_core::Source::ALL {
        let settings = config.sources.get(source);
        let url = settings.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "sources.{source}.base_url `{url}` must start with http:// or https://"
                ),
            });
        }
    }

    if config.sources.enabled().next().is_none() {
        errors.push(ConfigError::Validation {
            message: "at least one source under [sources] must be enabled".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
