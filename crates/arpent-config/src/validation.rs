// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes, positive durations and identifier-shaped table names.

use crate::diagnostic::ConfigError;
use crate::model::ArpentConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &ArpentConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.general.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "general.log_level `{}` must be one of {}",
                config.general.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(endpoint) = &config.assistant.endpoint
        && !is_http_url(endpoint)
    {
        errors.push(ConfigError::Validation {
            message: format!("assistant.endpoint `{endpoint}` must be an http(s) URL"),
        });
    }

    if config.assistant.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "assistant.timeout_secs must be greater than 0 when set".to_string(),
        });
    }

    if let Some(base_url) = &config.directory.base_url
        && !is_http_url(base_url)
    {
        errors.push(ConfigError::Validation {
            message: format!("directory.base_url `{base_url}` must be an http(s) URL"),
        });
    }

    let table = config.directory.table.trim();
    if table.is_empty() {
        errors.push(ConfigError::Validation {
            message: "directory.table must not be empty".to_string(),
        });
    } else if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        errors.push(ConfigError::Validation {
            message: format!(
                "directory.table `{table}` may only contain ASCII letters, digits and `_`"
            ),
        });
    }

    if config.directory.cache_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "directory.cache_ttl_secs must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}
