// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Arpent configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArpentConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Chat assistant gateway settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Team directory data source and cache settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat assistant gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Full URL the conversation is POSTed to. `None` disables the assistant.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Key sent in the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Token sent as `Authorization: Bearer`. Falls back to `api_key`.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Whole-request timeout. `None` waits for the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AssistantConfig {
    /// Bearer token to send, falling back to the API key.
    pub fn effective_bearer(&self) -> Option<&str> {
        self.bearer_token.as_deref().or(self.api_key.as_deref())
    }
}

/// Team directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Base URL of the hosted database REST API (without `/rest/v1`).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Key sent in the `apikey` header and as bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table holding team member profiles.
    #[serde(default = "default_table")]
    pub table: String,

    /// How long a fetched profile stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            table: default_table(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_table() -> String {
    "team_members".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}
