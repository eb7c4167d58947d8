// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./arpent.toml` > `~/.config/arpent/arpent.toml` > `/etc/arpent/arpent.toml`
//! with environment variable overrides via the `ARPENT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::debug;

use crate::model::ArpentConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/arpent/arpent.toml";
pub(crate) const LOCAL_CONFIG: &str = "arpent.toml";

/// Location of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("arpent").join("arpent.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/arpent/arpent.toml` (system-wide)
/// 3. `~/.config/arpent/arpent.toml` (user XDG config)
/// 4. `./arpent.toml` (local directory)
/// 5. `ARPENT_*` environment variables
pub fn load_config() -> Result<ArpentConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ArpentConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ArpentConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ArpentConfig, figment::Error> {
    debug!(path = %path.display(), "loading config from explicit path with ARPENT_* overrides");
    Figment::new()
        .merge(Serialized::defaults(ArpentConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    let user_config = user_config_path().unwrap_or_default();
    debug!(
        system = SYSTEM_CONFIG,
        user = %user_config.display(),
        local = LOCAL_CONFIG,
        "merging config sources with ARPENT_* overrides"
    );
    Figment::new()
        .merge(Serialized::defaults(ArpentConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ARPENT_DIRECTORY_CACHE_TTL_SECS` must become
/// `directory.cache_ttl_secs`, not `directory.cache.ttl.secs`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("ARPENT_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    key.replacen("general_", "general.", 1)
        .replacen("assistant_", "assistant.", 1)
        .replacen("directory_", "directory.", 1)
}
