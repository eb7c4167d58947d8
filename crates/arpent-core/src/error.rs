// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Arpent workspace.

use thiserror::Error;

/// The primary error type used across the Arpent crates.
///
/// Components that must degrade gracefully (the chat reader, the profile
/// cache, the contact codec) never surface this to their callers; it flows
/// through construction paths and the adapter traits.
#[derive(Debug, Error)]
pub enum ArpentError {
    /// Configuration errors (missing endpoint, invalid header value, bad TOML).
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat gateway errors (request construction, transport, body read).
    #[error("assistant error: {message}")]
    Assistant {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Profile data source errors (HTTP failure, unexpected status).
    #[error("directory error: {message}")]
    Directory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A payload could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
