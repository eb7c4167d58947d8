// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Arpent crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An event produced while reading an assistant reply.
///
/// A reply is always zero or more `Delta`, then at most one `Error`, then
/// exactly one `Done`. Nothing follows `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental fragment of assistant text.
    Delta(String),
    /// A user-facing failure message. No `Delta` follows it.
    Error(String),
    /// Terminal marker.
    Done,
}

impl StreamEvent {
    pub fn is_done(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }
}

/// A team member record as published on the site.
///
/// Only the fixed projection the site reads is modelled; optional columns
/// deserialize to `None` when absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Normalized cache key.
///
/// Lookup keys are trimmed and lower-cased. The "all active profiles" key is
/// a separate variant, so no lookup text can collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileKey(KeyKind);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum KeyKind {
    Lookup(String),
    AllActive,
}

impl ProfileKey {
    pub fn new(raw: &str) -> Self {
        Self(KeyKind::Lookup(raw.trim().to_lowercase()))
    }

    /// Key used by the parameterless "list all active profiles" lookup.
    pub fn all_active() -> Self {
        Self(KeyKind::AllActive)
    }

    pub fn is_all_active(&self) -> bool {
        self.0 == KeyKind::AllActive
    }

    /// The normalized lookup text; empty for the all-active key.
    pub fn as_str(&self) -> &str {
        match &self.0 {
            KeyKind::Lookup(text) => text,
            KeyKind::AllActive => "",
        }
    }

    /// True for a lookup key with no text left after trimming.
    pub fn is_empty(&self) -> bool {
        matches!(&self.0, KeyKind::Lookup(text) if text.is_empty())
    }
}

impl std::fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            KeyKind::Lookup(text) => f.write_str(text),
            KeyKind::AllActive => f.write_str("<all active>"),
        }
    }
}

impl From<&str> for ProfileKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_serializes_lowercase() {
        let turn = ChatTurn::user("Bonjour");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Bonjour"}));

        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
    }

    #[test]
    fn profile_key_normalizes() {
        let key = ProfileKey::new("  Jean.Dupont@Example.COM ");
        assert_eq!(key.as_str(), "jean.dupont@example.com");
        assert_eq!(key, ProfileKey::from("jean.dupont@example.com"));
        assert!(ProfileKey::new("   ").is_empty());
    }

    #[test]
    fn all_active_key_cannot_be_built_from_text() {
        let star = ProfileKey::new(" * ");
        assert_eq!(star.as_str(), "*");
        assert!(!star.is_all_active());
        assert_ne!(star, ProfileKey::all_active());

        let all = ProfileKey::all_active();
        assert!(all.is_all_active());
        assert!(!all.is_empty());
        assert_eq!(all.to_string(), "<all active>");
    }

    #[test]
    fn profile_deserializes_with_missing_optionals() {
        let json = r#"{"id":"1","slug":"jean-dupont","name":"Jean Dupont","email":null}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.slug, "jean-dupont");
        assert!(profile.email.is_none());
        assert!(profile.position.is_none());
        assert!(profile.active);
        assert_eq!(profile.display_order, 0);
    }

    #[test]
    fn stream_event_done_marker() {
        assert!(StreamEvent::Done.is_done());
        assert!(!StreamEvent::Delta("x".into()).is_done());
    }
}
