// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing error texts shown in the chat widget.

/// The gateway could not be reached at all.
pub const UNREACHABLE: &str = "Impossible de contacter l'assistant...";

/// Success status but no body to read.
pub const NO_RESPONSE: &str = "Pas de reponse du serveur.";

/// The reply held no extractable text.
pub const NO_USABLE_REPLY: &str = "Aucune reponse exploitable de l'assistant.";

/// A JSON reply that could not be parsed or held no text and no error.
pub const INVALID_RESPONSE: &str = "Reponse invalide de l'assistant.";

/// Prefix for error turns in the conversation.
pub const ERROR_PREFIX: &str = "[Erreur]";

/// Generic text for an error status whose body carries no message.
pub fn upstream_status(status: u16) -> String {
    format!("L'assistant a repondu avec une erreur (HTTP {status}).")
}
