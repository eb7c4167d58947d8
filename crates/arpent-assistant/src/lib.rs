// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat assistant client for the Arpent site.
//!
//! [`AssistantClient::reply`] sends the conversation to the assistant gateway
//! and yields the answer as an ordered stream of [`StreamEvent`]s, whether the
//! gateway replies with a single JSON object or an SSE-like event stream.
//! Every reply ends with exactly one `Done`; failures surface as a single
//! `Error` event carrying a user-facing message.

pub mod client;
pub mod extract;
pub mod messages;
pub mod reply;
pub mod sse;

pub use arpent_core::{ChatTurn, Role, StreamEvent};
pub use client::{AssistantClient, ReplyStream};
pub use extract::extract_text;
pub use reply::{ChatReply, Conversation};
pub use sse::SseConsumer;
