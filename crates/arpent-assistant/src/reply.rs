// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folding reply streams into displayable text.

use arpent_core::{ChatTurn, Role, StreamEvent};
use futures::{Stream, StreamExt};

use crate::messages::ERROR_PREFIX;

/// A fully consumed assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// Concatenated delta text, possibly empty.
    pub text: String,
    /// The error event's message, if one was emitted.
    pub error: Option<String>,
}

impl ChatReply {
    /// Drains `events` up to and including `Done`.
    pub async fn collect<S>(events: S) -> Self
    where
        S: Stream<Item = StreamEvent>,
    {
        let mut reply = Self::default();
        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Delta(text) => reply.text.push_str(&text),
                StreamEvent::Error(message) => reply.error = Some(message),
                StreamEvent::Done => break,
            }
        }
        reply
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text shown to the visitor: the reply, or `[Erreur] <message>`.
    pub fn display_text(&self) -> String {
        match &self.error {
            Some(message) if self.text.is_empty() => format!("{ERROR_PREFIX} {message}"),
            Some(message) => format!("{}\n{ERROR_PREFIX} {message}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Ordered chat history with an in-place streaming assistant turn.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    streaming: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Appends a user turn and opens an empty assistant turn for the reply.
    ///
    /// Returns the history to send, which excludes the open assistant turn.
    pub fn push_user(&mut self, content: impl Into<String>) -> Vec<ChatTurn> {
        self.close_reply();
        self.turns.push(ChatTurn::user(content));
        let request = self.turns.clone();
        self.turns.push(ChatTurn::assistant(""));
        self.streaming = true;
        request
    }

    /// Applies one reply event to the open assistant turn.
    ///
    /// Events arriving with no open turn are ignored.
    pub fn apply(&mut self, event: &StreamEvent) {
        if !self.streaming {
            return;
        }
        match event {
            StreamEvent::Delta(text) => {
                if let Some(turn) = self.open_turn() {
                    turn.content.push_str(text);
                }
            }
            StreamEvent::Error(message) => {
                if let Some(turn) = self.open_turn() {
                    if !turn.content.is_empty() {
                        turn.content.push('\n');
                    }
                    turn.content.push_str(&format!("{ERROR_PREFIX} {message}"));
                }
            }
            StreamEvent::Done => self.close_reply(),
        }
    }

    fn open_turn(&mut self) -> Option<&mut ChatTurn> {
        self.turns
            .last_mut()
            .filter(|turn| turn.role == Role::Assistant)
    }

    /// Ends the open reply, dropping it if nothing arrived.
    fn close_reply(&mut self) {
        if !self.streaming {
            return;
        }
        self.streaming = false;
        if self
            .turns
            .last()
            .is_some_and(|turn| turn.role == Role::Assistant && turn.content.is_empty())
        {
            self.turns.pop();
        }
    }
}
