// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented consumer for the gateway's SSE-like reply stream.
//!
//! The gateway frames replies as `data: <json>` lines but does not follow the
//! full Server-Sent Events grammar, so lines are handled here directly rather
//! than through an event-source parser. Bytes arrive in arbitrary chunks;
//! [`SseConsumer::feed`] decodes them incrementally and returns the events
//! each chunk completes, and [`SseConsumer::finish`] applies the end-of-stream
//! fallbacks.

use arpent_core::StreamEvent;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extract::extract_text;
use crate::messages;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// Incremental UTF-8 decoder that carries incomplete sequences across chunks.
///
/// Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub(crate) fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::with_capacity(self.pending.len());
        let mut tail = Vec::new();
        let mut input = self.pending.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        // Truncated sequence at the end: wait for the next chunk.
                        None => {
                            tail = rest.to_vec();
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                    }
                }
            }
        }
        self.pending = tail;
        out
    }

    /// Flushes whatever is left; a dangling partial sequence becomes U+FFFD.
    pub(crate) fn flush(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

/// Stateful consumer for one reply body.
#[derive(Debug, Default)]
pub struct SseConsumer {
    decoder: Utf8Decoder,
    buffer: String,
    produced: bool,
    errored: bool,
    stopped: bool,
    stalled: bool,
}

impl SseConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `[DONE]` or an embedded error was seen. Further input is ignored.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// True once at least one non-empty delta was emitted.
    pub fn has_produced(&self) -> bool {
        self.produced
    }

    /// Consumes one chunk of body bytes and returns the events it completes.
    ///
    /// Only `Delta` and `Error` are returned; the caller emits `Done`.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.stopped {
            return events;
        }

        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);

        while let Some(newline) = self.buffer.find('\n') {
            let raw: String = self.buffer.drain(..=newline).collect();
            let raw = &raw[..raw.len() - 1];
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.starts_with(':') || line.trim().is_empty() {
                continue;
            }
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = payload.trim();
            if payload == DONE_MARKER {
                debug!("assistant stream reached [DONE]");
                self.stopped = true;
                break;
            }

            let value = match serde_json::from_str::<Value>(payload) {
                Ok(value) => value,
                Err(e) => {
                    // Treated as a line cut short; it is retried when more bytes arrive.
                    // A line that can never parse stalls line processing for the
                    // rest of the body.
                    if !self.stalled {
                        warn!(error = %e, "unparseable data line, waiting for more bytes");
                        self.stalled = true;
                    }
                    self.buffer.insert(0, '\n');
                    self.buffer.insert_str(0, raw);
                    break;
                }
            };
            self.stalled = false;

            let text = extract_text(&value);
            if !text.is_empty() {
                self.produced = true;
                events.push(StreamEvent::Delta(text));
            }
            if let Some(error) = value.get("error").and_then(Value::as_str) {
                warn!(error, "assistant stream reported an error");
                events.push(StreamEvent::Error(error.to_string()));
                self.errored = true;
                self.stopped = true;
                break;
            }
        }

        events
    }

    /// Applies the end-of-stream fallbacks and returns their events.
    ///
    /// If nothing was produced, the leftover buffer gets one whole-payload
    /// parse attempt (failures are silent). If still nothing was produced and
    /// no error was reported, a "no usable reply" error is synthesized.
    pub fn finish(mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.errored {
            return events;
        }

        let rest = self.decoder.flush();
        self.buffer.push_str(&rest);

        if !self.produced {
            let leftover = self.buffer.trim();
            if !leftover.is_empty()
                && let Ok(value) = serde_json::from_str::<Value>(leftover)
            {
                let text = extract_text(&value);
                if !text.is_empty() {
                    debug!("recovered assistant reply from trailing buffer");
                    self.produced = true;
                    events.push(StreamEvent::Delta(text));
                }
            }
        }

        if !self.produced {
            events.push(StreamEvent::Error(messages::NO_USABLE_REPLY.to_string()));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HI_LINE: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n";

    fn run(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut consumer = SseConsumer::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(consumer.feed(chunk));
            if consumer.is_stopped() {
                break;
            }
        }
        events.extend(consumer.finish());
        events
    }

    #[test]
    fn split_line_yields_single_delta_at_every_offset() {
        let bytes = HI_LINE.as_bytes();
        for offset in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(offset);
            let events = run(&[head, tail]);
            assert_eq!(
                events,
                vec![StreamEvent::Delta("hi".into())],
                "split at byte {offset}"
            );
        }
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"géomètre\"}}]}\n";
        let bytes = line.as_bytes();
        let accent = line.find('é').unwrap();
        let events = run(&[&bytes[..accent + 1], &bytes[accent + 1..]]);
        assert_eq!(events, vec![StreamEvent::Delta("géomètre".into())]);
    }

    #[test]
    fn done_marker_stops_consumption() {
        let body = format!("{HI_LINE}data: [DONE]\n{HI_LINE}");
        let mut consumer = SseConsumer::new();
        let events = consumer.feed(body.as_bytes());
        assert!(consumer.is_stopped());
        assert_eq!(events, vec![StreamEvent::Delta("hi".into())]);
        assert!(consumer.feed(HI_LINE.as_bytes()).is_empty());
        assert!(consumer.finish().is_empty());
    }

    #[test]
    fn embedded_error_is_terminal() {
        let body = format!("{HI_LINE}data: {{\"error\":\"rate limited\"}}\n{HI_LINE}");
        let events = run(&[body.as_bytes()]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("hi".into()),
                StreamEvent::Error("rate limited".into()),
            ]
        );
    }

    #[test]
    fn error_before_any_delta_is_not_doubled() {
        let events = run(&[b"data: {\"error\":\"rate limited\"}\n"]);
        assert_eq!(events, vec![StreamEvent::Error("rate limited".into())]);
    }

    #[test]
    fn comments_only_yield_no_usable_reply() {
        let events = run(&[b": keep-alive\n\n: ping\n"]);
        assert_eq!(
            events,
            vec![StreamEvent::Error(messages::NO_USABLE_REPLY.into())]
        );
    }

    #[test]
    fn crlf_and_non_data_lines_are_tolerated() {
        let body = "event: delta\r\nid: 7\r\n\r\ndata: {\"response\":\"ok\"}\r\n";
        assert_eq!(run(&[body.as_bytes()]), vec![StreamEvent::Delta("ok".into())]);
    }

    #[test]
    fn prefix_without_space_is_ignored() {
        let body = "data:{\"response\":\"ignored\"}\n";
        assert_eq!(
            run(&[body.as_bytes()]),
            vec![StreamEvent::Error(messages::NO_USABLE_REPLY.into())]
        );
    }

    #[test]
    fn bare_json_body_recovered_at_end() {
        let body = "{\"choices\":[{\"message\":{\"content\":\"Bonjour\"}}]}";
        assert_eq!(
            run(&[body.as_bytes()]),
            vec![StreamEvent::Delta("Bonjour".into())]
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn malformed_data_line_stalls_and_falls_back() {
        let body = format!("data: {{not json}}\n{HI_LINE}");
        let mut consumer = SseConsumer::new();
        assert!(consumer.feed(body.as_bytes()).is_empty());
        assert!(consumer.feed(HI_LINE.as_bytes()).is_empty());
        assert!(!consumer.has_produced());
        assert!(logs_contain("unparseable data line"));
        assert_eq!(
            consumer.finish(),
            vec![StreamEvent::Error(messages::NO_USABLE_REPLY.into())]
        );
    }

    #[test]
    fn deltas_accumulate_across_many_chunks() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Bon\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"jour\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let chunks: Vec<&[u8]> = body.as_bytes().chunks(7).collect();
        assert_eq!(
            run(&chunks),
            vec![
                StreamEvent::Delta("Bon".into()),
                StreamEvent::Delta("jour".into()),
            ]
        );
    }

    #[test]
    fn decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
        assert_eq!(decoder.decode(&[0xC3]), "");
        assert_eq!(decoder.decode(&[0xA9]), "é");
        assert_eq!(decoder.decode(&[0xE2, 0x82]), "");
        assert_eq!(decoder.flush(), "\u{FFFD}");
    }
}
