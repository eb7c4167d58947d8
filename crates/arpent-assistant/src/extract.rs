// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant text extraction from gateway JSON payloads.
//!
//! The gateway may answer in OpenAI chunk format, OpenAI completion format
//! (string or content-part array), or a flat `{message}` / `{response}`
//! object. Each shape has one extractor; they run in order and the first
//! non-empty result wins.

use serde_json::Value;

/// A pure extraction attempt. Returns `None` unless it finds non-empty text.
pub type Extractor = fn(&Value) -> Option<String>;

/// Extractors in precedence order.
pub const EXTRACTORS: &[(&str, Extractor)] = &[
    ("choices[0].delta.content", choice_delta_content),
    ("choices[0].message.content", choice_message_content),
    ("choices[0].message.content[].text", choice_message_parts),
    ("message", top_level_message),
    ("response", top_level_response),
];

/// Runs [`EXTRACTORS`] in order; returns an empty string when none match.
pub fn extract_text(value: &Value) -> String {
    EXTRACTORS
        .iter()
        .find_map(|(_, extractor)| extractor(value))
        .unwrap_or_default()
}

fn first_choice(value: &Value) -> Option<&Value> {
    value.get("choices")?.get(0)
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

pub fn choice_delta_content(value: &Value) -> Option<String> {
    let content = first_choice(value)?.get("delta")?.get("content")?;
    non_empty(content.as_str()?)
}

pub fn choice_message_content(value: &Value) -> Option<String> {
    let content = first_choice(value)?.get("message")?.get("content")?;
    non_empty(content.as_str()?)
}

/// Content-part arrays: concatenates each part's `text`, skipping non-strings.
pub fn choice_message_parts(value: &Value) -> Option<String> {
    let parts = first_choice(value)?
        .get("message")?
        .get("content")?
        .as_array()?;
    let joined: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    non_empty(&joined)
}

pub fn top_level_message(value: &Value) -> Option<String> {
    non_empty(value.get("message")?.as_str()?)
}

pub fn top_level_response(value: &Value) -> Option<String> {
    non_empty(value.get("response")?.as_str()?)
}
