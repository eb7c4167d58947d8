// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented contact message format.
//!
//! ```text
//! Nom: <name>
//! Email: <email>
//! Telephone: <phone>
//! Sujet: <subject>
//! Message:
//! <message, possibly several lines>
//! ```
//!
//! Decoding matches labels case-insensitively and also accepts the `E-mail`
//! and `Téléphone` spellings that people type by hand.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A contact form submission as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

/// Fields recovered from a stored message blob. Unmatched fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedContact {
    pub sender_name: String,
    pub sender_email: String,
    pub sender_phone: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Phone,
    Subject,
}

/// Labelled header lines, matched case-insensitively anywhere in the blob.
static LABELS: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
    vec![
        (Field::Name, Regex::new(r"(?i)^nom\s*:\s*(.*)$").unwrap()),
        (Field::Email, Regex::new(r"(?i)^e-?mail\s*:\s*(.*)$").unwrap()),
        (Field::Phone, Regex::new(r"(?i)^t[eé]l[eé]phone\s*:\s*(.*)$").unwrap()),
        (Field::Subject, Regex::new(r"(?i)^sujet\s*:\s*(.*)$").unwrap()),
    ]
});

/// Body start markers, tried in order.
static BODY_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)^message\s*:").unwrap(),
        Regex::new(r"(?i)^sujet\s*:").unwrap(),
    ]
});

/// Legacy first line: `Name (email)`.
static LEGACY_SENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\(([^()]*)\)\s*$").unwrap());

/// Flattens a submission into the stored text form.
///
/// Header values are trimmed and any line break inside them becomes a space,
/// so each header stays on one line. The message is trimmed as a whole.
pub fn encode(submission: &ContactSubmission) -> String {
    format!(
        "Nom: {}\nEmail: {}\nTelephone: {}\nSujet: {}\nMessage:\n{}",
        single_line(&submission.name),
        single_line(&submission.email),
        single_line(&submission.phone),
        single_line(&submission.subject),
        submission.message.trim(),
    )
}

fn single_line(value: &str) -> String {
    value
        .trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recovers the submission fields from a stored blob.
///
/// Never fails: fields that cannot be located come back empty. Blank lines
/// and surrounding whitespace in the body are not preserved.
pub fn decode(text: &str) -> DecodedContact {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut decoded = DecodedContact::default();
    let mut found_name = false;
    let mut found_email = false;
    for (field, pattern) in LABELS.iter() {
        let Some(value) = lines
            .iter()
            .find_map(|line| pattern.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
        else {
            continue;
        };
        match field {
            Field::Name => {
                decoded.sender_name = value;
                found_name = true;
            }
            Field::Email => {
                decoded.sender_email = value;
                found_email = true;
            }
            Field::Phone => decoded.sender_phone = value,
            Field::Subject => decoded.subject = value,
        }
    }

    if !found_name && let Some(first) = lines.first() {
        debug!("no name label, reading legacy sender line");
        let (name, email) = legacy_sender(first);
        decoded.sender_name = name;
        if !found_email {
            decoded.sender_email = email;
        }
    }

    decoded.body = body_lines(&lines).join("\n");
    decoded
}

fn legacy_sender(line: &str) -> (String, String) {
    match LEGACY_SENDER.captures(line) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
            caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        ),
        None => (line.to_string(), String::new()),
    }
}

fn body_lines<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    for marker in BODY_MARKERS.iter() {
        if let Some(index) = lines.iter().position(|line| marker.is_match(line)) {
            return &lines[index + 1..];
        }
    }
    lines.get(1..).unwrap_or_default()
}
