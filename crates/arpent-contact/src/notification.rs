// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification records carrying contact messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{ContactSubmission, DecodedContact, decode, encode};

/// Notification type used for contact form messages.
pub const CONTACT_KIND: &str = "contact";

/// A row of the notifications table.
///
/// Only `message` is interpreted here; the other fields pass through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Builds the unread notification stored when a contact form is submitted.
    pub fn from_submission(submission: &ContactSubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            title: format!("Nouveau message de {}", submission.name.trim()),
            kind: CONTACT_KIND.to_string(),
            message: encode(submission),
            read: false,
            created_at,
        }
    }

    pub fn is_contact(&self) -> bool {
        self.kind == CONTACT_KIND
    }

    /// Decodes the message as a contact submission, for contact notifications only.
    pub fn contact(&self) -> Option<DecodedContact> {
        self.is_contact().then(|| decode(&self.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: " Jean Dupont ".into(),
            email: "j@x.com".into(),
            phone: "0600000000".into(),
            subject: "Devis".into(),
            message: "Bonjour\nMerci".into(),
        }
    }

    #[test]
    fn builds_unread_contact_notification() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let notification = Notification::from_submission(&submission(), at);
        assert_eq!(notification.title, "Nouveau message de Jean Dupont");
        assert_eq!(notification.kind, "contact");
        assert!(!notification.read);
        assert_eq!(notification.created_at, at);

        let contact = notification.contact().unwrap();
        assert_eq!(contact.sender_name, "Jean Dupont");
        assert_eq!(contact.body, "Bonjour\nMerci");
    }

    #[test]
    fn serializes_kind_as_type() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let json = serde_json::to_value(Notification::from_submission(&submission(), at)).unwrap();
        assert_eq!(json["type"], "contact");
        assert_eq!(json["read"], false);
        assert_eq!(json["created_at"], "2026-03-14T09:30:00Z");
    }

    #[test]
    fn other_kinds_are_not_decoded() {
        let row = r#"{"title":"Maintenance","type":"system","message":"Nom: x","created_at":"2026-01-01T00:00:00Z"}"#;
        let notification: Notification = serde_json::from_str(row).unwrap();
        assert!(!notification.read);
        assert!(notification.contact().is_none());
    }
}
