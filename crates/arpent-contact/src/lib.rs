// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact form messages for the Arpent site.
//!
//! A submission is flattened into one labelled text blob so it fits the
//! generic `message` column of a notification record, and parsed back when
//! the notification is displayed. Parsing also accepts the older
//! `Name (email)` first-line format.

pub mod codec;
pub mod notification;

pub use codec::{ContactSubmission, DecodedContact, decode, encode};
pub use notification::{CONTACT_KIND, Notification};
