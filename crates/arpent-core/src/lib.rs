// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Arpent site back end.
//!
//! Holds the workspace error type, the domain types shared by the assistant,
//! directory and contact crates, and the adapter traits that let callers plug
//! in their own data source and clock.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ArpentError;
pub use traits::{Clock, ProfileSource, SystemClock};
pub use types::{ChatTurn, Profile, ProfileKey, Role, StreamEvent};
