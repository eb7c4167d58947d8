// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached team member directory.
//!
//! [`ProfileDirectory`] answers profile lookups by email, by slug and for the
//! whole active team. Each lookup kind is its own [`TtlCache`] partition:
//! fresh entries are served from memory, concurrent misses for one key share
//! a single fetch, and fetch failures degrade to "not found".
//!
//! [`RestProfileSource`] is the HTTP-backed [`ProfileSource`] used in
//! production.

pub mod cache;
pub mod directory;
pub mod rest;

pub use arpent_core::{Profile, ProfileKey, ProfileSource};
pub use cache::{CacheEntry, TtlCache};
pub use directory::ProfileDirectory;
pub use rest::RestProfileSource;
