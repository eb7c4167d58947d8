// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Data sources use `#[async_trait]` so they can be held as trait objects.

pub mod clock;
pub mod profile;

pub use clock::{Clock, SystemClock};
pub use profile::ProfileSource;
