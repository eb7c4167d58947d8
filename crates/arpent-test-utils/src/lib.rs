// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Arpent integration tests.
//!
//! Provides deterministic stand-ins for the adapter traits so cache and
//! directory behavior can be tested without a network or real time.
//!
//! # Components
//!
//! - [`MockProfileSource`] - In-memory profile source with call counters,
//!   failure injection and a gate for holding fetches in flight
//! - [`ManualClock`] - Clock that only moves when told to
//! - [`sample_profiles`] - A small fixed team

pub mod manual_clock;
pub mod mock_source;

pub use manual_clock::ManualClock;
pub use mock_source::{MockProfileSource, profile, sample_profiles};
