// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile data source trait.

use async_trait::async_trait;

use crate::error::ArpentError;
use crate::types::Profile;

/// Backing store for team member profiles.
///
/// Implementations only ever return active records. Keys arrive already
/// normalized (trimmed, lower-cased).
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    /// Looks up one active profile by email address.
    async fn by_email(&self, email: &str) -> Result<Option<Profile>, ArpentError>;

    /// Looks up one active profile by slug.
    async fn by_slug(&self, slug: &str) -> Result<Option<Profile>, ArpentError>;

    /// Lists all active profiles in display order.
    async fn list_active(&self) -> Result<Vec<Profile>, ArpentError>;
}
