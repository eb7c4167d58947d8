// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Team member lookups over a cached [`ProfileSource`].

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use arpent_config::model::DirectoryConfig;
use arpent_core::{Clock, Profile, ProfileKey, ProfileSource, SystemClock};

use crate::cache::{TtlCache, invalidate_together};

/// Cached profile lookups with one partition per lookup kind.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ProfileDirectory {
    source: Arc<dyn ProfileSource>,
    by_email: TtlCache<Option<Profile>>,
    by_slug: TtlCache<Option<Profile>>,
    active: TtlCache<Vec<Profile>>,
}

impl ProfileDirectory {
    pub fn new(source: Arc<dyn ProfileSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            by_email: TtlCache::new("profile_by_email", ttl, Arc::clone(&clock)),
            by_slug: TtlCache::new("profile_by_slug", ttl, Arc::clone(&clock)),
            active: TtlCache::new("active_profiles", ttl, clock),
        }
    }

    /// Builds a directory using `cache_ttl_secs` from config and the wall clock.
    pub fn from_config(source: Arc<dyn ProfileSource>, config: &DirectoryConfig) -> Self {
        Self::new(
            source,
            Duration::from_secs(config.cache_ttl_secs),
            Arc::new(SystemClock),
        )
    }

    /// Active profile with this email, if any. Blank input never fetches.
    pub async fn by_email(&self, email: &str) -> Option<Profile> {
        let key = ProfileKey::new(email);
        if key.is_empty() {
            debug!("empty email lookup skipped");
            return None;
        }
        let source = Arc::clone(&self.source);
        self.by_email
            .get_or_fetch(key, move |key| async move {
                source.by_email(key.as_str()).await
            })
            .await
    }

    /// Active profile with this slug, if any. Blank input never fetches.
    pub async fn by_slug(&self, slug: &str) -> Option<Profile> {
        let key = ProfileKey::new(slug);
        if key.is_empty() {
            debug!("empty slug lookup skipped");
            return None;
        }
        let source = Arc::clone(&self.source);
        self.by_slug
            .get_or_fetch(key, move |key| async move {
                source.by_slug(key.as_str()).await
            })
            .await
    }

    /// All active profiles in display order; empty when the source fails.
    pub async fn list_active(&self) -> Vec<Profile> {
        let source = Arc::clone(&self.source);
        self.active
            .get_or_fetch(ProfileKey::all_active(), move |_| async move {
                source.list_active().await
            })
            .await
    }

    /// Forgets `key` in the email and slug partitions.
    ///
    /// [`ProfileKey::all_active`] forgets the team list.
    pub fn invalidate(&self, key: &ProfileKey) {
        if key.is_all_active() {
            self.active.invalidate(key);
        } else {
            self.by_email.invalidate(key);
            self.by_slug.invalidate(key);
        }
    }

    /// Clears every partition at once.
    pub fn invalidate_all(&self) {
        invalidate_together(&[&self.by_email, &self.by_slug, &self.active]);
        debug!("profile directory cleared");
    }

    pub fn ttl(&self) -> Duration {
        self.active.ttl()
    }
}
