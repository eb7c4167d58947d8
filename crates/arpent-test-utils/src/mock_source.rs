// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory profile source for deterministic cache tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use arpent_core::{ArpentError, Profile, ProfileSource};

/// A profile source backed by a `Vec<Profile>`.
///
/// Counts calls per operation, can be switched into a failing mode, and can
/// be gated so fetches stay in flight until the test releases them.
pub struct MockProfileSource {
    profiles: Mutex<Vec<Profile>>,
    email_calls: AtomicUsize,
    slug_calls: AtomicUsize,
    list_calls: AtomicUsize,
    failing: AtomicBool,
    gate: Option<Arc<Semaphore>>,
}

impl MockProfileSource {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            email_calls: AtomicUsize::new(0),
            slug_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Like [`new`](Self::new), but every fetch waits for [`release`](Self::release).
    pub fn gated(profiles: Vec<Profile>) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new(profiles)
        }
    }

    /// Lets `fetches` held fetches complete. No-op when not gated.
    pub fn release(&self, fetches: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(fetches);
        }
    }

    /// Makes subsequent fetches fail with [`ArpentError::Directory`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replaces the backing records.
    pub fn set_profiles(&self, profiles: Vec<Profile>) {
        *self.profiles.lock().unwrap_or_else(|e| e.into_inner()) = profiles;
    }

    pub fn email_calls(&self) -> usize {
        self.email_calls.load(Ordering::SeqCst)
    }

    pub fn slug_calls(&self) -> usize {
        self.slug_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.email_calls() + self.slug_calls() + self.list_calls()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }

    fn check_failing(&self) -> Result<(), ArpentError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ArpentError::Directory {
                message: "mock source failure".into(),
                source: None,
            });
        }
        Ok(())
    }

    fn active(&self) -> Vec<Profile> {
        let mut active: Vec<Profile> = self
            .profiles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        active.sort_by_key(|p| p.display_order);
        active
    }
}

impl Default for MockProfileSource {
    fn default() -> Self {
        Self::new(sample_profiles())
    }
}

#[async_trait]
impl ProfileSource for MockProfileSource {
    async fn by_email(&self, email: &str) -> Result<Option<Profile>, ArpentError> {
        self.email_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.check_failing()?;
        Ok(self
            .active()
            .into_iter()
            .find(|p| p.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))))
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<Profile>, ArpentError> {
        self.slug_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.check_failing()?;
        Ok(self.active().into_iter().find(|p| p.slug == slug))
    }

    async fn list_active(&self) -> Result<Vec<Profile>, ArpentError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.check_failing()?;
        Ok(self.active())
    }
}

/// Builds an active profile with the given slug, name and email.
pub fn profile(slug: &str, name: &str, email: &str, display_order: i32) -> Profile {
    Profile {
        id: format!("id-{slug}"),
        slug: slug.to_string(),
        name: name.to_string(),
        position: Some("Géomètre-expert".to_string()),
        email: Some(email.to_string()),
        phone: None,
        bio: None,
        photo_url: None,
        display_order,
        active: true,
    }
}

/// Three active members and one inactive one.
pub fn sample_profiles() -> Vec<Profile> {
    let mut retired = profile("paul-martin", "Paul Martin", "paul.martin@arpent.fr", 4);
    retired.active = false;
    vec![
        profile("claire-bernard", "Claire Bernard", "claire.bernard@arpent.fr", 2),
        profile("jean-dupont", "Jean Dupont", "jean.dupont@arpent.fr", 1),
        profile("lea-moreau", "Léa Moreau", "lea.moreau@arpent.fr", 3),
        retired,
    ]
}
