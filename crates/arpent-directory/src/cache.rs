// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-through TTL cache with in-flight request de-duplication.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};

use arpent_core::{ArpentError, Clock, ProfileKey};

/// A cached value and the instant it stops being fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

type SharedFetch<V> = Shared<BoxFuture<'static, V>>;

struct InFlight<V> {
    id: u64,
    fetch: SharedFetch<V>,
}

struct CacheState<V> {
    entries: HashMap<ProfileKey, CacheEntry<V>>,
    pending: HashMap<ProfileKey, InFlight<V>>,
    next_id: u64,
}

impl<V> CacheState<V> {
    fn clear(&mut self) {
        self.entries.clear();
        // Running fetches finish, but their results are no longer stored.
        self.pending.clear();
    }
}

/// Read-through cache keyed by [`ProfileKey`].
///
/// At most one fetch per key is in flight at any time. Fetch errors are
/// logged and resolve to `V::default()` without being cached.
pub struct TtlCache<V> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<CacheState<V>>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Default + Send + Sync + 'static,
{
    /// Creates an empty cache. `name` only labels log lines.
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                pending: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the fresh value for `key`, joining or starting a fetch otherwise.
    ///
    /// `fetch` is only called when a new fetch starts. It runs under the
    /// cache lock, so it must build the future lazily and do no work itself.
    pub async fn get_or_fetch<F, Fut>(&self, key: ProfileKey, fetch: F) -> V
    where
        F: FnOnce(ProfileKey) -> Fut,
        Fut: Future<Output = Result<V, ArpentError>> + Send + 'static,
    {
        let in_flight = {
            let mut state = lock(&self.state);
            if let Some(entry) = state.entries.get(&key)
                && entry.expires_at > self.clock.now()
            {
                debug!(cache = self.name, key = %key, "cache hit");
                return entry.value.clone();
            }

            match state.pending.get(&key) {
                Some(in_flight) => {
                    debug!(cache = self.name, key = %key, "joining in-flight fetch");
                    in_flight.fetch.clone()
                }
                None => {
                    state.next_id += 1;
                    let id = state.next_id;
                    let fetch = self.start_fetch(id, key.clone(), fetch(key.clone()));
                    state.pending.insert(
                        key,
                        InFlight {
                            id,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        in_flight.await
    }

    /// Wraps `fut` so that whoever drives it to completion also does the
    /// write-back, even if the caller that started it was dropped.
    fn start_fetch<Fut>(&self, id: u64, key: ProfileKey, fut: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = Result<V, ArpentError>> + Send + 'static,
    {
        let name = self.name;
        let ttl = self.ttl;
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);
        debug!(cache = name, key = %key, "cache miss, fetching");

        async move {
            let result = fut.await;
            let mut state = lock(&state);
            let current = state.pending.get(&key).is_some_and(|p| p.id == id);
            if current {
                state.pending.remove(&key);
            }
            match result {
                Ok(value) => {
                    if current {
                        state.entries.insert(
                            key,
                            CacheEntry {
                                value: value.clone(),
                                expires_at: clock.now() + ttl,
                            },
                        );
                    } else {
                        debug!(cache = name, key = %key, "discarding result of invalidated fetch");
                    }
                    value
                }
                Err(e) => {
                    warn!(cache = name, key = %key, error = %e, "fetch failed, serving default");
                    V::default()
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drops the entry and any in-flight marker for `key`.
    pub fn invalidate(&self, key: &ProfileKey) {
        let mut state = lock(&self.state);
        state.entries.remove(key);
        state.pending.remove(key);
    }

    /// Drops every entry and in-flight marker.
    pub fn invalidate_all(&self) {
        lock(&self.state).clear();
    }

    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches currently tracked as in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

/// Clears several caches while holding all of their locks, so no caller sees
/// some partitions cleared and others not.
pub(crate) fn invalidate_together(caches: &[&dyn Invalidate]) {
    let mut guards: Vec<Box<dyn ClearGuard + '_>> =
        caches.iter().map(|cache| cache.lock_for_clear()).collect();
    for guard in &mut guards {
        guard.clear();
    }
}

/// Type-erased access to a cache's lock, for [`invalidate_together`].
pub(crate) trait Invalidate {
    fn lock_for_clear(&self) -> Box<dyn ClearGuard + '_>;
}

pub(crate) trait ClearGuard {
    fn clear(&mut self);
}

impl<V> ClearGuard for MutexGuard<'_, CacheState<V>> {
    fn clear(&mut self) {
        CacheState::<V>::clear(self);
    }
}

impl<V: 'static> Invalidate for TtlCache<V> {
    fn lock_for_clear(&self) -> Box<dyn ClearGuard + '_> {
        Box::new(lock(&self.state))
    }
}

fn lock<V>(state: &Mutex<CacheState<V>>) -> MutexGuard<'_, CacheState<V>> {
    // The state is consistent after every statement, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arpent_test_utils::ManualClock;
    use tracing_test::traced_test;

    fn cache(clock: &Arc<ManualClock>) -> TtlCache<Option<String>> {
        TtlCache::new("test", Duration::from_secs(60), clock.clone())
    }

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: &str,
    ) -> impl FnOnce(ProfileKey) -> BoxFuture<'static, Result<Option<String>, ArpentError>> {
        let calls = Arc::clone(calls);
        let value = value.to_string();
        move |_key| {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(value))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = ProfileKey::new("a@example.com");

        let first = cache.get_or_fetch(key.clone(), counting_fetch(&calls, "A")).await;
        clock.advance(Duration::from_secs(59));
        let second = cache.get_or_fetch(key.clone(), counting_fetch(&calls, "B")).await;

        assert_eq!(first, Some("A".to_string()));
        assert_eq!(second, Some("A".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn entry_expires_exactly_at_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = ProfileKey::new("a@example.com");

        cache.get_or_fetch(key.clone(), counting_fetch(&calls, "A")).await;
        clock.advance(Duration::from_secs(60));
        let refreshed = cache.get_or_fetch(key, counting_fetch(&calls, "B")).await;

        assert_eq!(refreshed, Some("B".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_returns_default_and_is_not_cached() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let key = ProfileKey::new("x");

        let failed = cache
            .get_or_fetch(key.clone(), |_| async {
                Err(ArpentError::Directory {
                    message: "HTTP 500".into(),
                    source: None,
                })
            })
            .await;
        assert_eq!(failed, None);
        assert!(logs_contain("fetch failed, serving default"));
        assert!(cache.is_empty());
        assert_eq!(cache.in_flight(), 0);

        let calls = Arc::new(AtomicUsize::new(0));
        let recovered = cache.get_or_fetch(key, counting_fetch(&calls, "ok")).await;
        assert_eq!(recovered, Some("ok".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_fetch(ProfileKey::new("a"), counting_fetch(&calls, "A")).await;
        cache.get_or_fetch(ProfileKey::new("b"), counting_fetch(&calls, "B")).await;
        cache.invalidate(&ProfileKey::new("a"));

        assert_eq!(cache.len(), 1);
        cache.get_or_fetch(ProfileKey::new("b"), counting_fetch(&calls, "B2")).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let rx = rx.shared();

        let held_fetch = |label: &'static str| {
            let calls = Arc::clone(&calls);
            let rx = rx.clone();
            move |_key| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let _ = rx.await;
                Ok(Some(label.to_string()))
            }
        };
        let first = cache.get_or_fetch(ProfileKey::new("x"), held_fetch("first"));
        let second = cache.get_or_fetch(ProfileKey::new(" X "), held_fetch("second"));
        let release = async {
            tokio::task::yield_now().await;
            let _ = tx.send(());
        };

        let (a, b, ()) = tokio::join!(first, second, release);
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn invalidation_during_fetch_discards_result() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let key = ProfileKey::new("x");

        let fetch = cache.get_or_fetch(key.clone(), |_| async move {
            let _ = rx.await;
            Ok(Some("stale".to_string()))
        });
        let invalidate = async {
            tokio::task::yield_now().await;
            cache.invalidate_all();
            let _ = tx.send(());
        };
        let (value, ()) = tokio::join!(fetch, invalidate);

        // The caller that started the fetch still gets its result.
        assert_eq!(value, Some("stale".to_string()));
        assert!(cache.is_empty());
    }
}
