//! Query cache service.
//!
//! Constructed once per application instance and shared by `Arc`. Entries are
//! keyed by operation plus effective parameters and are fresh for a caller
//! supplied staleness window. Concurrent fetches of the same key are coalesced
//! into one call: the first caller fetches while the others wait on a per-key
//! lock and then re-read the cache.

use academy_core::models::CatalogListParams;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Structured cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `GET /catalogos` with normalized parameters.
    Catalogs(CatalogListParams),
    /// `GET /catalogos/:id`.
    Catalog(String),
    /// `GET /me`.
    Profile,
}

impl QueryKey {
    pub fn catalogs(params: &CatalogListParams) -> Self {
        QueryKey::Catalogs(params.normalized())
    }

    pub fn catalog(id: &str) -> Self {
        QueryKey::Catalog(id.to_string())
    }
}

/// Set of keys an invalidation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyScope {
    /// Every catalog list, whatever its filters.
    CatalogLists,
    Exact(QueryKey),
}

impl KeyScope {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyScope::CatalogLists => matches!(key, QueryKey::Catalogs(_)),
            KeyScope::Exact(expected) => expected == key,
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    updated_at: Instant,
    invalidated: bool,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.updated_at.elapsed() < stale_time
    }
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    fetch_locks: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    /// Bumped on every invalidation; a fetch that straddles one is stored stale.
    generation: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T>(&self, key: &QueryKey, stale_time: Duration) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = lock(&self.entries);
        let entry = entries.get(key).filter(|e| e.is_fresh(stale_time))?;
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Cached value for `key` regardless of freshness.
    pub fn peek<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        lock(&self.entries)
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned())
    }

    pub fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.store(key, value, self.generation.load(Ordering::SeqCst));
    }

    fn store<T>(&self, key: QueryKey, value: T, started_at_generation: u64)
    where
        T: Send + Sync + 'static,
    {
        let mut entries = lock(&self.entries);
        let invalidated = self.generation.load(Ordering::SeqCst) != started_at_generation;
        entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                updated_at: Instant::now(),
                invalidated,
            },
        );
    }

    /// Mark every key in `scope` stale. Returns how many entries were hit.
    pub fn invalidate(&self, scope: &KeyScope) -> usize {
        let mut entries = lock(&self.entries);
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if scope.matches(key) {
                entry.invalidated = true;
                count += 1;
            }
        }
        tracing::debug!(scope = ?scope, count, "Invalidated cache entries");
        count
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fetch_lock(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        lock(&self.fetch_locks)
            .entry(key.clone())
            .or_default()
            .clone()
    }

    fn release_fetch_lock(&self, key: &QueryKey, fetch_lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = lock(&self.fetch_locks);
        drop(fetch_lock);
        // Only the map still holds it: nobody else is waiting.
        if locks.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(key);
        }
    }

    /// Return the fresh value for `key`, or run `fetcher` once for all
    /// concurrent callers and cache its result. Errors are not cached.
    pub async fn fetch<T, E, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(&key, stale_time) {
            tracing::debug!(key = ?key, "Cache hit");
            return Ok(value);
        }

        let fetch_lock = self.fetch_lock(&key);
        let result = {
            let _guard = fetch_lock.lock().await;

            if let Some(value) = self.get::<T>(&key, stale_time) {
                tracing::debug!(key = ?key, "Cache hit after waiting for in-flight fetch");
                Ok(value)
            } else {
                tracing::debug!(key = ?key, "Cache miss, fetching");
                let generation = self.generation.load(Ordering::SeqCst);
                match fetcher().await {
                    Ok(value) => {
                        self.store(key.clone(), value.clone(), generation);
                        Ok(value)
                    }
                    Err(err) => Err(err),
                }
            }
        };

        self.release_fetch_lock(&key, fetch_lock);
        result
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
