//! In-process cache for list queries.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use portal_domain::Role;
use serde_json::Value;
use tracing::debug;

/// Cache key: endpoint with query string, scoped by the caller's role so a
/// role change never serves another role's listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    role: Option<Role>,
    path: String,
}

impl QueryKey {
    /// Creates a key for `path_and_query` as seen by `role`.
    #[must_use]
    pub fn new(role: Option<Role>, path_and_query: impl Into<String>) -> Self {
        Self {
            role,
            path: path_and_query.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedQuery {
    value: Value,
    stale_after: Duration,
}

struct StaleAfter;

impl Expiry<QueryKey, CachedQuery> for StaleAfter {
    fn expire_after_create(
        &self,
        _key: &QueryKey,
        value: &CachedQuery,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.stale_after)
    }
}

/// Decoded JSON bodies of list endpoints, each with its own stale time.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, CachedQuery>,
}

impl QueryCache {
    /// Creates a cache holding at most `max_capacity` listings.
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(StaleAfter)
                .build(),
        }
    }

    /// Returns the cached body, if still fresh.
    pub async fn get(&self, key: &QueryKey) -> Option<Value> {
        let hit = self.entries.get(key).await.map(|entry| entry.value);
        if hit.is_some() {
            debug!(path = %key.path, "list query served from cache");
        }
        hit
    }

    /// Caches `value` for `stale_after`.
    pub async fn insert(&self, key: QueryKey, value: Value, stale_after: Duration) {
        self.entries.insert(key, CachedQuery { value, stale_after }).await;
    }

    /// Drops every entry whose endpoint starts with `prefix`, for all roles.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let stale: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.path.starts_with(prefix))
            .map(|(key, _)| QueryKey::clone(&key))
            .collect();

        for key in &stale {
            self.entries.invalidate(key).await;
        }
        debug!(prefix, invalidated = stale.len(), "invalidated cached list queries");
    }

    /// Drops everything.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
