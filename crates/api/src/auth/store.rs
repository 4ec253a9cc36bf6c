//! Short-lived key/value storage for OAuth state values and session tokens.
//!
//! [`EphemeralStore`] is the seam: the OAuth manager only ever talks to an
//! `Arc<dyn EphemeralStore<V>>`, so a shared store can replace the in-process
//! [`MemoryStore`] without touching the flow. Entries carry their expiry and
//! are returned as-is; callers decide what an expired entry means.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use ordo_core::types::Timestamp;
use tokio::sync::RwLock;

/// A stored value together with its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Expiring<V> {
    pub value: V,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl<V> Expiring<V> {
    pub fn new(value: V, ttl: TimeDelta) -> Self {
        let created_at = Utc::now();
        Self {
            value,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[async_trait]
pub trait EphemeralStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Insert or replace `key`, expiring `ttl` from now. Implementations may
    /// drop other expired entries while writing.
    async fn put(&self, key: String, value: V, ttl: TimeDelta);

    /// Look up `key` without removing it. Expired entries are still returned.
    async fn get(&self, key: &str) -> Option<Expiring<V>>;

    /// Remove `key` and return what it held, as one atomic step.
    async fn take(&self, key: &str) -> Option<Expiring<V>>;

    /// Remove `key`. Returns whether it was present.
    async fn delete(&self, key: &str) -> bool;
}

/// In-process [`EphemeralStore`]. Contents are lost on restart.
///
/// Every `put` sweeps entries that have already expired, so keys that are
/// never read back (abandoned logins) do not accumulate.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: RwLock<HashMap<String, Expiring<V>>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> EphemeralStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn put(&self, key: String, value: V, ttl: TimeDelta) {
        let entry = Expiring::new(value, ttl);
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, existing| !existing.is_expired_at(entry.created_at));
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, remaining = entries.len(), "Swept expired entries");
        }

        entries.insert(key, entry);
    }

    async fn get(&self, key: &str) -> Option<Expiring<V>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn take(&self, key: &str) -> Option<Expiring<V>> {
        self.entries.write().await.remove(key)
    }

    async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
}
