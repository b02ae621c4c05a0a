//! In-memory memoization of read queries.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// TTL cache of serialized query results keyed by query string.
pub struct QueryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if Instant::now() >= entry.expires_at {
            drop(store);
            self.store.write().await.remove(key);
            return None;
        }

        match serde_json::from_str(&entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                drop(store);
                self.store.write().await.remove(key);
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_string(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping unserializable cache entry");
                return;
            }
        };

        let now = Instant::now();
        let mut store = self.store.write().await;
        // Keys that are never read again would otherwise linger.
        store.retain(|_, entry| entry.expires_at > now);
        store.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Drop every entry whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.store
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
