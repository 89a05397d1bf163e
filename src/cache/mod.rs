pub mod keys;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

const TTL_JITTER_RATIO: f64 = 0.1;

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Host-owned store for computed reports, kept as JSON payloads.
///
/// The engine never reads from it; hosts decide when a cached report is fresh
/// enough and call [`ProgressCache::invalidate_profile`] when a session ends.
#[derive(Debug, Default)]
pub struct ProgressCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ProgressCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if !entry.is_live(Instant::now()) {
            return None;
        }
        serde_json::from_str(&entry.payload).ok()
    }

    /// Stores `value` until `expires_at`; `None` keeps it until invalidated.
    pub fn put<T>(&self, key: &str, value: &T, expires_at: Option<Instant>)
    where
        T: Serialize,
    {
        let payload = match serde_json::to_string(value) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, key, "progress cache payload not serializable");
                return;
            }
        };
        self.entries
            .write()
            .insert(key.to_string(), Entry { payload, expires_at });
    }

    pub fn put_with_ttl<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize,
    {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + apply_ttl_jitter(ttl))
        };
        self.put(key, value, expires_at);
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drops every entry belonging to the profile. Hosts call this once a
    /// practice session has been written to the ledger.
    pub fn invalidate_profile(&self, profile_id: &str) -> usize {
        let prefix = keys::profile_prefix(profile_id);
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(profile_id, removed, "progress cache invalidated");
        }
        removed
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn apply_ttl_jitter(ttl: Duration) -> Duration {
    let base_ms = ttl.as_millis() as f64;
    let mut rng = rand::rng();
    let factor = rng.random_range(1.0 - TTL_JITTER_RATIO..=1.0 + TTL_JITTER_RATIO);
    let jittered_ms = (base_ms * factor).round().max(1.0);
    Duration::from_millis(jittered_ms as u64)
}
