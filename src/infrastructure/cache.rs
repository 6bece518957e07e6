use dashmap::DashMap;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Pass-through response cache for the v2 endpoints. Values are stored as
/// serialized JSON under a (region, key) pair; mutations evict whole regions
/// rather than individual keys. Expired entries are dropped on access; there
/// is no background sweeper.
pub struct ResponseCache {
    entries: DashMap<(String, String), CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn lookup<T: DeserializeOwned>(&self, region: &str, key: &str) -> Option<T> {
        let map_key = (region.to_string(), key.to_string());
        let entry = self.entries.get(&map_key)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.entries.remove(&map_key);
            return None;
        }
        let value = entry.value.clone();
        drop(entry);
        match serde_json::from_value(value) {
            Ok(decoded) => {
                debug!("Cache hit for {}:{}", region, key);
                Some(decoded)
            }
            Err(_) => {
                // A shape mismatch means the entry is stale garbage
                self.entries.remove(&map_key);
                None
            }
        }
    }

    pub fn store<T: Serialize>(&self, region: &str, key: &str, value: &T) {
        if let Ok(serialized) = serde_json::to_value(value) {
            self.entries.insert(
                (region.to_string(), key.to_string()),
                CacheEntry {
                    value: serialized,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    /// Drop every entry in the given regions.
    pub fn evict_regions(&self, regions: &[&str]) {
        self.entries
            .retain(|(region, _), _| !regions.contains(&region.as_str()));
        debug!("Evicted cache regions {:?}", regions);
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
