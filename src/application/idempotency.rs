use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::domain::value_objects::IdempotencyKey;

use super::dto::EmployeeDto;

pub const DEFAULT_IDEMPOTENCY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct StoredReply {
    reply: EmployeeDto,
    stored_at: Instant,
}

/// Replay store for idempotent employee creation. A repeated POST carrying a
/// key seen within the TTL returns the stored response unchanged. Expired
/// entries are pruned on write, so the map stays bounded by the write rate
/// within one TTL window.
pub struct IdempotencyStore {
    entries: DashMap<IdempotencyKey, StoredReply>,
    ttl: Duration,
}

impl IdempotencyStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn recall(&self, key: &IdempotencyKey) -> Option<EmployeeDto> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.reply.clone())
    }

    pub fn remember(&self, key: IdempotencyKey, reply: EmployeeDto) {
        self.entries
            .retain(|_, stored| stored.stored_at.elapsed() < self.ttl);
        self.entries.insert(
            key,
            StoredReply {
                reply,
                stored_at: Instant::now(),
            },
        );
    }
}

impl Default for IdempotencyStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDEMPOTENCY_TTL)
    }
}
