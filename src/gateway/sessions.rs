use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::interfaces::agent::{Agent, AgentFactory};
use crate::keys::session_id;

struct Entry {
    cell: Arc<OnceCell<Arc<dyn Agent>>>,
    last_used: Instant,
}

/// Agent handles keyed by a digest of the caller's key, never the key itself.
///
/// Concurrent first requests for one key share a single initialization, so a
/// key maps to at most one handle. Entries leave on LRU pressure or after
/// `idle_ttl` without use; a failed initialization leaves nothing behind.
pub struct SessionStore {
    factory: Arc<dyn AgentFactory>,
    entries: Mutex<LruCache<String, Entry>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(factory: Arc<dyn AgentFactory>, max_entries: usize, idle_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            factory,
            entries: Mutex::new(LruCache::new(capacity)),
            idle_ttl,
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, LruCache<String, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn evict_expired(&self, entries: &mut LruCache<String, Entry>, now: Instant) {
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.last_used) > self.idle_ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            tracing::debug!(session = %&id[..12], "Evicting idle agent session");
            entries.pop(&id);
        }
    }

    fn cell_for(&self, id: &str) -> Arc<OnceCell<Arc<dyn Agent>>> {
        let now = Instant::now();
        let mut entries = self.lock_entries();
        self.evict_expired(&mut entries, now);

        if let Some(entry) = entries.get_mut(id) {
            entry.last_used = now;
            return entry.cell.clone();
        }

        let cell = Arc::new(OnceCell::new());
        if let Some((evicted, _)) = entries.push(
            id.to_string(),
            Entry {
                cell: cell.clone(),
                last_used: now,
            },
        ) {
            if evicted != id {
                tracing::debug!(session = %&evicted[..12], "Evicted least recently used agent session");
            }
        }
        cell
    }

    // A waiter still holding the cell will retry the initialization itself,
    // so the entry has to stay until the last holder gives up.
    fn forget_failed(&self, id: &str, cell: &Arc<OnceCell<Arc<dyn Agent>>>) {
        let mut entries = self.lock_entries();
        let ours = entries
            .peek(id)
            .map(|entry| {
                Arc::ptr_eq(&entry.cell, cell)
                    && !entry.cell.initialized()
                    && Arc::strong_count(cell) <= 2
            })
            .unwrap_or(false);
        if ours {
            entries.pop(id);
        }
    }

    pub async fn get_or_initialize(&self, private_key_base58: &str) -> Result<Arc<dyn Agent>> {
        let id = session_id(private_key_base58);
        let cell = self.cell_for(&id);

        let result = cell
            .get_or_try_init(|| async {
                tracing::info!(session = %&id[..12], "Creating agent session");
                self.factory.initialize(private_key_base58).await
            })
            .await
            .cloned();

        if result.is_err() {
            self.forget_failed(&id, &cell);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
