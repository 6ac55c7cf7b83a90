//! In-process cache implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use crate::{Cache, CacheBucket, StoredEntry};

type Entries = RwLock<HashMap<String, StoredEntry>>;

/// In-memory [`Cache`].
///
/// Buckets with the same name share storage, so a bucket handle can be dropped
/// and reopened without losing entries. Nothing survives the process.
#[derive(Default)]
pub struct MemoryCache {
    buckets: RwLock<HashMap<String, Arc<Entries>>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        if let Some(entries) = self
            .buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Box::new(MemoryCacheBucket {
                entries: Arc::clone(entries),
            });
        }

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let entries = buckets.entry(name.to_owned()).or_default();
        Box::new(MemoryCacheBucket {
            entries: Arc::clone(entries),
        })
    }
}

/// A single in-memory bucket.
struct MemoryCacheBucket {
    entries: Arc<Entries>,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<StoredEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &[u8]) -> bool {
        let entry = StoredEntry {
            data: value.to_vec(),
            stored_at: SystemTime::now(),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), entry);
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    fn clear(&self, older_than: Option<SystemTime>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        match older_than {
            Some(cutoff) => entries.retain(|_, entry| entry.stored_at >= cutoff),
            None => entries.clear(),
        }
        before - entries.len()
    }
}
