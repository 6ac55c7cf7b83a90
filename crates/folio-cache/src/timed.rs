//! Modification-time validated memoization.
//!
//! [`TimedCache`] wraps a [`CacheBucket`] and answers "give me the value for
//! this key, given that its source was last modified at `T`". A stored entry
//! is fresh when the bucket stored it at or after `T`; otherwise the supplied
//! regenerator runs and its result replaces the entry.
//!
//! The cache never hashes content. Correctness depends on the caller passing a
//! modification time that reflects the true freshness of the source.
//!
//! # Concurrency
//!
//! Regeneration is single-flight per key: concurrent callers that find the
//! same key stale serialize on a per-key lock, and every caller after the
//! first re-reads the store instead of regenerating again. A key's lock is
//! dropped once its last waiter finishes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CacheBucket, CacheBucketExt};

/// Read-through cache validated by source modification time.
pub struct TimedCache {
    bucket: Box<dyn CacheBucket>,
    /// Per-key regeneration locks.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TimedCache {
    /// Wrap a bucket.
    #[must_use]
    pub fn new(bucket: Box<dyn CacheBucket>) -> Self {
        Self {
            bucket,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, regenerating it if stale.
    ///
    /// `regenerate` is called at most once, and only when there is no stored
    /// entry, the entry was stored before `source_modified_at`, or the stored
    /// payload no longer deserializes.
    pub fn get<T, F>(&self, key: &str, source_modified_at: SystemTime, regenerate: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.try_get(key, source_modified_at, || {
            Ok::<T, std::convert::Infallible>(regenerate())
        }) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get`](Self::get).
    ///
    /// When `regenerate` fails, nothing is stored and the error is returned.
    pub fn try_get<T, E, F>(
        &self,
        key: &str,
        source_modified_at: SystemTime,
        regenerate: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.fresh(key, source_modified_at) {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        let lock = self.key_lock(key);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.regenerate_locked(key, source_modified_at, regenerate)
        };
        self.release_key_lock(key, &lock);
        result
    }

    /// Store a value unconditionally, stamped with the current time.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.bucket.set_json(key, value)
    }

    /// Remove one entry.
    pub fn delete(&self, key: &str) -> bool {
        self.bucket.remove(key)
    }

    /// Remove all entries, or only those stored before `older_than`.
    pub fn clear(&self, older_than: Option<SystemTime>) -> usize {
        let removed = self.bucket.clear(older_than);
        tracing::debug!(removed, "cache cleared");
        removed
    }

    /// Read and deserialize an entry if it is at least as new as the source.
    fn fresh<T: DeserializeOwned>(&self, key: &str, source_modified_at: SystemTime) -> Option<T> {
        let entry = self.bucket.get(key)?;
        if entry.stored_at < source_modified_at {
            return None;
        }
        serde_json::from_slice(&entry.data)
            .inspect_err(|e| tracing::debug!(key, error = %e, "Discarding unreadable cache entry"))
            .ok()
    }

    /// Regenerate `key` while holding its lock.
    fn regenerate_locked<T, E, F>(
        &self,
        key: &str,
        source_modified_at: SystemTime,
        regenerate: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        // Another caller may have regenerated while we waited
        if let Some(value) = self.fresh(key, source_modified_at) {
            tracing::debug!(key, "cache hit after wait");
            return Ok(value);
        }

        tracing::debug!(key, "cache miss, regenerating");
        let value = regenerate()?;
        if !self.bucket.set_json(key, &value) {
            tracing::debug!(key, "cache write skipped");
        }
        Ok(value)
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_owned()).or_default())
    }

    /// Drop the lock entry for `key` once no other caller holds it.
    ///
    /// Callers clone the lock under the map lock, so the count cannot grow
    /// while it is checked here.
    fn release_key_lock(&self, key: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours
        if Arc::strong_count(lock) == 2
            && locks.get(key).is_some_and(|held| Arc::ptr_eq(held, lock))
        {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
