//! Cache abstraction layer for Folio.
//!
//! Two traits decouple cache consumers from the storage mechanism:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store where every entry carries the time it
//!   was stored
//!
//! On top of a bucket, [`TimedCache`] implements read-through memoization
//! validated against a source modification time: an entry is fresh when it
//! was stored no earlier than the source was last modified.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: In-process buckets shared by name
//! - [`FileCache`]: File-based implementation; the entry file's own mtime is
//!   the storage timestamp
//!
//! # Example
//!
//! ```
//! use std::time::SystemTime;
//! use folio_cache::{Cache, MemoryCache, TimedCache};
//!
//! let cache = MemoryCache::new();
//! let folders = TimedCache::new(cache.bucket("folders"));
//!
//! let source_mtime = SystemTime::UNIX_EPOCH;
//! let first: Vec<String> = folders.get("docs", source_mtime, || vec!["guide".to_owned()]);
//! // Stored after the source changed, so the regenerator is not called again
//! let second: Vec<String> = folders.get("docs", source_mtime, || unreachable!());
//! assert_eq!(first, second);
//! ```

mod ext;
mod file;
mod memory;
mod timed;

use std::time::SystemTime;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;
pub use timed::TimedCache;

/// A stored entry together with the time the store accepted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    /// Raw bytes as written.
    pub data: Vec<u8>,
    /// Storage-layer timestamp of the write.
    pub stored_at: SystemTime,
}

/// A named partition within a [`Cache`].
///
/// Each bucket stores raw bytes per key. Freshness is not decided here: the
/// bucket only reports when an entry was stored, and callers compare that
/// timestamp against their own source.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a stored entry.
    ///
    /// Returns `None` on miss or when the entry cannot be read.
    fn get(&self, key: &str) -> Option<StoredEntry>;

    /// Store a value, overwriting any existing entry for the same key.
    ///
    /// Returns `false` when the value could not be persisted. Cache writes are
    /// never fatal.
    fn set(&self, key: &str, value: &[u8]) -> bool;

    /// Remove one entry. Returns `true` if an entry was removed.
    fn remove(&self, key: &str) -> bool;

    /// Remove all entries, or only those stored before `older_than`.
    ///
    /// Returns the number of entries removed.
    fn clear(&self, older_than: Option<SystemTime>) -> usize;
}

/// Factory for named cache [`CacheBucket`]s.
///
/// Buckets with different names are logically isolated from each other.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// Calling `bucket` multiple times with the same name returns handles that
    /// share the same underlying storage.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<StoredEntry> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) -> bool {
        false
    }

    fn remove(&self, _key: &str) -> bool {
        false
    }

    fn clear(&self, _older_than: Option<SystemTime>) -> usize {
        0
    }
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled: every lookup regenerates.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(NullCache: Send, Sync);
    static_assertions::assert_impl_all!(MemoryCache: Send, Sync);
    static_assertions::assert_impl_all!(FileCache: Send, Sync);

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("folders");

        assert_eq!(bucket.get("key"), None);
        assert!(!bucket.set("key", b"hello"));
        assert_eq!(bucket.get("key"), None);
    }

    #[test]
    fn test_null_cache_different_buckets_all_miss() {
        let cache = NullCache;

        for name in &["folders", "pages", "meta"] {
            let bucket = cache.bucket(name);
            bucket.set("k", b"data");
            assert_eq!(bucket.get("k"), None, "bucket {name} should miss");
            assert!(!bucket.remove("k"));
            assert_eq!(bucket.clear(None), 0);
        }
    }
}
