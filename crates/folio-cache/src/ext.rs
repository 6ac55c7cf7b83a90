//! Extension trait for [`CacheBucket`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// Implemented as default methods on an extension trait so that
/// [`CacheBucket`] stays object-safe and implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use folio_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let bucket = cache.bucket("titles");
///
/// bucket.set_json("guide", &vec!["Guide".to_owned()]);
/// let titles: Option<Vec<String>> = bucket.get_json("guide");
/// assert_eq!(titles, Some(vec!["Guide".to_owned()]));
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `None` on miss or deserialization failure.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.get(key)?;
        serde_json::from_slice(&entry.data).ok()
    }

    /// Store a value as JSON.
    ///
    /// Returns `false` if serialization or the write fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, &bytes),
            Err(e) => {
                tracing::debug!(key, error = %e, "Failed to serialize cache value");
                false
            }
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
