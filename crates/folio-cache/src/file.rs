//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry is a single file holding the raw payload; the
//! file's modification time is the entry's storage timestamp, so no timestamp
//! is embedded in the payload.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated. This ensures stale caches from previous builds are never used.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::{Cache, CacheBucket, StoredEntry};

/// Suffix of entry files, keeping `a` and `a/b` from colliding on disk.
const ENTRY_SUFFIX: &str = ".entry";

/// File name used for the empty key (the root logical path).
const ROOT_ENTRY: &str = "_root.entry";

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION              # contains the cache version string
/// +-- folders/             # bucket "folders"
/// |   +-- _root.entry      # entry for key ""
/// |   +-- docs.entry       # entry for key "docs"
/// |   +-- docs/
/// |       +-- guide.entry  # entry for key "docs/guide"
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Map a key to its entry file.
    ///
    /// Returns `None` for keys that would escape the bucket directory.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() {
            return Some(self.dir.join(ROOT_ENTRY));
        }
        let rel = Path::new(key);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            tracing::debug!(key, "Rejected cache key outside bucket");
            return None;
        }
        Some(self.dir.join(format!("{key}{ENTRY_SUFFIX}")))
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<StoredEntry> {
        let path = self.entry_path(key)?;
        let stored_at = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let data = fs::read(&path).ok()?;
        Some(StoredEntry { data, stored_at })
    }

    fn set(&self, key: &str, value: &[u8]) -> bool {
        let Some(path) = self.entry_path(key) else {
            return false;
        };

        // Silently ignore errors — cache is optional
        let Some(parent) = path.parent() else {
            return false;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::debug!(key, error = %e, "Failed to create cache bucket directory");
            return false;
        }

        match fs::write(&path, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(key, error = %e, "Failed to write cache entry");
                false
            }
        }
    }

    fn remove(&self, key: &str) -> bool {
        self.entry_path(key)
            .is_some_and(|path| fs::remove_file(path).is_ok())
    }

    fn clear(&self, older_than: Option<SystemTime>) -> usize {
        clear_dir(&self.dir, older_than)
    }
}

/// Remove entry files under `dir`, recursing into subdirectories.
fn clear_dir(dir: &Path, older_than: Option<SystemTime>) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            removed += clear_dir(&path, older_than);
            continue;
        }

        if !path.to_string_lossy().ends_with(ENTRY_SUFFIX) {
            continue;
        }

        let expired = match older_than {
            None => true,
            Some(cutoff) => entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|stored_at| stored_at < cutoff),
        };
        if expired && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    // Wipe and recreate
    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}
