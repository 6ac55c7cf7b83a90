//! Directory indexing.
//!
//! [`FolderIndexer`] turns one directory into a [`FolderData`]:
//!
//! 1. Read the control file (defaults when absent or malformed)
//! 2. Enumerate children in name order, skipping dot files and the control
//!    file; with `flatten`, files of all subdirectories instead
//! 3. Strip ordering prefixes and interpret files; unsupported files are dropped
//! 4. Record subdirectories as [`FolderRef`]s with their own hidden flag
//! 5. Group files sharing a logical path into one [`Page`]
//! 6. Stable-sort by order key in the control file's direction
//!
//! Results are memoized through a [`TimedCache`] keyed by logical path and
//! validated against the newest modification time among the directory, its
//! subdirectories, and their control files (every descendant when flattened).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use folio_cache::{Cache, TimedCache};
use folio_meta::{Interpreter, SourceFile, titlecase_from_slug};
use folio_path::{SitePath, split_extension};

use crate::control::{FolderControlData, SortOrder};
use crate::error::{IndexError, IndexErrorKind};
use crate::folder::{Entry, FolderData, FolderRef, Page};
use crate::ordering::strip_order_prefix;

/// Default control file name.
pub const DEFAULT_CONTROL_FILE: &str = "_folder.yaml";

/// Default base name of a folder's own page.
pub const DEFAULT_INDEX_NAME: &str = "index";

/// Cache bucket holding folder data.
const BUCKET: &str = "folders";

/// A directory entry awaiting interpretation.
struct Candidate {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Builds and caches [`FolderData`] for directories under a content root.
pub struct FolderIndexer {
    root: PathBuf,
    interpreter: Arc<dyn Interpreter>,
    control_file: String,
    index_name: String,
    cache: TimedCache,
}

impl FolderIndexer {
    /// Create an indexer for the content tree at `root`.
    #[must_use]
    pub fn new(root: PathBuf, interpreter: Arc<dyn Interpreter>, cache: &dyn Cache) -> Self {
        Self {
            root,
            interpreter,
            control_file: DEFAULT_CONTROL_FILE.to_owned(),
            index_name: DEFAULT_INDEX_NAME.to_owned(),
            cache: TimedCache::new(cache.bucket(BUCKET)),
        }
    }

    /// Use a different control file name.
    #[must_use]
    pub fn with_control_file(mut self, name: impl Into<String>) -> Self {
        self.control_file = name.into();
        self
    }

    /// Use a different index page base name.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base name of a folder's own page.
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Reference to the content root folder.
    #[must_use]
    pub fn root_folder(&self) -> FolderRef {
        let control = FolderControlData::load(&self.root, &self.control_file);
        FolderRef::new(
            self.root.clone(),
            SitePath::root(),
            control.title.unwrap_or_default(),
        )
        .hidden(control.hidden)
    }

    /// Indexed contents of `folder`, from cache when the directory is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the directory is missing or unreadable.
    pub fn load_folder(&self, folder: &FolderRef) -> Result<Arc<FolderData>, IndexError> {
        let dir = folder.physical_path();
        let modified = self.source_modified(dir)?;
        let key = folder.logical_path().key();
        let data = self
            .cache
            .try_get(&key, modified, || self.index_folder(folder))?;
        Ok(Arc::new(data))
    }

    /// Index `folder` from disk, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the directory is missing or unreadable.
    pub fn index_folder(&self, folder: &FolderRef) -> Result<FolderData, IndexError> {
        let dir = folder.physical_path();
        let control = FolderControlData::load(dir, &self.control_file);

        let candidates = if control.flatten {
            let mut files = Vec::new();
            self.collect_files(dir, &mut files)?;
            files
        } else {
            self.read_candidates(dir)?
        };

        let mut entries: Vec<(String, Entry)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for candidate in candidates {
            let Some((name, entry)) = self.build_entry(folder.logical_path(), &candidate) else {
                continue;
            };
            match positions.get(&name) {
                None => {
                    positions.insert(name.clone(), entries.len());
                    entries.push((name, entry));
                }
                Some(&pos) => merge_entry(&mut entries[pos].1, entry, &candidate.path),
            }
        }

        match control.order {
            SortOrder::Ascending => entries.sort_by_key(|(_, entry)| entry.order()),
            SortOrder::Descending => {
                entries.sort_by(|(_, a), (_, b)| b.order().cmp(&a.order()));
            }
        }

        tracing::debug!(
            path = %dir.display(),
            logical = %folder.logical_path(),
            entries = entries.len(),
            "Indexed folder"
        );
        Ok(FolderData::new(folder.clone(), control, entries))
    }

    /// Drop cached folder data stored before `older_than` (all when `None`).
    pub fn clear_cache(&self, older_than: Option<SystemTime>) -> usize {
        self.cache.clear(older_than)
    }

    /// Freshness source for a directory.
    ///
    /// The latest mtime among the directory, its control file, and each
    /// subdirectory with its control file. A flattened folder includes every
    /// descendant directory.
    fn source_modified(&self, dir: &Path) -> Result<SystemTime, IndexError> {
        let meta = fs::metadata(dir).map_err(|e| IndexError::io(e, dir))?;
        if !meta.is_dir() {
            return Err(IndexError::new(IndexErrorKind::NotADirectory).with_path(dir));
        }
        let mut latest = meta.modified().map_err(|e| IndexError::io(e, dir))?;
        self.bump_control_modified(dir, &mut latest);

        let flatten = fs::read_to_string(dir.join(&self.control_file))
            .ok()
            .and_then(|content| FolderControlData::parse(&content).ok())
            .is_some_and(|control| control.flatten);
        self.subdirs_modified(dir, flatten, &mut latest);
        Ok(latest)
    }

    fn bump_control_modified(&self, dir: &Path, latest: &mut SystemTime) {
        if let Ok(modified) = fs::metadata(dir.join(&self.control_file)).and_then(|m| m.modified())
        {
            *latest = (*latest).max(modified);
        }
    }

    /// Raise `latest` to the mtimes of the subdirectories of `dir`.
    fn subdirs_modified(&self, dir: &Path, recursive: bool, latest: &mut SystemTime) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.filter_map(Result::ok) {
            if entry.file_name().to_string_lossy().starts_with('.')
                || !entry.file_type().is_ok_and(|t| t.is_dir())
            {
                continue;
            }
            let path = entry.path();
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                *latest = (*latest).max(modified);
            }
            self.bump_control_modified(&path, latest);
            if recursive {
                self.subdirs_modified(&path, true, latest);
            }
        }
    }

    /// Direct children of `dir` in name order.
    fn read_candidates(&self, dir: &Path) -> Result<Vec<Candidate>, IndexError> {
        let entries = fs::read_dir(dir).map_err(|e| IndexError::io(e, dir))?;

        let mut candidates: Vec<Candidate> = entries
            .filter_map(Result::ok)
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                // Skip hidden files/dirs
                if name.starts_with('.') {
                    return None;
                }
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                if !is_dir && name == self.control_file {
                    return None;
                }
                Some(Candidate {
                    name,
                    path: e.path(),
                    is_dir,
                })
            })
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }

    /// Files of `dir` and all its subdirectories, depth-first in name order.
    fn collect_files(&self, dir: &Path, out: &mut Vec<Candidate>) -> Result<(), IndexError> {
        for candidate in self.read_candidates(dir)? {
            if candidate.is_dir {
                if let Err(e) = self.collect_files(&candidate.path, out) {
                    tracing::warn!(path = %candidate.path.display(), error = %e, "Skipping unreadable directory");
                }
            } else {
                out.push(candidate);
            }
        }
        Ok(())
    }

    /// Turn one candidate into a named entry, or `None` when it is skipped.
    fn build_entry(&self, parent: &SitePath, candidate: &Candidate) -> Option<(String, Entry)> {
        if candidate.is_dir {
            let (display, order) = strip_order_prefix(&candidate.name);
            let control = FolderControlData::load(&candidate.path, &self.control_file);
            let title = control
                .title
                .unwrap_or_else(|| titlecase_from_slug(display));
            let folder = FolderRef::new(candidate.path.clone(), parent.join(display), title)
                .hidden(control.hidden)
                .with_order(order);
            return Some((display.to_owned(), Entry::Folder(folder)));
        }

        let (stem, _) = split_extension(&candidate.name);
        let (base_name, prefix_order) = strip_order_prefix(stem);

        let source = SourceFile::from_path(&self.root, &candidate.path)
            .inspect_err(|e| {
                tracing::warn!(path = %candidate.path.display(), error = %e, "Skipping unreadable file");
            })
            .ok()?;
        if !self.interpreter.supports(source.extension()) {
            tracing::debug!(path = %candidate.path.display(), "No interpreter for file");
            return None;
        }

        let mut file = match self.interpreter.interpret(&source, parent, base_name) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %candidate.path.display(), error = %e, "Skipping unsupported file");
                return None;
            }
        };
        if base_name == self.index_name {
            file = file.hidden();
        }

        let name = file.logical_path().name().unwrap_or(base_name).to_owned();
        let order = file.meta().order.unwrap_or(prefix_order);
        Some((name, Entry::Page(Page::new(file, order))))
    }
}

/// Fold a later entry into an existing one with the same name.
fn merge_entry(existing: &mut Entry, incoming: Entry, path: &Path) {
    match (existing, incoming) {
        (Entry::Page(page), Entry::Page(new_page)) => {
            for file in new_page.variants().values().cloned() {
                if let Err(file) = page.add_variant(file) {
                    tracing::warn!(
                        path = %path.display(),
                        logical = %file.logical_path(),
                        extension = file.extension(),
                        "Duplicate page variant, keeping first"
                    );
                }
            }
        }
        (existing, incoming) => {
            tracing::warn!(
                path = %path.display(),
                logical = %incoming.logical_path(),
                kept = %existing.logical_path(),
                "Name collision between page and folder, keeping first"
            );
        }
    }
}
