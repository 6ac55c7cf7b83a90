//! Navigable page tree.
//!
//! [`PageTree`] resolves logical paths by walking from the root folder through
//! [`FolderRef`]s, indexing each directory on the way through the
//! [`FolderIndexer`] cache. Nothing is scanned ahead of time: a lookup touches
//! only the requested folder and its ancestors.
//!
//! # Thread Safety
//!
//! `PageTree` holds no mutable state of its own. Concurrent lookups share the
//! indexer cache, which serializes regeneration per folder.

use std::sync::Arc;

use folio_index::{Entry, FolderData, FolderIndexer, FolderRef, IndexError, Page};
use folio_path::SitePath;

/// Title used for the root folder when its control file sets none.
const ROOT_TITLE: &str = "Home";

/// Error resolving a folder.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A segment of the path names no folder.
    #[error("Folder not found: {0}")]
    NotFound(SitePath),
    /// The directory behind a folder could not be indexed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// One step of a breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Display title.
    pub title: String,
    /// Logical path of the folder.
    pub path: SitePath,
}

/// The logical tree over a content directory.
pub struct PageTree {
    indexer: FolderIndexer,
}

impl PageTree {
    #[must_use]
    pub fn new(indexer: FolderIndexer) -> Self {
        Self { indexer }
    }

    /// Underlying indexer.
    #[must_use]
    pub fn indexer(&self) -> &FolderIndexer {
        &self.indexer
    }

    /// Indexed contents of the folder at `logical`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] if a path segment is not a folder, or
    /// [`TreeError::Index`] if a directory on the way cannot be indexed.
    pub fn folder(&self, logical: &SitePath) -> Result<Arc<FolderData>, TreeError> {
        let mut data = self.indexer.load_folder(&self.indexer.root_folder())?;
        for segment in logical.segments() {
            let next = match data.get(segment) {
                Some(Entry::Folder(folder)) => folder.clone(),
                _ => return Err(TreeError::NotFound(logical.to_absolute())),
            };
            data = self.indexer.load_folder(&next)?;
        }
        Ok(data)
    }

    /// The page at `logical`, if there is one.
    ///
    /// A path naming a folder yields that folder's index page. Routability is
    /// not checked here.
    #[must_use]
    pub fn page(&self, logical: &SitePath) -> Option<Page> {
        let Some(parent) = logical.parent() else {
            return self.index_page(&SitePath::root());
        };
        let name = logical.name()?;

        let data = self.lookup(&parent)?;
        match data.get(name)? {
            Entry::Page(page) => Some(page.clone()),
            Entry::Folder(_) => self.index_page(logical),
        }
    }

    /// Visible children of the folder at `logical`, in order.
    ///
    /// Hidden pages and folders are left out; they remain reachable by path.
    ///
    /// # Errors
    ///
    /// Same as [`folder`](Self::folder).
    pub fn children(&self, logical: &SitePath) -> Result<Vec<(String, Entry)>, TreeError> {
        let data = self.folder(logical)?;
        Ok(data
            .iter()
            .filter(|(_, entry)| !entry.is_hidden())
            .map(|(name, entry)| (name.to_owned(), entry.clone()))
            .collect())
    }

    /// Ancestor folders of `logical`, root first.
    ///
    /// The path itself is not included. The walk stops at the first ancestor
    /// that does not resolve.
    #[must_use]
    pub fn breadcrumbs(&self, logical: &SitePath) -> Vec<Breadcrumb> {
        let Some((_, ancestors)) = logical.segments().split_last() else {
            return Vec::new();
        };
        let Ok(mut data) = self.indexer.load_folder(&self.indexer.root_folder()) else {
            return Vec::new();
        };
        let mut crumbs = vec![Breadcrumb {
            title: folder_title(data.folder()),
            path: SitePath::root(),
        }];

        for segment in ancestors {
            let Some(Entry::Folder(folder)) = data.get(segment) else {
                break;
            };
            let folder = folder.clone();
            crumbs.push(Breadcrumb {
                title: folder_title(&folder),
                path: folder.logical_path().to_absolute(),
            });
            match self.indexer.load_folder(&folder) {
                Ok(next) => data = next,
                Err(_) => break,
            }
        }
        crumbs
    }

    /// Drop every cached folder so the next lookups rescan from disk.
    pub fn reindex_all(&self) -> usize {
        let removed = self.indexer.clear_cache(None);
        tracing::info!(removed, "Reindexed page tree");
        removed
    }

    /// Folder lookup for callers that treat failure as absence.
    fn lookup(&self, logical: &SitePath) -> Option<Arc<FolderData>> {
        self.folder(logical)
            .inspect_err(|e| tracing::debug!(path = %logical, error = %e, "Folder lookup failed"))
            .ok()
    }

    fn index_page(&self, folder: &SitePath) -> Option<Page> {
        let data = self.lookup(folder)?;
        data.get(self.indexer.index_name())
            .and_then(Entry::as_page)
            .cloned()
    }
}

fn folder_title(folder: &FolderRef) -> String {
    if folder.title().is_empty() {
        ROOT_TITLE.to_owned()
    } else {
        folder.title().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use folio_cache::{MemoryCache, NullCache};
    use folio_meta::{Interpreter, MarkupInterpreter, Multiplexer, StaticInterpreter};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn tree(root: &Path, cache: &dyn folio_cache::Cache) -> PageTree {
        let interpreter: Arc<dyn Interpreter> = Arc::new(Multiplexer::new(vec![
            Arc::new(MarkupInterpreter::default()) as Arc<dyn Interpreter>,
            Arc::new(StaticInterpreter::new(["html"])),
        ]));
        PageTree::new(FolderIndexer::new(root.to_path_buf(), interpreter, cache))
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Welcome");
        write(root, "about.md", "# About");
        write(root, "about.html", "<p>about</p>");
        write(root, "01_docs/index.md", "# Documentation");
        write(root, "01_docs/01_intro.md", "# Intro");
        write(root, "01_docs/draft.md", "---\nhidden: true\n---\n# Draft");
        write(root, "01_docs/guides/setup.md", "# Setup");
        write(root, "01_docs/guides/_folder.yaml", "title: How-To");
        write(root, "02_private/_folder.yaml", "hidden: true");
        write(root, "02_private/secret.md", "");
        dir
    }

    #[test]
    fn test_folder_root_and_nested() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let root = tree.folder(&SitePath::root()).unwrap();
        assert_eq!(root.names().collect::<Vec<_>>(), ["about", "index", "docs", "private"]);

        let guides = tree.folder(&SitePath::normalize("/docs/guides")).unwrap();
        assert_eq!(guides.names().collect::<Vec<_>>(), ["setup"]);
    }

    #[test]
    fn test_folder_not_found() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let err = tree.folder(&SitePath::normalize("/nope")).unwrap_err();
        assert!(matches!(err, TreeError::NotFound(path) if path.to_string() == "/nope"));

        // A page is not a folder
        assert!(tree.folder(&SitePath::normalize("/about")).is_err());
    }

    #[test]
    fn test_missing_root_is_index_error() {
        let dir = TempDir::new().unwrap();
        let tree = tree(&dir.path().join("missing"), &NullCache);
        assert!(matches!(tree.folder(&SitePath::root()), Err(TreeError::Index(_))));
    }

    #[test]
    fn test_page_lookup() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let about = tree.page(&SitePath::normalize("/about")).unwrap();
        assert_eq!(about.variants().len(), 2);

        let intro = tree.page(&SitePath::normalize("/docs/intro")).unwrap();
        assert_eq!(intro.title(), "Intro");

        assert!(tree.page(&SitePath::normalize("/docs/missing")).is_none());
        assert!(tree.page(&SitePath::normalize("/nope/missing")).is_none());
    }

    #[test]
    fn test_folder_path_yields_index_page() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let docs = tree.page(&SitePath::normalize("/docs")).unwrap();
        assert_eq!(docs.title(), "Documentation");
        assert_eq!(docs.logical_path().to_string(), "/docs/index");

        let home = tree.page(&SitePath::root()).unwrap();
        assert_eq!(home.title(), "Welcome");

        // Folder without an index page
        assert!(tree.page(&SitePath::normalize("/docs/guides")).is_none());
    }

    #[test]
    fn test_hidden_page_still_reachable() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        assert!(tree.page(&SitePath::normalize("/docs/draft")).is_some());
        assert!(tree.page(&SitePath::normalize("/private/secret")).is_some());
    }

    #[test]
    fn test_children_excludes_hidden() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let names: Vec<_> = tree
            .children(&SitePath::root())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["about", "docs"]);

        let names: Vec<_> = tree
            .children(&SitePath::normalize("/docs"))
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["guides", "intro"]);
    }

    #[test]
    fn test_breadcrumbs() {
        let dir = fixture();
        let tree = tree(dir.path(), &NullCache);

        let crumbs = tree.breadcrumbs(&SitePath::normalize("/docs/guides/setup"));
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    title: "Home".to_owned(),
                    path: SitePath::root(),
                },
                Breadcrumb {
                    title: "Docs".to_owned(),
                    path: SitePath::normalize("/docs"),
                },
                Breadcrumb {
                    title: "How-To".to_owned(),
                    path: SitePath::normalize("/docs/guides"),
                },
            ]
        );

        assert!(tree.breadcrumbs(&SitePath::root()).is_empty());
        assert_eq!(tree.breadcrumbs(&SitePath::normalize("/about")).len(), 1);
    }

    #[test]
    fn test_lookup_is_lazy() {
        let dir = fixture();
        let cache = MemoryCache::new();
        let tree = tree(dir.path(), &cache);

        let _ = tree.page(&SitePath::normalize("/docs/intro")).unwrap();

        // Root and docs were indexed; guides and private were not
        assert_eq!(tree.reindex_all(), 2);
    }

    #[test]
    fn test_reindex_is_idempotent() {
        let dir = fixture();
        let cache = MemoryCache::new();
        let tree = tree(dir.path(), &cache);
        let path = SitePath::normalize("/docs/guides");

        let before = tree.folder(&path).unwrap();
        tree.reindex_all();
        let after = tree.folder(&path).unwrap();
        assert_eq!(before, after);
    }
}
