//! Folder indexing for Folio.
//!
//! Turns a physical directory into an ordered, named set of pages and
//! sub-folders ([`FolderData`]), caching the result until the directory
//! changes.
//!
//! # Conventions
//!
//! - `01_intro.md` is listed as `intro` with order key 1 (see [`strip_order_prefix`])
//! - `about.md` and `about.html` form one [`Page`] with two variants
//! - `index.*` is the folder's own page: hidden from listings, still routable
//! - `_folder.yaml` controls order, flattening, visibility, and title
//!   (see [`FolderControlData`])
//! - Dot files and directories are ignored
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_cache::MemoryCache;
//! use folio_index::FolderIndexer;
//! use folio_meta::MarkupInterpreter;
//!
//! let cache = MemoryCache::new();
//! let indexer = FolderIndexer::new(
//!     PathBuf::from("content"),
//!     Arc::new(MarkupInterpreter::default()),
//!     &cache,
//! );
//! let root = indexer.load_folder(&indexer.root_folder())?;
//! for (name, entry) in root.iter() {
//!     println!("{name}: {}", entry.title());
//! }
//! # Ok::<(), folio_index::IndexError>(())
//! ```

mod control;
mod error;
mod folder;
mod indexer;
mod ordering;

pub use control::{FolderControlData, SortOrder};
pub use error::{IndexError, IndexErrorKind};
pub use folder::{Entry, FolderData, FolderRef, Page};
pub use indexer::{DEFAULT_CONTROL_FILE, DEFAULT_INDEX_NAME, FolderIndexer};
pub use ordering::strip_order_prefix;
