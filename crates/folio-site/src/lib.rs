//! Page tree for Folio.
//!
//! [`PageTree`] is the navigable facade over [`FolderIndexer`]: it resolves
//! logical paths to folders and pages, lists visible children, builds
//! breadcrumbs, and drops every cached folder on [`PageTree::reindex_all`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_cache::MemoryCache;
//! use folio_index::FolderIndexer;
//! use folio_meta::MarkupInterpreter;
//! use folio_path::SitePath;
//! use folio_site::PageTree;
//!
//! let cache = MemoryCache::new();
//! let indexer = FolderIndexer::new(
//!     PathBuf::from("content"),
//!     Arc::new(MarkupInterpreter::default()),
//!     &cache,
//! );
//! let tree = PageTree::new(indexer);
//!
//! if let Some(page) = tree.page(&SitePath::normalize("/docs/intro")) {
//!     println!("{}", page.title());
//! }
//! ```
//!
//! [`FolderIndexer`]: folio_index::FolderIndexer

mod tree;

pub use tree::{Breadcrumb, PageTree, TreeError};
