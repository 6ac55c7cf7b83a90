//! Request routing for Folio.
//!
//! Resolves a [`Request`] against the [`PageTree`](folio_site::PageTree) and a
//! [`HandlerTable`] of per-extension, per-method [`Handler`]s, producing a
//! [`RouteResult`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_cache::MemoryCache;
//! use folio_index::FolderIndexer;
//! use folio_meta::MarkupInterpreter;
//! use folio_router::{HandlerTable, PageHandler, Request, RouteResult, Router};
//! use folio_site::PageTree;
//!
//! let cache = MemoryCache::new();
//! let indexer = FolderIndexer::new(
//!     PathBuf::from("content"),
//!     Arc::new(MarkupInterpreter::default()),
//!     &cache,
//! );
//! let mut table = HandlerTable::new();
//! PageHandler::register(&mut table, "md");
//!
//! let router = Router::new(Arc::new(PageTree::new(indexer)), table);
//! match router.route(&Request::get("/docs/intro")) {
//!     RouteResult::Success(m) => println!("{} -> {:?}", m.handler.name(), m.variables),
//!     RouteResult::NotFound => println!("404"),
//!     RouteResult::MethodNotAllowed { allowed } => println!("405, allow {allowed:?}"),
//! }
//! ```

mod handler;
mod handlers;
mod request;
mod router;

pub use handler::{Handler, HandlerTable, RouteContext, Variables};
pub use handlers::{PageHandler, ScriptHandler, StaticFileHandler};
pub use request::Request;
pub use router::{RouteMatch, RouteResult, Router};
