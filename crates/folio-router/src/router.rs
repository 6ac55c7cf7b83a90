//! Request resolution.
//!
//! [`Router::route`] finds the page for a request and the handler that serves
//! it:
//!
//! 1. If the last segment carries a registered extension and a page exists at
//!    the extension-less path, only that variant of the page is considered
//! 2. Otherwise walk from the full path toward the root until a page is
//!    found; segments past the page become the trailing path
//! 3. Non-routable pages are not found
//! 4. Variants are tried in handler-table extension order; for each, the
//!    handlers registered for the request method are tried in order. With a
//!    trailing path only trailing-capable handlers qualify
//! 5. The first handler returning variables wins
//! 6. A page with handlers for other methods only yields
//!    [`RouteResult::MethodNotAllowed`]

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use folio_index::Page;
use folio_path::SitePath;
use folio_site::PageTree;

use crate::handler::{Handler, HandlerTable, RouteContext, Variables};
use crate::request::Request;

/// Requests with more segments than this are not walked.
const MAX_SEGMENTS: usize = 64;

/// A successful match.
#[derive(Clone)]
pub struct RouteMatch {
    pub handler: Arc<dyn Handler>,
    pub method: String,
    pub variables: Variables,
    /// The resolved page.
    pub page: Page,
    /// Extension of the variant that was served.
    pub extension: String,
    /// Segments past the page path.
    pub trailing: Vec<String>,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("handler", &self.handler.name())
            .field("method", &self.method)
            .field("page", &self.page.logical_path().to_string())
            .field("extension", &self.extension)
            .field("trailing", &self.trailing)
            .field("variables", &self.variables)
            .finish()
    }
}

/// Outcome of routing one request.
#[derive(Clone, Debug)]
pub enum RouteResult {
    Success(Box<RouteMatch>),
    NotFound,
    /// The page exists but has no handler for the method.
    MethodNotAllowed { allowed: BTreeSet<String> },
}

impl RouteResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The match, if routing succeeded.
    #[must_use]
    pub fn as_match(&self) -> Option<&RouteMatch> {
        match self {
            Self::Success(m) => Some(m),
            _ => None,
        }
    }
}

/// Resolves requests against a [`PageTree`] and a [`HandlerTable`].
///
/// Holds no per-request state; one router serves concurrent requests.
pub struct Router {
    tree: Arc<PageTree>,
    table: HandlerTable,
}

impl Router {
    #[must_use]
    pub fn new(tree: Arc<PageTree>, table: HandlerTable) -> Self {
        Self { tree, table }
    }

    #[must_use]
    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    #[must_use]
    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    /// Route a request.
    #[must_use]
    pub fn route(&self, request: &Request) -> RouteResult {
        let path = request.path();
        if path.len() > MAX_SEGMENTS {
            tracing::debug!(path = %path, "Path too deep to route");
            return RouteResult::NotFound;
        }

        if let Some(extension) = path.extension() {
            let extension = extension.to_ascii_lowercase();
            if self.table.extensions().contains(&extension)
                && let Some(page) = self.tree.page(&path.without_extension())
            {
                if page.variant(&extension).is_none() {
                    return RouteResult::NotFound;
                }
                return self.dispatch(request, &page, Some(&extension), &[]);
            }
        }

        let segments = path.segments();
        for split in (0..=segments.len()).rev() {
            let (head, trailing) = segments.split_at(split);
            if let Some(page) = self.tree.page(&SitePath::absolute(head)) {
                return self.dispatch(request, &page, None, trailing);
            }
        }
        RouteResult::NotFound
    }

    fn dispatch(
        &self,
        request: &Request,
        page: &Page,
        only_extension: Option<&str>,
        trailing: &[String],
    ) -> RouteResult {
        if !page.is_routable() {
            return RouteResult::NotFound;
        }

        let mut allowed = BTreeSet::new();
        let mut declined = false;

        for extension in self.table.extensions() {
            if only_extension.is_some_and(|only| only != extension) {
                continue;
            }
            let Some(variant) = page.variant(extension) else {
                continue;
            };
            if !variant.is_routable() {
                continue;
            }

            for method in self.table.methods(extension) {
                let eligible: Vec<&Arc<dyn Handler>> = self
                    .table
                    .handlers(extension, method)
                    .iter()
                    .filter(|h| trailing.is_empty() || h.trailing_path(variant))
                    .filter(|h| h.supports(variant, method))
                    .collect();
                if eligible.is_empty() {
                    continue;
                }
                allowed.insert(method.clone());
                if method != request.method() {
                    continue;
                }

                let ctx = RouteContext {
                    request,
                    page,
                    variant,
                    trailing,
                };
                for handler in eligible {
                    if let Some(variables) = handler.handle(&ctx) {
                        tracing::debug!(
                            path = %request.path(),
                            page = %page.logical_path(),
                            extension = extension.as_str(),
                            handler = handler.name(),
                            "Routed request"
                        );
                        return RouteResult::Success(Box::new(RouteMatch {
                            handler: Arc::clone(handler),
                            method: method.clone(),
                            variables,
                            page: page.clone(),
                            extension: extension.clone(),
                            trailing: trailing.to_vec(),
                        }));
                    }
                    declined = true;
                }
            }
        }

        if allowed.is_empty() || declined {
            RouteResult::NotFound
        } else {
            RouteResult::MethodNotAllowed { allowed }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_cache::NullCache;
    use folio_index::FolderIndexer;
    use folio_meta::{Interpreter, MarkupInterpreter};
    use tempfile::TempDir;

    use super::*;
    use crate::handler::HandlerTable;
    use crate::handlers::PageHandler;

    struct Declining;

    impl Handler for Declining {
        fn name(&self) -> &str {
            "declining"
        }

        fn handle(&self, _ctx: &RouteContext<'_>) -> Option<Variables> {
            None
        }
    }

    fn router(dir: &TempDir, table: HandlerTable) -> Router {
        let interpreter: Arc<dyn Interpreter> = Arc::new(MarkupInterpreter::default());
        let indexer = FolderIndexer::new(dir.path().to_path_buf(), interpreter, &NullCache);
        Router::new(Arc::new(PageTree::new(indexer)), table)
    }

    #[test]
    fn test_too_many_segments_not_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.md"), "# Home").unwrap();
        let mut table = HandlerTable::new();
        PageHandler::register(&mut table, "md");
        let router = router(&dir, table);

        let deep = "/a".repeat(MAX_SEGMENTS + 1);
        assert!(matches!(router.route(&Request::get(&deep)), RouteResult::NotFound));
        assert!(router.route(&Request::get("/")).is_success());
    }

    #[test]
    fn test_all_handlers_declining_is_not_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.md"), "# Page").unwrap();
        let mut table = HandlerTable::new();
        table.register("md", "GET", Arc::new(Declining));
        let router = router(&dir, table);

        assert!(matches!(router.route(&Request::get("/page")), RouteResult::NotFound));
        assert!(matches!(
            router.route(&Request::new("POST", "/page")),
            RouteResult::MethodNotAllowed { .. }
        ));
    }

    #[test]
    fn test_dotted_page_name_is_not_an_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v1.md"), "# Version 1").unwrap();
        fs::write(dir.path().join("v1.2.md"), "# Version 1.2").unwrap();
        let mut table = HandlerTable::new();
        PageHandler::register(&mut table, "md");
        let router = router(&dir, table);

        let result = router.route(&Request::get("/v1.2"));
        let m = result.as_match().unwrap();
        assert_eq!(m.page.logical_path().to_string(), "/v1.2");
        assert_eq!(m.variables["title"], serde_json::json!("Version 1.2"));

        let result = router.route(&Request::get("/v1.md"));
        assert_eq!(result.as_match().unwrap().page.logical_path().to_string(), "/v1");
    }

    #[test]
    fn test_empty_table_not_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.md"), "# Page").unwrap();
        let router = router(&dir, HandlerTable::new());

        let result = router.route(&Request::get("/page"));
        assert!(!result.is_success());
        assert!(result.as_match().is_none());
        assert!(matches!(result, RouteResult::NotFound));
    }
}
