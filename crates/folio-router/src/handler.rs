//! Handler capability and the registration table.

use std::collections::HashMap;
use std::sync::Arc;

use folio_index::Page;
use folio_meta::PageFile;

use crate::request::Request;

/// Variables extracted for a matched route.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// Everything a handler sees when asked to serve a request.
#[derive(Clone, Copy, Debug)]
pub struct RouteContext<'a> {
    pub request: &'a Request,
    pub page: &'a Page,
    /// The variant being tried.
    pub variant: &'a PageFile,
    /// Path segments beyond the page's own path.
    pub trailing: &'a [String],
}

/// Serves one content type for one or more methods.
pub trait Handler: Send + Sync {
    /// Identifier for logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether this handler accepts requests with trailing path segments
    /// for `variant`.
    ///
    /// Consulted both for matching and for the allowed-method set.
    fn trailing_path(&self, _variant: &PageFile) -> bool {
        false
    }

    /// Whether this handler can serve `method` for `variant` at all.
    ///
    /// Consulted both for matching and for the allowed-method set.
    fn supports(&self, _variant: &PageFile, _method: &str) -> bool {
        true
    }

    /// Try to serve the request. `None` declines, letting the next handler try.
    fn handle(&self, ctx: &RouteContext<'_>) -> Option<Variables>;
}

/// `(extension, method)` to ordered handlers.
///
/// Filled before serving and read-only while routing. Extensions are
/// remembered in registration order, which decides which variant of a page is
/// tried first.
#[derive(Clone, Default)]
pub struct HandlerTable {
    extensions: Vec<String>,
    methods: HashMap<String, Vec<String>>,
    handlers: HashMap<(String, String), Vec<Arc<dyn Handler>>>,
}

impl HandlerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` for `extension` and `method`.
    pub fn register(&mut self, extension: &str, method: &str, handler: Arc<dyn Handler>) -> &mut Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        let method = method.to_ascii_uppercase();

        if !self.extensions.contains(&extension) {
            self.extensions.push(extension.clone());
        }
        let methods = self.methods.entry(extension.clone()).or_default();
        if !methods.contains(&method) {
            methods.push(method.clone());
        }
        self.handlers
            .entry((extension, method))
            .or_default()
            .push(handler);
        self
    }

    /// Extensions in registration order.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Methods registered for `extension`, in registration order.
    #[must_use]
    pub fn methods(&self, extension: &str) -> &[String] {
        self.methods.get(extension).map_or(&[], Vec::as_slice)
    }

    /// Handlers for `(extension, method)`, in registration order.
    #[must_use]
    pub fn handlers(&self, extension: &str, method: &str) -> &[Arc<dyn Handler>] {
        self.handlers
            .get(&(extension.to_owned(), method.to_owned()))
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for ext in &self.extensions {
            for method in self.methods(ext) {
                let names: Vec<&str> = self.handlers(ext, method).iter().map(|h| h.name()).collect();
                map.entry(&format!("{ext} {method}"), &names);
            }
        }
        map.finish()
    }
}
