//! Built-in handlers.
//!
//! - [`StaticFileHandler`]: serves a file as a fixed content type, honoring `Accept`
//! - [`PageHandler`]: hands a page descriptor to a renderer
//! - [`ScriptHandler`]: runs [`PageScript`](folio_meta::PageScript) entry points

use std::collections::BTreeSet;
use std::sync::Arc;

use folio_meta::ScriptRegistry;
use serde_json::json;

use crate::handler::{Handler, HandlerTable, RouteContext, Variables};

/// Methods served by read-only handlers.
const READ_METHODS: [&str; 2] = ["GET", "HEAD"];

/// Serves files as-is with a fixed content type.
///
/// Declines when the request's `Accept` header excludes the content type.
#[derive(Debug)]
pub struct StaticFileHandler {
    name: String,
    content_type: String,
}

impl StaticFileHandler {
    #[must_use]
    pub fn new(content_type: &str) -> Self {
        Self {
            name: format!("static:{content_type}"),
            content_type: content_type.to_owned(),
        }
    }

    /// Register a handler for `GET` and `HEAD` on `extension`.
    pub fn register(table: &mut HandlerTable, extension: &str, content_type: &str) {
        let handler: Arc<dyn Handler> = Arc::new(Self::new(content_type));
        for method in READ_METHODS {
            table.register(extension, method, Arc::clone(&handler));
        }
    }

    /// Whether an `Accept` header value admits this handler's content type.
    fn accepts(&self, accept: &str) -> bool {
        let (kind, _) = self
            .content_type
            .split_once('/')
            .unwrap_or((self.content_type.as_str(), ""));

        accept
            .split(',')
            .map(|range| range.split(';').next().unwrap_or("").trim())
            .any(|range| {
                range == "*/*"
                    || range.eq_ignore_ascii_case(&self.content_type)
                    || range
                        .strip_suffix("/*")
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(kind))
            })
    }
}

impl Handler for StaticFileHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Option<Variables> {
        if let Some(accept) = ctx.request.header("accept")
            && !self.accepts(accept)
        {
            tracing::debug!(
                path = %ctx.request.path(),
                accept,
                content_type = %self.content_type,
                "Static file declined by Accept header"
            );
            return None;
        }

        let mut vars = Variables::new();
        vars.insert(
            "file".to_owned(),
            json!(ctx.variant.physical_path().to_string_lossy()),
        );
        vars.insert("content_type".to_owned(), json!(self.content_type));
        vars.insert("title".to_owned(), json!(ctx.variant.title()));
        Some(vars)
    }
}

/// Exposes a page's descriptor for rendering.
///
/// Variables: `title`, `path`, `file`, `extension`, and `meta` (front matter).
#[derive(Debug, Default)]
pub struct PageHandler;

impl PageHandler {
    /// Register for `GET` and `HEAD` on `extension`.
    pub fn register(table: &mut HandlerTable, extension: &str) {
        let handler: Arc<dyn Handler> = Arc::new(Self);
        for method in READ_METHODS {
            table.register(extension, method, Arc::clone(&handler));
        }
    }
}

impl Handler for PageHandler {
    fn name(&self) -> &str {
        "page"
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Option<Variables> {
        let variant = ctx.variant;
        let meta = serde_json::to_value(variant.meta())
            .inspect_err(|e| tracing::warn!(path = %variant.logical_path(), error = %e, "Failed to serialize front matter"))
            .ok()?;

        let mut vars = Variables::new();
        vars.insert("title".to_owned(), json!(variant.title()));
        vars.insert("path".to_owned(), json!(ctx.page.logical_path().to_string()));
        vars.insert(
            "file".to_owned(),
            json!(variant.physical_path().to_string_lossy()),
        );
        vars.insert("extension".to_owned(), json!(variant.extension()));
        vars.insert("meta".to_owned(), meta);
        Some(vars)
    }
}

/// Runs script pages through their registered [`PageScript`](folio_meta::PageScript).
pub struct ScriptHandler {
    registry: Arc<ScriptRegistry>,
}

impl ScriptHandler {
    #[must_use]
    pub fn new(registry: Arc<ScriptRegistry>) -> Self {
        Self { registry }
    }

    /// Register entry points of every script for each of `extensions`.
    ///
    /// The handler is registered once per method any script declares; which
    /// page answers which method is decided per variant.
    pub fn register<I, S>(table: &mut HandlerTable, registry: Arc<ScriptRegistry>, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods: BTreeSet<String> = registry
            .iter()
            .flat_map(|(_, script)| script.methods().iter().map(|m| m.to_ascii_uppercase()))
            .collect();

        let handler: Arc<dyn Handler> = Arc::new(Self::new(registry));
        for extension in extensions {
            for method in &methods {
                table.register(extension.as_ref(), method, Arc::clone(&handler));
            }
        }
    }
}

impl Handler for ScriptHandler {
    fn name(&self) -> &str {
        "script"
    }

    fn trailing_path(&self, variant: &folio_meta::PageFile) -> bool {
        variant
            .script()
            .and_then(|key| self.registry.get(key))
            .is_some_and(|script| script.accepts_trailing_path())
    }

    fn supports(&self, variant: &folio_meta::PageFile, method: &str) -> bool {
        variant.has_entry_point(method)
    }

    fn handle(&self, ctx: &RouteContext<'_>) -> Option<Variables> {
        let key = ctx.variant.script()?;
        let script = self.registry.get(key)?;
        if !ctx.trailing.is_empty() && !script.accepts_trailing_path() {
            return None;
        }
        let output = script.invoke(ctx.request.method(), ctx.trailing)?;
        Some(output.into_iter().collect())
    }
}

impl std::fmt::Debug for ScriptHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHandler")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_matching() {
        let handler = StaticFileHandler::new("text/html");
        assert!(handler.accepts("text/html"));
        assert!(handler.accepts("application/json, text/html;q=0.9"));
        assert!(handler.accepts("*/*"));
        assert!(handler.accepts("text/*"));
        assert!(handler.accepts("TEXT/HTML"));
        assert!(!handler.accepts("application/json"));
        assert!(!handler.accepts("image/*"));
    }

    #[test]
    fn test_static_register_read_methods() {
        let mut table = HandlerTable::new();
        StaticFileHandler::register(&mut table, "html", "text/html");
        assert_eq!(table.methods("html"), ["GET", "HEAD"]);
        assert_eq!(table.handlers("html", "GET")[0].name(), "static:text/html");
    }
}
