//! Wiring a configured page tree and router.

use std::sync::Arc;

use folio_cache::{Cache, FileCache, NullCache};
use folio_config::Config;
use folio_index::FolderIndexer;
use folio_meta::{
    Interpreter, MarkupInterpreter, Multiplexer, ScriptInterpreter, ScriptRegistry,
    StaticInterpreter,
};
use folio_router::{HandlerTable, PageHandler, Router, ScriptHandler, StaticFileHandler};
use folio_site::PageTree;

use crate::error::CliError;

/// Content type served for a static extension.
pub(crate) fn content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Build the page tree for `config`.
///
/// Scripts are compiled-in types; the CLI has none, so script files are only
/// recognised when a registry is supplied.
pub(crate) fn build_tree(config: &Config, registry: &Arc<ScriptRegistry>) -> Result<PageTree, CliError> {
    let source_dir = &config.content_resolved.source_dir;
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory does not exist: {}",
            source_dir.display()
        )));
    }

    tracing::info!(
        source_dir = %source_dir.display(),
        cache = config.cache_resolved.enabled,
        "Opening content tree"
    );

    let interpreters = &config.interpreters;
    let interpreter: Arc<dyn Interpreter> = Arc::new(Multiplexer::new(vec![
        Arc::new(MarkupInterpreter::new(&interpreters.markup_extensions)) as Arc<dyn Interpreter>,
        Arc::new(StaticInterpreter::new(&interpreters.static_extensions)),
        Arc::new(ScriptInterpreter::new(
            &interpreters.script_extensions,
            Arc::clone(registry),
        )),
    ]));

    let cache: Box<dyn Cache> = if config.cache_resolved.enabled {
        Box::new(FileCache::new(
            config.cache_resolved.dir.clone(),
            env!("CARGO_PKG_VERSION"),
        ))
    } else {
        Box::new(NullCache)
    };

    let indexer = FolderIndexer::new(source_dir.clone(), interpreter, cache.as_ref())
        .with_control_file(config.content_resolved.control_file.clone())
        .with_index_name(config.content_resolved.index_name.clone());
    Ok(PageTree::new(indexer))
}

/// Handler table for `config`: markup pages first, then static files, then
/// scripts.
pub(crate) fn build_table(config: &Config, registry: &Arc<ScriptRegistry>) -> HandlerTable {
    let interpreters = &config.interpreters;
    let mut table = HandlerTable::new();
    for extension in &interpreters.markup_extensions {
        PageHandler::register(&mut table, extension);
    }
    for extension in &interpreters.static_extensions {
        StaticFileHandler::register(&mut table, extension, content_type(extension));
    }
    ScriptHandler::register(
        &mut table,
        Arc::clone(registry),
        &interpreters.script_extensions,
    );
    table
}

/// Build a router over the configured content tree.
pub(crate) fn build_router(config: &Config) -> Result<Router, CliError> {
    let registry = Arc::new(ScriptRegistry::new());
    let tree = build_tree(config, &registry)?;
    Ok(Router::new(Arc::new(tree), build_table(config, &registry)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_config::CliSettings;
    use folio_router::{Request, RouteResult};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir) -> Config {
        let path = dir.path().join("folio.toml");
        fs::write(&path, "[content]\nsource_dir = \"content\"\n").unwrap();
        let settings = CliSettings {
            cache_enabled: Some(false),
            ..Default::default()
        };
        Config::load(Some(&path), Some(&settings)).unwrap()
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("HTML"), "text/html");
        assert_eq!(content_type("txt"), "text/plain");
        assert_eq!(content_type("bin"), "application/octet-stream");
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        assert!(matches!(build_router(&config), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_router_serves_configured_extensions() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("content/guide.md"), "# Guide").unwrap();
        fs::write(dir.path().join("content/notes.txt"), "notes").unwrap();

        let router = build_router(&config).unwrap();
        let result = router.route(&Request::get("/guide"));
        assert_eq!(result.as_match().unwrap().handler.name(), "page");

        let result = router.route(&Request::get("/notes"));
        assert_eq!(result.as_match().unwrap().handler.name(), "static:text/plain");

        assert!(matches!(
            router.route(&Request::get("/nothing")),
            RouteResult::NotFound
        ));
    }
}
