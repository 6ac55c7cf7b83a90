//! Script pages backed by compiled-in Rust types.
//!
//! A file with a script extension (e.g. `contact.page`) marks where a script
//! lives in the tree. The behavior comes from a [`PageScript`] registered in a
//! [`ScriptRegistry`] under the file's path relative to the content root. A
//! marker file without a registered script is unsupported.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use folio_path::SitePath;

use crate::front_matter::FrontMatter;
use crate::interpreter::{InterpretError, Interpreter, SourceFile};
use crate::markup::effective_slug;
use crate::page_file::{PageFile, titlecase_from_slug};

/// Variables produced by a script entry point.
pub type ScriptOutput = BTreeMap<String, serde_json::Value>;

/// Declarative attributes of a script page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptAttributes {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub hidden: bool,
}

/// A page implemented in code.
pub trait PageScript: Send + Sync {
    /// HTTP methods this script answers, e.g. `["GET", "POST"]`.
    fn methods(&self) -> &[&str];

    /// Title, slug, and visibility. Defaults derive from the file name.
    fn attributes(&self) -> ScriptAttributes {
        ScriptAttributes::default()
    }

    /// Whether the script accepts trailing path segments.
    fn accepts_trailing_path(&self) -> bool {
        false
    }

    /// Run the entry point for `method`.
    ///
    /// Returning `None` declines the request.
    fn invoke(&self, method: &str, trailing: &[String]) -> Option<ScriptOutput>;
}

/// Scripts keyed by their marker file's path relative to the content root.
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Arc<dyn PageScript>>,
}

impl ScriptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `script` for the marker file at `relative` (e.g. `"about/contact.page"`).
    pub fn register(&mut self, relative: &str, script: Arc<dyn PageScript>) -> &mut Self {
        let key = SitePath::normalize(relative).key();
        if self.scripts.insert(key, script).is_some() {
            tracing::warn!(relative, "Replaced previously registered script");
        }
        self
    }

    /// Script registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn PageScript>> {
        self.scripts.get(key)
    }

    /// Registered scripts with their keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn PageScript>)> {
        self.scripts.iter().map(|(key, script)| (key.as_str(), script))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.scripts.keys().collect();
        keys.sort();
        f.debug_struct("ScriptRegistry").field("scripts", &keys).finish()
    }
}

/// Interprets script marker files through a [`ScriptRegistry`].
pub struct ScriptInterpreter {
    extensions: Vec<String>,
    registry: Arc<ScriptRegistry>,
}

impl ScriptInterpreter {
    #[must_use]
    pub fn new<I, S>(extensions: I, registry: Arc<ScriptRegistry>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            registry,
        }
    }
}

impl Interpreter for ScriptInterpreter {
    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn interpret(
        &self,
        source: &SourceFile,
        parent: &SitePath,
        base_name: &str,
    ) -> Result<PageFile, InterpretError> {
        let key = source.relative();
        let Some(script) = self.registry.get(key) else {
            return Err(InterpretError::UnregisteredScript {
                relative: key.to_owned(),
            });
        };

        let attrs = script.attributes();
        let logical =
            parent.join(effective_slug(attrs.slug.as_deref(), source).unwrap_or(base_name));
        let title = attrs
            .title
            .clone()
            .unwrap_or_else(|| titlecase_from_slug(base_name));
        let meta = FrontMatter {
            title: attrs.title,
            slug: attrs.slug,
            hidden: attrs.hidden,
            ..FrontMatter::default()
        };
        let methods = script.methods().iter().map(|m| m.to_ascii_uppercase());

        Ok(PageFile::new(
            source.path().to_path_buf(),
            logical,
            source.extension(),
            source.modified(),
            title,
            meta,
        )
        .with_entry_points(methods)
        .with_script(key))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    struct Contact;

    impl PageScript for Contact {
        fn methods(&self) -> &[&str] {
            &["get", "POST"]
        }

        fn attributes(&self) -> ScriptAttributes {
            ScriptAttributes {
                title: Some("Contact Us".to_owned()),
                slug: Some("contact-us".to_owned()),
                hidden: false,
            }
        }

        fn invoke(&self, method: &str, _trailing: &[String]) -> Option<ScriptOutput> {
            let mut out = ScriptOutput::new();
            out.insert("method".to_owned(), serde_json::json!(method));
            Some(out)
        }
    }

    struct Bare;

    impl PageScript for Bare {
        fn methods(&self) -> &[&str] {
            &["GET"]
        }

        fn invoke(&self, _method: &str, _trailing: &[String]) -> Option<ScriptOutput> {
            None
        }
    }

    fn source(dir: &TempDir, relative: &str) -> SourceFile {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "").unwrap();
        SourceFile::from_path(dir.path(), &path).unwrap()
    }

    #[test]
    fn test_registered_script_with_attributes() {
        let dir = TempDir::new().unwrap();
        let mut registry = ScriptRegistry::new();
        registry.register("about/contact.page", Arc::new(Contact));
        let interpreter = ScriptInterpreter::new(["page"], Arc::new(registry));

        let page = interpreter
            .interpret(
                &source(&dir, "about/contact.page"),
                &SitePath::normalize("/about"),
                "contact",
            )
            .unwrap();

        assert_eq!(page.title(), "Contact Us");
        assert_eq!(page.logical_path().to_string(), "/about/contact-us");
        assert_eq!(page.meta().slug.as_deref(), Some("contact-us"));
        assert_eq!(page.meta().title.as_deref(), Some("Contact Us"));
        assert_eq!(page.entry_points(), ["GET", "POST"]);
        assert_eq!(page.script(), Some("about/contact.page"));
    }

    #[test]
    fn test_defaults_from_base_name() {
        let dir = TempDir::new().unwrap();
        let mut registry = ScriptRegistry::new();
        registry.register("/status-board.page", Arc::new(Bare));
        let interpreter = ScriptInterpreter::new(["page"], Arc::new(registry));

        let page = interpreter
            .interpret(&source(&dir, "status-board.page"), &SitePath::root(), "status-board")
            .unwrap();

        assert_eq!(page.title(), "Status Board");
        assert_eq!(page.logical_path().to_string(), "/status-board");
    }

    #[test]
    fn test_unregistered_script_unsupported() {
        let dir = TempDir::new().unwrap();
        let interpreter = ScriptInterpreter::new(["page"], Arc::new(ScriptRegistry::new()));

        let err = interpreter
            .interpret(&source(&dir, "orphan.page"), &SitePath::root(), "orphan")
            .unwrap_err();
        assert!(matches!(err, InterpretError::UnregisteredScript { relative } if relative == "orphan.page"));
    }

    #[test]
    fn test_registry_debug_lists_keys() {
        let mut registry = ScriptRegistry::new();
        registry.register("b.page", Arc::new(Bare)).register("a.page", Arc::new(Bare));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            format!("{registry:?}"),
            r#"ScriptRegistry { scripts: ["a.page", "b.page"] }"#
        );
    }
}
