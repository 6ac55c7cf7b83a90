//! Files served as-is.

use folio_path::SitePath;

use crate::front_matter::FrontMatter;
use crate::interpreter::{InterpretError, Interpreter, SourceFile};
use crate::page_file::{PageFile, titlecase_from_slug};

/// Interprets files without reading them.
///
/// The title is the base name in title case and there is no metadata.
pub struct StaticInterpreter {
    extensions: Vec<String>,
}

impl StaticInterpreter {
    /// Claim the given extensions.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

impl Interpreter for StaticInterpreter {
    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn interpret(
        &self,
        source: &SourceFile,
        parent: &SitePath,
        base_name: &str,
    ) -> Result<PageFile, InterpretError> {
        Ok(PageFile::new(
            source.path().to_path_buf(),
            parent.join(base_name),
            source.extension(),
            source.modified(),
            titlecase_from_slug(base_name),
            FrontMatter::default(),
        ))
    }
}
