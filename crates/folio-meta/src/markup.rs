//! Markup files with YAML front matter.

use folio_path::{SEPARATOR, SitePath};

use crate::front_matter::{FrontMatter, MarkupDocument, split_front_matter};
use crate::interpreter::{InterpretError, Interpreter, SourceFile};
use crate::page_file::{PageFile, titlecase_from_slug};

/// Interprets text files carrying an optional front matter block.
///
/// Title resolution: front matter `title`, then a leading `# Heading`, then
/// the base name in title case. A front matter `slug` replaces the base name
/// in the logical path.
pub struct MarkupInterpreter {
    extensions: Vec<String>,
}

impl MarkupInterpreter {
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

impl Default for MarkupInterpreter {
    fn default() -> Self {
        Self::new(["md", "markdown"])
    }
}

impl Interpreter for MarkupInterpreter {
    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn interpret(
        &self,
        source: &SourceFile,
        parent: &SitePath,
        base_name: &str,
    ) -> Result<PageFile, InterpretError> {
        let content = source.read_text()?;

        let doc = MarkupDocument::parse(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %source.path().display(),
                error = %e,
                "Ignoring malformed front matter"
            );
            let (_, body) = split_front_matter(&content);
            MarkupDocument::from_body(FrontMatter::default(), body)
        });

        let title = doc
            .title()
            .map_or_else(|| titlecase_from_slug(base_name), str::to_owned);
        let name = effective_slug(doc.meta.slug.as_deref(), source).unwrap_or(base_name);
        let logical = parent.join(name);

        Ok(PageFile::new(
            source.path().to_path_buf(),
            logical,
            source.extension(),
            source.modified(),
            title,
            doc.meta,
        ))
    }
}

/// A usable slug: non-empty, single segment.
pub(crate) fn effective_slug<'a>(slug: Option<&'a str>, source: &SourceFile) -> Option<&'a str> {
    let slug = slug.map(str::trim).filter(|s| !s.is_empty())?;
    if slug.contains(SEPARATOR) || slug == "." || slug == ".." {
        tracing::warn!(
            path = %source.path().display(),
            slug,
            "Ignoring slug that is not a single path segment"
        );
        return None;
    }
    Some(slug)
}
