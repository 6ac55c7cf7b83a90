//! The normalized page descriptor.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use folio_path::SitePath;
use serde::{Deserialize, Serialize};

use crate::front_matter::FrontMatter;

/// One physical file interpreted as a page.
///
/// Created by an [`Interpreter`](crate::Interpreter) while a folder is
/// indexed and never mutated afterwards; a reindex builds new descriptors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageFile {
    physical_path: PathBuf,
    logical_path: SitePath,
    extension: String,
    modified: SystemTime,
    title: String,
    #[serde(default)]
    meta: FrontMatter,
    /// HTTP methods exposed by script pages (empty for content files).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entry_points: Vec<String>,
    /// Registry key of the script behind a script page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script: Option<String>,
    #[serde(default)]
    hidden: bool,
}

impl PageFile {
    /// Create a descriptor.
    ///
    /// The page is hidden when its front matter says so.
    #[must_use]
    pub fn new(
        physical_path: PathBuf,
        logical_path: SitePath,
        extension: &str,
        modified: SystemTime,
        title: String,
        meta: FrontMatter,
    ) -> Self {
        let hidden = meta.hidden;
        Self {
            physical_path,
            logical_path,
            extension: extension.to_owned(),
            modified,
            title,
            meta,
            entry_points: Vec::new(),
            script: None,
            hidden,
        }
    }

    /// Attach the HTTP methods a script page answers.
    #[must_use]
    pub fn with_entry_points<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Bind the page to a registered script.
    #[must_use]
    pub fn with_script(mut self, key: impl Into<String>) -> Self {
        self.script = Some(key.into());
        self
    }

    /// Mark the page hidden from listings.
    ///
    /// Used for a folder's own index page. Hidden pages stay reachable by path.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// On-disk location of the source file.
    #[must_use]
    pub fn physical_path(&self) -> &Path {
        &self.physical_path
    }

    /// Position in the resolved tree.
    #[must_use]
    pub fn logical_path(&self) -> &SitePath {
        &self.logical_path
    }

    /// Lowercase file extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Source file modification time.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Resolved title (explicit metadata > heading > file name).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Front matter payload.
    #[must_use]
    pub fn meta(&self) -> &FrontMatter {
        &self.meta
    }

    /// HTTP methods exposed by a script page.
    #[must_use]
    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }

    /// Whether the page answers `method` through a script entry point.
    #[must_use]
    pub fn has_entry_point(&self, method: &str) -> bool {
        self.entry_points
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Registry key of the backing script, for script pages.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Whether the page is excluded from listings.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the router may serve this file (front matter `routable`).
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.meta.routable
    }
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
///
/// # Examples
///
/// ```
/// use folio_meta::titlecase_from_slug;
///
/// assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
/// assert_eq!(titlecase_from_slug("my_page"), "My Page");
/// ```
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}
