//! Interpreter trait, source file handle, and the multiplexer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use folio_path::{SitePath, split_extension};

use crate::page_file::PageFile;

/// A file handed to an [`Interpreter`].
#[derive(Clone, Debug)]
pub struct SourceFile {
    path: PathBuf,
    relative: String,
    extension: String,
    modified: SystemTime,
}

impl SourceFile {
    /// Describe `path`, which must live under the content `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read or `path` is not
    /// inside `root`.
    pub fn from_path(root: &Path, path: &Path) -> io::Result<Self> {
        let modified = fs::metadata(path)?.modified()?;
        Self::with_modified(root, path, modified)
    }

    /// Describe `path` with an already known modification time.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not inside `root`.
    pub fn with_modified(root: &Path, path: &Path, modified: SystemTime) -> io::Result<Self> {
        let relative = path.strip_prefix(root).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside {}", path.display(), root.display()),
            )
        })?;
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = split_extension(&file_name)
            .1
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            relative,
            extension,
            modified,
        })
    }

    /// Absolute (or root-joined) location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location relative to the content root, `/`-separated.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Lowercase extension without the dot (empty when there is none).
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Modification time.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Read the whole file as UTF-8.
    pub(crate) fn read_text(&self) -> Result<String, InterpretError> {
        let bytes = fs::read(&self.path).map_err(|source| InterpretError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| InterpretError::InvalidEncoding {
            path: self.path.clone(),
        })
    }
}

/// Reasons a file is not turned into a page.
///
/// Every variant means "skip this file"; none of them aborts indexing.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// No interpreter is registered for the extension.
    #[error("unsupported extension: {extension:?}")]
    UnsupportedExtension { extension: String },

    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },

    /// A script marker file has no registered script.
    #[error("no script registered for {relative}")]
    UnregisteredScript { relative: String },
}

/// Turns one source file into a [`PageFile`].
pub trait Interpreter: Send + Sync {
    /// Lowercase extensions this interpreter claims.
    fn extensions(&self) -> &[String];

    /// Interpret `source` as a page under `parent`.
    ///
    /// `base_name` is the file stem with any ordering prefix already removed.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError`] when the file is unsupported.
    fn interpret(
        &self,
        source: &SourceFile,
        parent: &SitePath,
        base_name: &str,
    ) -> Result<PageFile, InterpretError>;

    /// Whether `extension` is claimed.
    fn supports(&self, extension: &str) -> bool {
        self.extensions().iter().any(|e| e == extension)
    }
}

/// Tries each registered interpreter for an extension in order.
///
/// The first interpreter that returns a page wins. The set of supported
/// extensions is the union of the sub-interpreters' sets.
pub struct Multiplexer {
    interpreters: Vec<Arc<dyn Interpreter>>,
    extensions: Vec<String>,
}

impl Multiplexer {
    /// Combine interpreters. Earlier entries take precedence.
    #[must_use]
    pub fn new(interpreters: Vec<Arc<dyn Interpreter>>) -> Self {
        let mut extensions: Vec<String> = Vec::new();
        for interpreter in &interpreters {
            for ext in interpreter.extensions() {
                if !extensions.contains(ext) {
                    extensions.push(ext.clone());
                }
            }
        }
        Self {
            interpreters,
            extensions,
        }
    }
}

impl Interpreter for Multiplexer {
    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn interpret(
        &self,
        source: &SourceFile,
        parent: &SitePath,
        base_name: &str,
    ) -> Result<PageFile, InterpretError> {
        let mut last_error = None;
        for interpreter in &self.interpreters {
            if !interpreter.supports(source.extension()) {
                continue;
            }
            match interpreter.interpret(source, parent, base_name) {
                Ok(page) => return Ok(page),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| InterpretError::UnsupportedExtension {
            extension: source.extension().to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{MarkupInterpreter, StaticInterpreter};

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> SourceFile {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        SourceFile::from_path(dir.path(), &path).unwrap()
    }

    /// Claims `md` but rejects everything.
    struct Rejecting(Vec<String>);

    impl Interpreter for Rejecting {
        fn extensions(&self) -> &[String] {
            &self.0
        }

        fn interpret(&self, source: &SourceFile, _: &SitePath, _: &str) -> Result<PageFile, InterpretError> {
            Err(InterpretError::InvalidEncoding {
                path: source.path().to_path_buf(),
            })
        }
    }

    #[test]
    fn test_source_file_fields() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let source = write(&dir, "docs/Guide.MD", b"text");

        assert_eq!(source.relative(), "docs/Guide.MD");
        assert_eq!(source.extension(), "md");
    }

    #[test]
    fn test_source_file_outside_root() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let path = other.path().join("a.md");
        fs::write(&path, "x").unwrap();

        let err = SourceFile::from_path(dir.path(), &path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_source_file_without_extension() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "LICENSE", b"text");
        assert_eq!(source.extension(), "");
    }

    #[test]
    fn test_multiplexer_extension_union() {
        let mux = Multiplexer::new(vec![
            Arc::new(MarkupInterpreter::new(["md"])) as Arc<dyn Interpreter>,
            Arc::new(StaticInterpreter::new(["html", "md"])),
        ]);
        assert_eq!(mux.extensions(), ["md", "html"]);
        assert!(mux.supports("html"));
        assert!(!mux.supports("png"));
    }

    #[test]
    fn test_multiplexer_first_success_wins() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "about.md", b"# About Us\n");

        let mux = Multiplexer::new(vec![
            Arc::new(Rejecting(vec!["md".to_owned()])) as Arc<dyn Interpreter>,
            Arc::new(MarkupInterpreter::new(["md"])),
            Arc::new(StaticInterpreter::new(["md"])),
        ]);
        let page = mux.interpret(&source, &SitePath::root(), "about").unwrap();
        assert_eq!(page.title(), "About Us");
    }

    #[test]
    fn test_multiplexer_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "image.png", b"\x89PNG");

        let mux = Multiplexer::new(vec![Arc::new(MarkupInterpreter::default()) as Arc<dyn Interpreter>]);
        let err = mux.interpret(&source, &SitePath::root(), "image").unwrap_err();
        assert!(matches!(err, InterpretError::UnsupportedExtension { extension } if extension == "png"));
    }

    #[test]
    fn test_multiplexer_all_rejected_returns_last_error() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "about.md", b"text");

        let mux = Multiplexer::new(vec![Arc::new(Rejecting(vec!["md".to_owned()])) as Arc<dyn Interpreter>]);
        let err = mux.interpret(&source, &SitePath::root(), "about").unwrap_err();
        assert!(matches!(err, InterpretError::InvalidEncoding { .. }));
    }
}
