//! Index error type.

use std::path::PathBuf;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum IndexErrorKind {
    /// Directory does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Path exists but is not a directory.
    NotADirectory,
    /// Other/unknown error category.
    Other,
}

/// Failure to index one directory.
///
/// Only raised for the directory being looked up; problems with individual
/// children are logged and skipped.
#[derive(Debug)]
pub struct IndexError {
    /// Semantic error category.
    pub kind: IndexErrorKind,
    /// Physical path context (if applicable).
    pub path: Option<PathBuf>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl IndexError {
    /// Create a new index error.
    #[must_use]
    pub fn new(kind: IndexErrorKind) -> Self {
        Self {
            kind,
            path: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(IndexErrorKind::NotFound).with_path(path)
    }

    /// Create an index error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => IndexErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => IndexErrorKind::PermissionDenied,
            std::io::ErrorKind::NotADirectory => IndexErrorKind::NotADirectory,
            _ => IndexErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }

    /// Whether the directory is missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == IndexErrorKind::NotFound
    }
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "Kind: message (path: /foo/bar)"
        let kind_str = match self.kind {
            IndexErrorKind::NotFound => "Not found",
            IndexErrorKind::PermissionDenied => "Permission denied",
            IndexErrorKind::NotADirectory => "Not a directory",
            IndexErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io;

    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = IndexError::not_found("/content/missing");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found (path: /content/missing)");
    }

    #[test]
    fn test_io_maps_kind() {
        let err = IndexError::io(io::Error::from(io::ErrorKind::PermissionDenied), "/x");
        assert_eq!(err.kind, IndexErrorKind::PermissionDenied);
        assert!(err.source().is_some());

        let err = IndexError::io(io::Error::other("boom"), "/x");
        assert_eq!(err.kind, IndexErrorKind::Other);
        assert_eq!(err.to_string(), "Error: boom (path: /x)");
    }
}
