//! Request path normalization for Folio.
//!
//! Every raw path string (an HTTP request path, a logical tree path, a
//! resource locator) is normalized into a [`SitePath`]: an ordered list of
//! non-empty segments, a [`PathKind`], and an optional extension taken from the
//! last segment.
//!
//! # Path Kinds
//!
//! - **Absolute**: leading separator (`/docs/guide`)
//! - **Fragment**: relative, no leading separator (`docs/guide`)
//! - **Stream**: scheme-prefixed (`res://docs/guide`)
//!
//! Empty segments produced by repeated separators and `.` segments are dropped
//! for every kind, so the string form always round-trips:
//!
//! ```
//! use folio_path::SitePath;
//!
//! let path = SitePath::normalize("//docs///guide.md");
//! assert_eq!(path.segments(), ["docs", "guide.md"]);
//! assert_eq!(path.extension(), Some("md"));
//! assert_eq!(path.to_string(), "/docs/guide.md");
//! assert_eq!(SitePath::normalize(&path.to_string()), path);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// Separator between a stream scheme and its segments.
const SCHEME_SEPARATOR: &str = "://";

/// The three disjoint kinds of path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Starts with the separator.
    Absolute,
    /// Relative path without a leading separator.
    Fragment,
    /// Scheme-prefixed path such as `res://images/logo.png`.
    Stream {
        /// Scheme without the `://` suffix.
        scheme: String,
    },
}

/// A normalized path.
///
/// Immutable once constructed. Cheap operations ([`parent`](Self::parent),
/// [`join`](Self::join), [`without_extension`](Self::without_extension))
/// return new values instead of mutating.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct SitePath {
    kind: PathKind,
    segments: Vec<String>,
}

impl SitePath {
    /// Normalize a raw path string.
    ///
    /// Never fails: every input has a defined normalization. An empty string is
    /// the empty fragment; `"/"` is the absolute root.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        if let Some((scheme, rest)) = raw.split_once(SCHEME_SEPARATOR) {
            return Self {
                kind: PathKind::Stream {
                    scheme: scheme.to_owned(),
                },
                segments: split_segments(rest),
            };
        }

        let kind = if raw.starts_with(SEPARATOR) {
            PathKind::Absolute
        } else {
            PathKind::Fragment
        };

        Self {
            kind,
            segments: split_segments(raw),
        }
    }

    /// The absolute root path (`/`).
    #[must_use]
    pub fn root() -> Self {
        Self {
            kind: PathKind::Absolute,
            segments: Vec::new(),
        }
    }

    /// Build an absolute path from already-split segments.
    ///
    /// Segments are filtered the same way [`normalize`](Self::normalize) filters
    /// them, and segments containing separators are split.
    #[must_use]
    pub fn absolute<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .flat_map(|s| split_segments(s.as_ref()))
            .collect();
        Self {
            kind: PathKind::Absolute,
            segments,
        }
    }

    /// Path kind.
    #[must_use]
    pub fn kind(&self) -> &PathKind {
        &self.kind
    }

    /// Whether the path starts with a separator.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.kind == PathKind::Absolute
    }

    /// Stream scheme, if this is a stream path.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        match &self.kind {
            PathKind::Stream { scheme } => Some(scheme),
            _ => None,
        }
    }

    /// Non-empty path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments (root or empty fragment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Extension of the last segment.
    ///
    /// The extension is the text after the final `.`. A leading dot
    /// (`.hidden`) or a trailing dot (`name.`) yields no extension.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.name().and_then(|name| split_extension(name).1)
    }

    /// Parent path, or `None` when the path has no segments.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            kind: self.kind.clone(),
            segments: rest.to_vec(),
        })
    }

    /// Append one or more segments.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(split_segments(segment));
        Self {
            kind: self.kind.clone(),
            segments,
        }
    }

    /// Same path with the extension removed from the last segment.
    #[must_use]
    pub fn without_extension(&self) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut()
            && let (stem, Some(_)) = split_extension(last)
        {
            *last = stem.to_owned();
        }
        Self {
            kind: self.kind.clone(),
            segments,
        }
    }

    /// Whether `prefix` is a segment-wise prefix of this path.
    ///
    /// Kinds are ignored; only segments are compared.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Segments of this path beyond `prefix`, or `None` if `prefix` does not match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<&[String]> {
        self.segments.strip_prefix(prefix.segments.as_slice())
    }

    /// Same segments as an absolute path.
    #[must_use]
    pub fn to_absolute(&self) -> Self {
        Self {
            kind: PathKind::Absolute,
            segments: self.segments.clone(),
        }
    }

    /// Segments joined by the separator, without any prefix.
    ///
    /// Used as the cache key for logical paths (`""` for the root).
    #[must_use]
    pub fn key(&self) -> String {
        self.segments.join("/")
    }
}

impl Default for SitePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PathKind::Absolute => write!(f, "/{}", self.segments.join("/")),
            PathKind::Fragment => write!(f, "{}", self.segments.join("/")),
            PathKind::Stream { scheme } => {
                write!(f, "{scheme}{SCHEME_SEPARATOR}{}", self.segments.join("/"))
            }
        }
    }
}

impl FromStr for SitePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for SitePath {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for SitePath {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

impl From<SitePath> for String {
    fn from(path: SitePath) -> Self {
        path.to_string()
    }
}

/// Split on separators, dropping empty and `.` segments.
fn split_segments(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_owned)
        .collect()
}

/// Split a file name into stem and extension.
///
/// Returns `(name, None)` when there is no usable extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) if idx + 1 == name.len() => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_absolute_path() {
        let path = SitePath::normalize("/docs/guide");
        assert_eq!(path.kind(), &PathKind::Absolute);
        assert_eq!(path.segments(), ["docs", "guide"]);
        assert_eq!(path.extension(), None);
    }

    #[test]
    fn test_fragment_path() {
        let path = SitePath::normalize("docs/guide.md");
        assert_eq!(path.kind(), &PathKind::Fragment);
        assert_eq!(path.segments(), ["docs", "guide.md"]);
        assert_eq!(path.extension(), Some("md"));
    }

    #[test]
    fn test_stream_path() {
        let path = SitePath::normalize("res://images/logo.png");
        assert_eq!(path.scheme(), Some("res"));
        assert_eq!(path.segments(), ["images", "logo.png"]);
        assert_eq!(path.extension(), Some("png"));
        assert_eq!(path.to_string(), "res://images/logo.png");
    }

    #[test]
    fn test_empty_segments_dropped_for_every_kind() {
        assert_eq!(SitePath::normalize("//a///b/").segments(), ["a", "b"]);
        assert_eq!(SitePath::normalize("a//b").segments(), ["a", "b"]);
        assert_eq!(SitePath::normalize("res://a//b").segments(), ["a", "b"]);
    }

    #[test]
    fn test_dot_segments_dropped() {
        assert_eq!(SitePath::normalize("/a/./b").segments(), ["a", "b"]);
        // `..` is kept verbatim; nothing here touches the filesystem
        assert_eq!(SitePath::normalize("/a/../b").segments(), ["a", "..", "b"]);
    }

    #[test]
    fn test_root_and_empty() {
        let root = SitePath::normalize("/");
        assert!(root.is_absolute());
        assert!(root.is_empty());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root, SitePath::root());

        let empty = SitePath::normalize("");
        assert_eq!(empty.kind(), &PathKind::Fragment);
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_round_trip() {
        for raw in ["/", "/a/b.c", "a/b", "res://x/y.z", "mem://"] {
            let path = SitePath::normalize(raw);
            assert_eq!(SitePath::normalize(&path.to_string()), path, "{raw}");
        }
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(SitePath::normalize("/.hidden").extension(), None);
        assert_eq!(SitePath::normalize("/name.").extension(), None);
        assert_eq!(SitePath::normalize("/a.tar.gz").extension(), Some("gz"));
        assert_eq!(SitePath::normalize("/a.b/c").extension(), None);
        assert_eq!(SitePath::root().extension(), None);
    }

    #[test]
    fn test_parent_and_join() {
        let path = SitePath::normalize("/blog/2024/post");
        assert_eq!(path.parent(), Some(SitePath::normalize("/blog/2024")));
        assert_eq!(SitePath::root().parent(), None);
        assert_eq!(
            SitePath::normalize("/blog").join("2024/post"),
            SitePath::normalize("/blog/2024/post")
        );
    }

    #[test]
    fn test_without_extension() {
        assert_eq!(
            SitePath::normalize("/docs/about.md").without_extension(),
            SitePath::normalize("/docs/about")
        );
        assert_eq!(
            SitePath::normalize("/docs/about").without_extension(),
            SitePath::normalize("/docs/about")
        );
    }

    #[test]
    fn test_strip_prefix() {
        let path = SitePath::normalize("/blog/2024/post/comments");
        let prefix = SitePath::normalize("/blog/2024/post");
        assert!(path.starts_with(&prefix));
        assert_eq!(path.strip_prefix(&prefix), Some(&["comments".to_owned()][..]));
        assert_eq!(path.strip_prefix(&SitePath::normalize("/other")), None);
    }

    #[test]
    fn test_key() {
        assert_eq!(SitePath::root().key(), "");
        assert_eq!(SitePath::normalize("/a/b").key(), "a/b");
        assert_eq!(SitePath::normalize("res://a/b").key(), "a/b");
    }

    #[test]
    fn test_absolute_constructor_splits_segments() {
        let path = SitePath::absolute(["docs", "guide/intro", ""]);
        assert_eq!(path.to_string(), "/docs/guide/intro");
    }

    #[test]
    fn test_serde_as_string() {
        let path = SitePath::normalize("/docs/guide");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/docs/guide\"");
        let back: SitePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("about.md"), ("about", Some("md")));
        assert_eq!(split_extension("about"), ("about", None));
        assert_eq!(split_extension(".env"), (".env", None));
    }
}
