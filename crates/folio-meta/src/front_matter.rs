//! YAML front matter for markup pages.
//!
//! A front matter block is a YAML document between two `---` lines at the very
//! start of a file:
//!
//! ```text
//! ---
//! title: Getting Started
//! slug: start
//! tags: [intro, setup]
//! ---
//! # Getting Started
//!
//! Body text.
//! ```
//!
//! Fields not recognized here are kept in [`FrontMatter::extra`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Leading level-1 heading at the start of a body.
static LEADING_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A#[ \t]+([^\r\n]+)").unwrap());

/// Page metadata declared in front matter.
///
/// Every field is optional. An empty or missing block yields the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Explicit page title (overrides the heading).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Replacement for the file's base name in the logical path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Free-form tags. A single string is accepted as a one-element list.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Excluded from folder listings; still reachable by path.
    #[serde(default)]
    pub hidden: bool,

    /// Whether the router may serve this page at all.
    #[serde(default = "default_routable")]
    pub routable: bool,

    /// Publish date (`YYYY-MM-DD` or RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Last content change (`YYYY-MM-DD` or RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Order key overriding the numeric file name prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,

    /// Any other fields, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_routable() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            slug: None,
            tags: Vec::new(),
            hidden: false,
            routable: true,
            date: None,
            modified: None,
            order: None,
            extra: BTreeMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse a YAML block.
    ///
    /// Empty content returns the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a known field has the wrong type.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(trimmed)
    }

    /// Parsed publish date.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Parsed modification date.
    #[must_use]
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified.as_deref().and_then(parse_date)
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(tag)) => vec![tag],
        Some(OneOrMany::Many(tags)) => tags,
    })
}

/// Split a front matter block from the rest of the content.
///
/// Returns `(Some(yaml), body)` when the content starts with a `---` line that
/// is later closed by another `---` line, and `(None, content)` otherwise. The
/// body is trimmed.
#[must_use]
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = strip_delimiter_line(content) else {
        return (None, content.trim());
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body.trim());
        }
        offset += line.len();
    }

    // Unclosed block: not front matter
    (None, content.trim())
}

/// Strip an opening `---` line, returning what follows it.
fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// A markup file split into metadata, heading title, and body.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupDocument {
    /// Parsed front matter (default when absent).
    pub meta: FrontMatter,
    /// Text of a leading level-1 heading, if any.
    pub heading: Option<String>,
    /// Content after front matter, with the leading heading removed.
    pub body: String,
}

impl MarkupDocument {
    /// Parse a whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if a front matter block is present but malformed.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let (yaml, body) = split_front_matter(content);
        let meta = match yaml {
            Some(yaml) => FrontMatter::from_yaml(yaml)?,
            None => FrontMatter::default(),
        };
        Ok(Self::from_body(meta, body))
    }

    /// Build a document from already-parsed metadata and a body.
    #[must_use]
    pub fn from_body(meta: FrontMatter, body: &str) -> Self {
        let body = body.trim();
        match LEADING_H1.captures(body) {
            Some(caps) => {
                let heading = caps[1].trim().trim_end_matches('#').trim_end().to_owned();
                let rest = body[caps[0].len()..].trim().to_owned();
                Self {
                    meta,
                    heading: (!heading.is_empty()).then_some(heading),
                    body: rest,
                }
            }
            None => Self {
                meta,
                heading: None,
                body: body.to_owned(),
            },
        }
    }

    /// Explicit title, else the heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref().or(self.heading.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_front_matter() {
        let content = "---\ntitle: Hello\n---\n\n# Heading\n\nBody\n";
        let (yaml, body) = split_front_matter(content);
        assert_eq!(yaml, Some("title: Hello\n"));
        assert_eq!(body, "# Heading\n\nBody");
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let content = "---\r\ntitle: Hello\r\n---\r\nBody";
        let (yaml, body) = split_front_matter(content);
        assert_eq!(yaml, Some("title: Hello\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_front_matter_absent() {
        assert_eq!(split_front_matter("  # Title\n"), (None, "# Title"));
    }

    #[test]
    fn test_split_front_matter_must_be_at_start() {
        let content = "\n---\ntitle: Hello\n---\nBody";
        assert_eq!(split_front_matter(content).0, None);
    }

    #[test]
    fn test_split_front_matter_unclosed() {
        let content = "---\ntitle: Hello\nBody";
        assert_eq!(split_front_matter(content), (None, content));
    }

    #[test]
    fn test_split_front_matter_empty_block() {
        assert_eq!(split_front_matter("---\n---\nBody"), (Some(""), "Body"));
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(FrontMatter::from_yaml("  \n").unwrap(), FrontMatter::default());
    }

    #[test]
    fn test_from_yaml_fields() {
        let yaml = "title: Guide\nslug: start\ntags: [a, b]\nhidden: true\norder: 3\nauthor: Ann";
        let meta = FrontMatter::from_yaml(yaml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Guide"));
        assert_eq!(meta.slug.as_deref(), Some("start"));
        assert_eq!(meta.tags, vec!["a", "b"]);
        assert!(meta.hidden);
        assert!(meta.routable);
        assert_eq!(meta.order, Some(3));
        assert_eq!(meta.extra.get("author"), Some(&serde_json::json!("Ann")));
    }

    #[test]
    fn test_from_yaml_single_tag() {
        let meta = FrontMatter::from_yaml("tags: intro").unwrap();
        assert_eq!(meta.tags, vec!["intro"]);
    }

    #[test]
    fn test_from_yaml_malformed() {
        assert!(FrontMatter::from_yaml("title: [unclosed").is_err());
        assert!(FrontMatter::from_yaml("hidden: maybe").is_err());
    }

    #[test]
    fn test_dates() {
        let meta = FrontMatter {
            date: Some("2024-03-01".to_owned()),
            modified: Some("2024-03-02T10:00:00+02:00".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            meta.published_at().unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(
            meta.modified_at().unwrap().to_rfc3339(),
            "2024-03-02T08:00:00+00:00"
        );
    }

    #[test]
    fn test_invalid_date_is_none() {
        let meta = FrontMatter {
            date: Some("next tuesday".to_owned()),
            ..Default::default()
        };
        assert!(meta.published_at().is_none());
    }

    #[test]
    fn test_markup_document_heading_stripped() {
        let doc = MarkupDocument::parse("# Welcome\n\nHello there").unwrap();
        assert_eq!(doc.heading.as_deref(), Some("Welcome"));
        assert_eq!(doc.body, "Hello there");
        assert_eq!(doc.title(), Some("Welcome"));
    }

    #[test]
    fn test_markup_document_explicit_title_wins() {
        let doc = MarkupDocument::parse("---\ntitle: Explicit\n---\n# Heading\nText").unwrap();
        assert_eq!(doc.title(), Some("Explicit"));
        assert_eq!(doc.body, "Text");
    }

    #[test]
    fn test_markup_document_heading_must_lead() {
        let doc = MarkupDocument::parse("Intro\n\n# Later").unwrap();
        assert_eq!(doc.heading, None);
        assert_eq!(doc.body, "Intro\n\n# Later");
    }

    #[test]
    fn test_markup_document_h2_is_not_title() {
        let doc = MarkupDocument::parse("## Section\nText").unwrap();
        assert_eq!(doc.heading, None);
    }

    #[test]
    fn test_markup_document_closing_hashes_trimmed() {
        let doc = MarkupDocument::parse("# Title ##\n").unwrap();
        assert_eq!(doc.heading.as_deref(), Some("Title"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_markup_document_malformed_front_matter() {
        assert!(MarkupDocument::parse("---\ntitle: [bad\n---\nBody").is_err());
    }
}
