//! Request abstraction consumed by the router.

use std::collections::BTreeMap;

use folio_path::SitePath;

/// An inbound request: method, normalized path, and headers.
///
/// Methods are stored uppercase and header names lowercase, so lookups are
/// case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: SitePath,
    headers: BTreeMap<String, String>,
}

impl Request {
    /// Create a request for `method` at the raw `path`.
    #[must_use]
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: SitePath::normalize(path).to_absolute(),
            headers: BTreeMap::new(),
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    /// Add a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &SitePath {
        &self.path
    }

    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers, lowercase names.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_normalizes() {
        let request = Request::new("post", "docs//guide/")
            .with_header("Accept", "text/html");

        assert_eq!(request.method(), "POST");
        assert_eq!(request.path().to_string(), "/docs/guide");
        assert_eq!(request.header("accept"), Some("text/html"));
        assert_eq!(request.header("ACCEPT"), Some("text/html"));
        assert_eq!(request.header("cookie"), None);
    }
}
