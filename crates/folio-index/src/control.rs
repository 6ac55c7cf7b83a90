//! Per-directory control file.
//!
//! An optional YAML file (default `_folder.yaml`) in a directory adjusts how
//! that directory is indexed:
//!
//! ```yaml
//! order: desc      # asc | desc (also ascending | descending)
//! flatten: true    # list files of all subdirectories as direct children
//! hidden: true     # exclude this folder from its parent's listing
//! title: Archive   # folder title (default: display name in title case)
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sort direction for a folder's children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

/// Parsed control file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderControlData {
    pub order: SortOrder,
    pub flatten: bool,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FolderControlData {
    /// Parse control file content.
    ///
    /// Empty content returns the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(trimmed)
    }

    /// Load `dir/file_name`, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    #[must_use]
    pub fn load(dir: &Path, file_name: &str) -> Self {
        let path = dir.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read control file");
                return Self::default();
            }
        };
        Self::parse(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed control file");
            Self::default()
        })
    }
}
