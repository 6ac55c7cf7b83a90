//! Indexed folder contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use folio_meta::PageFile;
use folio_path::SitePath;
use serde::{Deserialize, Serialize};

use crate::control::FolderControlData;

/// One logical page: every file variant sharing a logical path.
///
/// Variants are keyed by extension. A page always has at least one variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    logical_path: SitePath,
    variants: BTreeMap<String, PageFile>,
    order: u64,
}

impl Page {
    #[must_use]
    pub fn new(file: PageFile, order: u64) -> Self {
        let logical_path = file.logical_path().clone();
        let mut variants = BTreeMap::new();
        variants.insert(file.extension().to_owned(), file);
        Self {
            logical_path,
            variants,
            order,
        }
    }

    /// Add a variant.
    ///
    /// # Errors
    ///
    /// Returns the rejected file when its logical path differs from the
    /// page's or a variant with its extension exists.
    pub fn add_variant(&mut self, file: PageFile) -> Result<(), PageFile> {
        if file.logical_path() != &self.logical_path || self.variants.contains_key(file.extension()) {
            return Err(file);
        }
        self.variants.insert(file.extension().to_owned(), file);
        Ok(())
    }

    #[must_use]
    pub fn logical_path(&self) -> &SitePath {
        &self.logical_path
    }

    /// Variants by extension.
    #[must_use]
    pub fn variants(&self) -> &BTreeMap<String, PageFile> {
        &self.variants
    }

    /// The variant with `extension`, if present.
    #[must_use]
    pub fn variant(&self, extension: &str) -> Option<&PageFile> {
        self.variants.get(extension)
    }

    /// Variant used for the page title and listing metadata.
    ///
    /// The first variant by extension; deterministic regardless of disk order.
    #[must_use]
    pub fn primary(&self) -> Option<&PageFile> {
        self.variants.values().next()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.primary().map_or("", PageFile::title)
    }

    /// Order key used for sorting within the folder.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }

    /// Hidden from listings when any variant is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.variants.values().any(PageFile::is_hidden)
    }

    /// Whether at least one variant may be served.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.variants.values().any(PageFile::is_routable)
    }
}

/// A child directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    physical_path: PathBuf,
    logical_path: SitePath,
    title: String,
    hidden: bool,
    order: u64,
}

impl FolderRef {
    #[must_use]
    pub fn new(physical_path: PathBuf, logical_path: SitePath, title: String) -> Self {
        Self {
            physical_path,
            logical_path,
            title,
            hidden: false,
            order: 0,
        }
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: u64) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn physical_path(&self) -> &Path {
        &self.physical_path
    }

    #[must_use]
    pub fn logical_path(&self) -> &SitePath {
        &self.logical_path
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }
}

/// A folder child.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Page(Page),
    Folder(FolderRef),
}

impl Entry {
    #[must_use]
    pub fn logical_path(&self) -> &SitePath {
        match self {
            Self::Page(page) => page.logical_path(),
            Self::Folder(folder) => folder.logical_path(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page(page) => page.title(),
            Self::Folder(folder) => folder.title(),
        }
    }

    #[must_use]
    pub fn order(&self) -> u64 {
        match self {
            Self::Page(page) => page.order(),
            Self::Folder(folder) => folder.order(),
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Page(page) => page.is_hidden(),
            Self::Folder(folder) => folder.is_hidden(),
        }
    }

    #[must_use]
    pub fn as_page(&self) -> Option<&Page> {
        match self {
            Self::Page(page) => Some(page),
            Self::Folder(_) => None,
        }
    }

    #[must_use]
    pub fn as_folder(&self) -> Option<&FolderRef> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Page(_) => None,
        }
    }
}

/// The indexed contents of one directory.
///
/// Children are kept in their final sort order. Instances are never mutated
/// after indexing; a reindex produces a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolderData {
    folder: FolderRef,
    control: FolderControlData,
    entries: Vec<(String, Entry)>,
}

impl FolderData {
    #[must_use]
    pub fn new(
        folder: FolderRef,
        control: FolderControlData,
        entries: Vec<(String, Entry)>,
    ) -> Self {
        Self {
            folder,
            control,
            entries,
        }
    }

    /// The folder this data describes.
    #[must_use]
    pub fn folder(&self) -> &FolderRef {
        &self.folder
    }

    /// Control file settings in effect.
    #[must_use]
    pub fn control(&self) -> &FolderControlData {
        &self.control
    }

    /// Child by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, entry)| entry)
    }

    /// Children in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Child names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
