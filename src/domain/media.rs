//! Scanned media clips and the per-category pools built from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A playable clip found by the scanner.
///
/// `path` is the identity of the clip everywhere (play history, program output,
/// daily selections), so two items with the same path are the same clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Absolute file path
    pub path: String,
    /// Length in seconds, always > 0
    pub duration: f64,
    /// Modification time, unix seconds
    pub mtime: i64,
    /// File name component of `path`
    pub filename: String,
}

impl MediaItem {
    /// Create an item, deriving `filename` from the path.
    pub fn new(path: impl Into<String>, duration: f64, mtime: i64) -> Self {
        let path = path.into();
        let filename = Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        Self {
            path,
            duration,
            mtime,
            filename,
        }
    }
}

/// Folder name -> clips in scan order, as produced by the scanner.
pub type FolderMap = BTreeMap<String, Vec<MediaItem>>;

/// Logical category -> clips.
///
/// Categories iterate in name order, which is the rotation order used by the
/// scheduler. Items keep the order they were inserted in (scan order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPool {
    categories: BTreeMap<String, Vec<MediaItem>>,
}

impl CategoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items to a category. Empty batches do not create the category.
    pub fn insert(&mut self, category: impl Into<String>, items: Vec<MediaItem>) {
        if items.is_empty() {
            return;
        }
        self.categories.entry(category.into()).or_default().extend(items);
    }

    /// Items of a category; empty slice when the category is unknown.
    pub fn items(&self, category: &str) -> &[MediaItem] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category names in ascending order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Look up a clip by path inside one category.
    pub fn find(&self, category: &str, path: &str) -> Option<&MediaItem> {
        self.items(category).iter().find(|item| item.path == path)
    }

    /// First clip (categories in name order) whose file name contains `needle`.
    pub fn find_by_filename(&self, needle: &str) -> Option<(&str, &MediaItem)> {
        self.categories.iter().find_map(|(category, items)| {
            items
                .iter()
                .find(|item| item.filename.contains(needle))
                .map(|item| (category.as_str(), item))
        })
    }

    /// Remove and return the first clip whose file name contains `needle`.
    /// A category left empty is dropped.
    pub fn take_by_filename(&mut self, needle: &str) -> Option<MediaItem> {
        let (category, idx) = self.categories.iter().find_map(|(category, items)| {
            items
                .iter()
                .position(|item| item.filename.contains(needle))
                .map(|idx| (category.clone(), idx))
        })?;

        let items = self.categories.get_mut(&category)?;
        let item = items.remove(idx);
        if items.is_empty() {
            self.categories.remove(&category);
        }
        Some(item)
    }

    /// Total number of clips across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
