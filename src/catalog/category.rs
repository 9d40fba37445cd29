//! Folder name -> logical category resolution.
//!
//! Rules are evaluated top to bottom and the first rule whose pattern occurs in
//! the folder name (case-insensitive) wins. The order of the table is the
//! tie-break for folder names that match several patterns.

use serde::{Deserialize, Serialize};

use crate::domain::{CategoryPool, FolderMap};

/// One `(substring, category)` entry of the resolver table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }

    /// Built-in table for the station's folder naming.
    pub fn defaults() -> Vec<Self> {
        [
            ("psaltir", "psaltir"),
            ("molitv", "molitve"),
            ("duhov", "duhovne_pouke"),
            ("decij", "deciji"),
            ("serij", "serije"),
            ("dokument", "dokumentarni"),
            ("putopis", "putopisi"),
            ("muzik", "muzika"),
            ("ostalo", "ostalo"),
            ("spica", "spica"),
            ("15min", "15min"),
            ("30min", "30min"),
        ]
        .into_iter()
        .map(|(pattern, category)| Self::new(pattern, category))
        .collect()
    }
}

/// Ordered rule table plus the fallback category.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    rules: Vec<(String, String)>,
    default_category: String,
}

impl CategoryResolver {
    pub fn new(rules: &[CategoryRule], default_category: impl Into<String>) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| (rule.pattern.to_lowercase(), rule.category.clone()))
                .collect(),
            default_category: default_category.into(),
        }
    }

    /// Resolve a folder name. Never fails; unmatched names get the default.
    pub fn resolve(&self, folder_name: &str) -> &str {
        let folder = folder_name.to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| folder.contains(pattern.as_str()))
            .map(|(_, category)| category.as_str())
            .unwrap_or(&self.default_category)
    }

    /// Merge scanned folders into logical categories, folders in name order.
    pub fn pool(&self, folders: &FolderMap) -> CategoryPool {
        let mut pool = CategoryPool::new();
        for (folder, items) in folders {
            let category = self.resolve(folder);
            log::debug!("Folder '{}' -> category '{}' ({} items)", folder, category, items.len());
            pool.insert(category, items.clone());
        }
        pool
    }
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new(&CategoryRule::defaults(), "ostalo")
    }
}
