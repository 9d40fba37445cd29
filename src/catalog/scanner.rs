//! Media library scanning.
//!
//! Walks the library root, keeps files with a recognized video extension and
//! groups them by the name of the folder they live in. Each file's duration is
//! resolved through a [`DurationProbe`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::catalog::probe::{DurationProbe, duration_or_default};
use crate::config::ProbeConfig;
use crate::domain::{FolderMap, MediaItem};
use crate::error::{PlaygenError, Result};

pub struct Scanner<'a> {
    extensions: Vec<String>,
    default_duration: f64,
    probe: &'a dyn DurationProbe,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &ProbeConfig, probe: &'a dyn DurationProbe) -> Self {
        Self {
            extensions: config.extensions.iter().map(|ext| ext.to_lowercase()).collect(),
            default_duration: config.default_duration_secs,
            probe,
        }
    }

    /// Scan `root`. A missing root yields an empty map.
    pub async fn scan(&self, root: &Path) -> Result<FolderMap> {
        let mut folders = FolderMap::new();
        if !root.exists() {
            log::warn!("Video directory {} does not exist", root.display());
            return Ok(folders);
        }

        let root = root
            .canonicalize()
            .map_err(|e| PlaygenError::Scan(format!("{}: {}", root.display(), e)))?;

        let mut files = Vec::new();
        self.collect(&root, &mut files)?;
        log::info!("Found {} media files under {}", files.len(), root.display());

        for path in files {
            let folder = path
                .parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let duration = duration_or_default(self.probe, &path, self.default_duration).await;
            let mtime = modified_secs(&path);
            folders
                .entry(folder)
                .or_default()
                .push(MediaItem::new(path.to_string_lossy(), duration, mtime));
        }

        Ok(folders)
    }

    /// Depth-first walk in name order, skipping hidden entries.
    fn collect(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .map_err(|e| PlaygenError::Scan(format!("Failed to read dir {}: {}", dir.display(), e)))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect::<Vec<_>>();
        entries.sort();

        for path in entries {
            let hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if hidden {
                continue;
            }
            if path.is_dir() {
                self.collect(&path, files)?;
            } else if self.is_media(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn is_media(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

fn modified_secs(path: &Path) -> i64 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
