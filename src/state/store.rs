//! Whole-file JSON persistence for [`PlaybackState`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::PlaybackState;
use crate::error::{PlaygenError, Result};

/// JSON file holding the playback state of one output directory.
///
/// There is no locking: callers run one generation at a time per output
/// directory. The last writer wins.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state. A missing or unreadable file is a cold start.
    pub fn load(&self) -> PlaybackState {
        if !self.path.exists() {
            log::info!("No playback state at {}, starting fresh", self.path.display());
            return PlaybackState::default();
        }

        match fs::read_to_string(&self.path)
            .map_err(PlaygenError::from)
            .and_then(|content| serde_json::from_str::<PlaybackState>(&content).map_err(PlaygenError::from))
        {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Ignoring unreadable playback state {}: {}", self.path.display(), e);
                PlaybackState::default()
            }
        }
    }

    /// Rewrite the whole file. The new content goes to a sibling temp file
    /// that is then renamed over the old one.
    pub fn save(&self, state: &PlaybackState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(serde_json::to_string_pretty(state)?.as_bytes())?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                log::warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(PlaygenError::State(format!(
                "Failed to move {} to {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            )));
        }

        log::debug!("Saved playback state to {}", self.path.display());
        Ok(())
    }
}
