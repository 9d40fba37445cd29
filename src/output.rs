//! Program files: `<root>/YYYY/MM/YYYY-MM-DD.json`.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Program;
use crate::error::{PlaygenError, Result};

/// Writes programs under a per-month directory tree.
#[derive(Debug, Clone)]
pub struct ProgramWriter {
    root: PathBuf,
}

impl ProgramWriter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string())
            .join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// Write `program` as pretty JSON, replacing an existing file for the date.
    pub fn write(&self, program: &Program) -> Result<PathBuf> {
        let path = self.path_for(program.date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(program)?)?;
        log::info!("Wrote {} items to {}", program.len(), path.display());
        Ok(path)
    }
}

/// Read a program file, e.g. as a replay template.
pub fn load_program(path: &Path) -> Result<Program> {
    let content = fs::read_to_string(path)
        .map_err(|e| PlaygenError::Template(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| PlaygenError::Template(format!("Failed to parse {}: {}", path.display(), e)))
}
