//! Program output types.
//!
//! Field names and nesting are read by ffplayout and must not change:
//! `{channel, date, program: [{in, out, duration, source}]}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::media::MediaItem;

/// One playable entry of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramItem {
    /// Seek-in point, always 0.0 for generated items
    #[serde(rename = "in")]
    pub seek_in: f64,
    pub out: f64,
    pub duration: f64,
    pub source: String,
}

impl ProgramItem {
    /// Name of the folder the source clip lives in.
    pub fn folder_name(&self) -> Option<String> {
        Path::new(&self.source)
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn file_name(&self) -> Option<String> {
        Path::new(&self.source)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

impl From<&MediaItem> for ProgramItem {
    fn from(item: &MediaItem) -> Self {
        Self {
            seek_in: 0.0,
            out: item.duration,
            duration: item.duration,
            source: item.path.clone(),
        }
    }
}

/// A full day of programming for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub channel: String,
    pub date: NaiveDate,
    pub program: Vec<ProgramItem>,
}

impl Program {
    pub fn new(channel: impl Into<String>, date: NaiveDate, program: Vec<ProgramItem>) -> Self {
        Self {
            channel: channel.into(),
            date,
            program,
        }
    }

    /// Sum of all item durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.program.iter().map(|item| item.duration).sum()
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_item_from_media() {
        let media = MediaItem::new("/media/Deciji/deciji_01.mp4", 600.5, 0);
        let item = ProgramItem::from(&media);
        assert_eq!(item.seek_in, 0.0);
        assert_eq!(item.out, 600.5);
        assert_eq!(item.duration, 600.5);
        assert_eq!(item.source, "/media/Deciji/deciji_01.mp4");
    }

    #[test]
    fn test_folder_name() {
        let item = ProgramItem::from(&MediaItem::new("/media/Dokumentarni/doc.mp4", 1.0, 0));
        assert_eq!(item.folder_name().as_deref(), Some("Dokumentarni"));
        assert_eq!(item.file_name().as_deref(), Some("doc.mp4"));
    }

    #[test]
    fn test_wire_field_names() {
        let program = Program::new(
            "Channel 1",
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            vec![ProgramItem::from(&MediaItem::new("/m/a.mp4", 30.0, 0))],
        );
        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(value["channel"], "Channel 1");
        assert_eq!(value["date"], "2026-06-01");
        assert_eq!(value["program"][0]["in"], 0.0);
        assert_eq!(value["program"][0]["out"], 30.0);
        assert_eq!(value["program"][0]["duration"], 30.0);
        assert_eq!(value["program"][0]["source"], "/m/a.mp4");
    }

    #[test]
    fn test_total_duration() {
        let program = Program::new(
            "Channel 1",
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            vec![
                ProgramItem::from(&MediaItem::new("/m/a.mp4", 30.0, 0)),
                ProgramItem::from(&MediaItem::new("/m/b.mp4", 45.5, 0)),
            ],
        );
        assert_eq!(program.total_duration(), 75.5);
        assert_eq!(program.len(), 2);
    }
}
