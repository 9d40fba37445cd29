//! Cross-run playback state.
//!
//! The state is read once when an engine is opened and written once when a
//! generation call finishes. Everything in between mutates the in-memory copy.

mod store;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use store::StateStore;

/// Persisted scheduling history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackState {
    /// Clip path -> virtual air time of its latest scheduling. Never pruned.
    pub last_played: BTreeMap<String, NaiveDateTime>,
    /// Sequential category -> path of the last scheduled episode
    pub series_last_episode: BTreeMap<String, String>,
    /// Feature category -> date -> path of that day's repeating item
    pub daily_selections: BTreeMap<String, BTreeMap<NaiveDate, String>>,
}

impl PlaybackState {
    pub fn last_played(&self, path: &str) -> Option<NaiveDateTime> {
        self.last_played.get(path).copied()
    }

    /// Record an airing. Timestamps only move forward.
    pub fn record_play(&mut self, path: &str, at: NaiveDateTime) {
        let entry = self.last_played.entry(path.to_string()).or_insert(at);
        if at > *entry {
            *entry = at;
        }
    }

    pub fn daily_selection(&self, category: &str, date: NaiveDate) -> Option<&str> {
        self.daily_selections
            .get(category)
            .and_then(|by_date| by_date.get(&date))
            .map(String::as_str)
    }

    pub fn set_daily_selection(&mut self, category: &str, date: NaiveDate, path: &str) {
        self.daily_selections
            .entry(category.to_string())
            .or_default()
            .insert(date, path.to_string());
    }

    pub fn series_last_episode(&self, category: &str) -> Option<&str> {
        self.series_last_episode.get(category).map(String::as_str)
    }

    pub fn set_series_last_episode(&mut self, category: &str, path: &str) {
        self.series_last_episode.insert(category.to_string(), path.to_string());
    }
}
