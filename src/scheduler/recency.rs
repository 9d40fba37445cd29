//! Recency-priority selection.
//!
//! Clips of a category are ranked by:
//! - Never aired clips first, oldest file first
//! - Then aired clips, least recently aired first (ties: oldest file first)
//!
//! Clips aired within the recurrence-exclusion window are only considered
//! when every clip of the category is inside the window.

use chrono::NaiveDateTime;

use crate::config::SelectionConfig;
use crate::domain::{CategoryPool, MediaItem};
use crate::state::PlaybackState;

/// Ranking key of a clip. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlayPriority {
    Unplayed { mtime: i64 },
    Played { at: NaiveDateTime, mtime: i64 },
}

/// Rank a clip against the play history.
pub fn play_priority(item: &MediaItem, state: &PlaybackState) -> PlayPriority {
    match state.last_played(&item.path) {
        None => PlayPriority::Unplayed { mtime: item.mtime },
        Some(at) => PlayPriority::Played { at, mtime: item.mtime },
    }
}

/// Picks the next clip of a category.
///
/// `peek` never touches the state; `commit` records an airing. `select` does
/// both and is what scheduling uses, so later picks in the same run already
/// see earlier ones.
#[derive(Debug, Clone, Copy)]
pub struct RecencySelector {
    exclusion_days: i64,
}

impl RecencySelector {
    pub fn new(exclusion_days: i64) -> Self {
        Self { exclusion_days }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.recurrence_exclusion_days)
    }

    /// Aired fewer than `exclusion_days` whole calendar days before `at`.
    /// Airings dated after `at` also count as recent.
    pub fn is_recent(&self, item: &MediaItem, state: &PlaybackState, at: NaiveDateTime) -> bool {
        state
            .last_played(&item.path)
            .is_some_and(|last| (at.date() - last.date()).num_days() < self.exclusion_days)
    }

    /// Choose without recording. `exclude` removes that path from the
    /// candidates unless it is the only one.
    pub fn peek<'p>(
        &self,
        pool: &'p CategoryPool,
        category: &str,
        state: &PlaybackState,
        exclude: Option<&str>,
        at: NaiveDateTime,
    ) -> Option<&'p MediaItem> {
        let mut candidates: Vec<&MediaItem> = pool.items(category).iter().collect();
        if let Some(excluded) = exclude
            && candidates.len() > 1
        {
            candidates.retain(|item| item.path != excluded);
        }

        let eligible: Vec<&MediaItem> = candidates
            .iter()
            .copied()
            .filter(|item| !self.is_recent(item, state, at))
            .collect();

        let selection = if eligible.is_empty() {
            if !candidates.is_empty() {
                log::debug!("All {} clips of '{}' aired recently, reusing oldest", candidates.len(), category);
            }
            candidates
        } else {
            eligible
        };

        // min_by_key keeps the first of equal keys, i.e. scan order
        selection.into_iter().min_by_key(|item| play_priority(item, state))
    }

    /// Record that `item` airs at `at`.
    pub fn commit(&self, state: &mut PlaybackState, item: &MediaItem, at: NaiveDateTime) {
        state.record_play(&item.path, at);
    }

    /// `peek` then `commit`.
    pub fn select(
        &self,
        pool: &CategoryPool,
        category: &str,
        state: &mut PlaybackState,
        exclude: Option<&str>,
        at: NaiveDateTime,
    ) -> Option<MediaItem> {
        let item = self.peek(pool, category, state, exclude, at)?.clone();
        self.commit(state, &item, at);
        Some(item)
    }
}
