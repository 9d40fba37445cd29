//! Daily-repeat (feature) selection.
//!
//! Each feature category gets one clip per calendar date that airs several
//! times that day. The choice is cached in the playback state under the date,
//! so regenerating the same day reuses it.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::catalog::group_series;
use crate::config::FeatureConfig;
use crate::domain::{CategoryPool, MediaItem};
use crate::scheduler::recency::RecencySelector;
use crate::state::PlaybackState;

/// A feature clip and how often it aired so far today.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPick {
    pub item: MediaItem,
    pub plays: u32,
}

/// The day's feature clips with their play counters. Lives for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPicks {
    picks: BTreeMap<String, DailyPick>,
    max_plays: u32,
}

impl DailyPicks {
    pub fn new(max_plays: u32) -> Self {
        Self {
            picks: BTreeMap::new(),
            max_plays,
        }
    }

    pub fn insert(&mut self, category: &str, item: MediaItem) {
        self.picks.insert(category.to_string(), DailyPick { item, plays: 0 });
    }

    /// The category's feature clip, capped or not.
    pub fn get(&self, category: &str) -> Option<&MediaItem> {
        self.picks.get(category).map(|pick| &pick.item)
    }

    /// The category's feature clip while it is under the daily cap.
    pub fn available(&self, category: &str) -> Option<&MediaItem> {
        self.picks
            .get(category)
            .filter(|pick| pick.plays < self.max_plays)
            .map(|pick| &pick.item)
    }

    pub fn record_play(&mut self, category: &str) {
        if let Some(pick) = self.picks.get_mut(category) {
            pick.plays += 1;
        }
    }

    pub fn plays(&self, category: &str) -> u32 {
        self.picks.get(category).map(|pick| pick.plays).unwrap_or(0)
    }

    pub fn any_available(&self) -> bool {
        self.picks.values().any(|pick| pick.plays < self.max_plays)
    }

    /// `(category, pick)` in category name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailyPick)> {
        self.picks.iter().map(|(category, pick)| (category.as_str(), pick))
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Chooses the day's feature clips.
pub struct DailySelector<'a> {
    features: &'a FeatureConfig,
    selector: RecencySelector,
}

impl<'a> DailySelector<'a> {
    pub fn new(features: &'a FeatureConfig, selector: RecencySelector) -> Self {
        Self { features, selector }
    }

    /// Pick (or reuse) every feature category's clip for `date`. `at` is the
    /// airing timestamp recorded for fresh recency picks.
    pub fn select(&self, pool: &CategoryPool, state: &mut PlaybackState, date: NaiveDate, at: NaiveDateTime) -> DailyPicks {
        let mut picks = DailyPicks::new(self.features.max_plays_per_day);

        for category in &self.features.categories {
            if let Some(path) = state.daily_selection(category, date)
                && let Some(item) = pool.find(category, path)
            {
                log::debug!("Reusing feature '{}' for {} on {}", item.filename, category, date);
                picks.insert(category, item.clone());
                continue;
            }

            let sequential = self.features.sequential.as_deref() == Some(category.as_str());
            let chosen = if sequential {
                match next_episode(pool, category, state) {
                    Some(item) => {
                        let item = item.clone();
                        state.set_series_last_episode(category, &item.path);
                        Some(item)
                    }
                    None => self.selector.select(pool, category, state, None, at),
                }
            } else {
                self.selector.select(pool, category, state, None, at)
            };

            match chosen {
                Some(item) => {
                    log::info!("Feature for {} on {}: {}", category, date, item.filename);
                    state.set_daily_selection(category, date, &item.path);
                    picks.insert(category, item);
                }
                None => log::debug!("No clips for feature category '{}'", category),
            }
        }

        picks
    }
}

/// The episode after the category's last scheduled one, wrapping inside its
/// series. Without a usable pointer, the first episode of the first series.
pub fn next_episode<'p>(pool: &'p CategoryPool, category: &str, state: &PlaybackState) -> Option<&'p MediaItem> {
    let groups = group_series(pool.items(category));

    if let Some(last) = state.series_last_episode(category) {
        for group in &groups {
            if let Some(idx) = group.position(last) {
                return Some(group.episodes[(idx + 1) % group.episodes.len()]);
            }
        }
        log::debug!("Last episode {} of '{}' no longer in library", last, category);
    }

    groups.first().and_then(|group| group.episodes.first().copied())
}
