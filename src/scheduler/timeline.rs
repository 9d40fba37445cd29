//! Timeline scheduler.
//!
//! Walks a virtual cursor from the day-start anchor to the target duration.
//! Every step emits at most one clip, trying in order:
//! 1. Evening bookend, once the elapsed share of the day is reached
//! 2. Strict fixed slot whose offset the cursor has passed
//! 3. Feature clip inside a day-part window, once per category and hour
//! 4. Station identifier when its cadence is due
//! 5. Round-robin over the non-reserved categories
//!
//! The morning bookend opens the day before the loop starts.

use chrono::{NaiveDate, Timelike};
use std::collections::BTreeSet;

use crate::config::Config;
use crate::domain::{CategoryPool, MediaItem, ProgramItem};
use crate::error::Result;
use crate::scheduler::builder::ProgramBuilder;
use crate::scheduler::daily::DailyPicks;
use crate::scheduler::recency::RecencySelector;
use crate::state::PlaybackState;

/// Mutable bookkeeping of one walk across the day.
struct Walk<'s> {
    out: ProgramBuilder,
    state: &'s mut PlaybackState,
    daily: &'s mut DailyPicks,
    /// `(feature category, absolute hour index)` already aired
    aired_hours: BTreeSet<(String, i64)>,
    next_slot: usize,
    evening_done: bool,
    rotation_idx: usize,
}

pub struct TimelineScheduler<'a> {
    config: &'a Config,
    pool: &'a CategoryPool,
    identifier: Option<&'a MediaItem>,
    selector: RecencySelector,
    /// `(offset from day start, category)` in airing order
    slots: Vec<(f64, String)>,
    rotation: Vec<String>,
}

impl<'a> TimelineScheduler<'a> {
    pub fn new(config: &'a Config, pool: &'a CategoryPool, identifier: Option<&'a MediaItem>) -> Result<Self> {
        let day_start = config.schedule.day_start;
        let slots = config
            .schedule
            .slots()?
            .into_iter()
            .map(|slot| (slot.offset_from(day_start), slot.category))
            .collect();

        let rotation: Vec<String> = pool
            .categories()
            .filter(|category| !is_reserved(config, category))
            .map(str::to_string)
            .collect();
        log::debug!("Rotation categories: {:?}", rotation);

        Ok(Self {
            config,
            pool,
            identifier,
            selector: RecencySelector::from_config(&config.selection),
            slots,
            rotation,
        })
    }

    pub fn rotation(&self) -> &[String] {
        &self.rotation
    }

    /// Build the day's program. Every pick is committed to `state`.
    pub fn build(&self, state: &mut PlaybackState, daily: &mut DailyPicks, date: NaiveDate) -> Vec<ProgramItem> {
        let schedule = &self.config.schedule;
        let target = schedule.target_secs();
        let evening_at = self.config.bookends.evening_at_fraction * target;
        let threshold = self.config.identifier.threshold();

        let mut walk = Walk {
            out: ProgramBuilder::new(date.and_time(schedule.day_start)),
            state,
            daily,
            aired_hours: BTreeSet::new(),
            next_slot: 0,
            evening_done: self.config.bookends.evening.is_none(),
            rotation_idx: 0,
        };

        if let Some(category) = &self.config.bookends.morning
            && self.air(&mut walk, category)
        {
            self.identifier_after_bookend(&mut walk);
        }

        while walk.out.cursor() < target {
            let cursor = walk.out.cursor();

            if !walk.evening_done && cursor >= evening_at {
                walk.evening_done = true;
                if let Some(category) = &self.config.bookends.evening
                    && self.air(&mut walk, category)
                {
                    log::debug!("Evening bookend at +{:.0}s", cursor);
                    self.identifier_after_bookend(&mut walk);
                }
                continue;
            }

            if schedule.strict_fixed_slots
                && let Some((offset, category)) = self.slots.get(walk.next_slot)
            {
                if cursor >= *offset {
                    walk.next_slot += 1;
                    if !(self.air_feature(&mut walk, category) || self.air(&mut walk, category)) {
                        log::debug!("Fixed slot '{}' at +{:.0}s has nothing to air", category, offset);
                    }
                    continue;
                }
                if offset - cursor <= schedule.slot_lookahead_secs {
                    walk.out.advance_to(*offset);
                    continue;
                }
            }

            if let Some(category) = self.window_feature(&walk) {
                self.air_feature(&mut walk, &category);
                continue;
            }

            if let Some(identifier) = self.identifier
                && walk.out.identifier_due(threshold)
            {
                walk.out.emit_identifier(identifier);
                continue;
            }

            if self.rotation.is_empty() {
                if !self.reserved_work_remains(&walk) {
                    log::debug!("Nothing left to schedule at +{:.0}s", cursor);
                    break;
                }
                walk.out.advance(schedule.skip_interval_secs);
                continue;
            }

            if !self.round_robin(&mut walk) {
                walk.out.advance(schedule.skip_interval_secs);
            }
        }

        log::info!(
            "Timeline for {}: {} items, {:.0}s of {:.0}s",
            date,
            walk.out.len(),
            walk.out.cursor().min(target),
            target
        );
        walk.out.finish()
    }

    /// Pick a clip of `category` that is not the day's feature clip and air
    /// it. When the feature clip is the only candidate it airs as a feature
    /// play, subject to the cap.
    fn air(&self, walk: &mut Walk, category: &str) -> bool {
        let feature_path = walk.daily.get(category).map(|item| item.path.clone());
        let Some(item) = self
            .selector
            .peek(self.pool, category, walk.state, feature_path.as_deref(), walk.out.now())
        else {
            return false;
        };

        if feature_path.as_deref() == Some(item.path.as_str()) {
            return self.air_feature(walk, category);
        }

        let item = item.clone();
        self.selector.commit(walk.state, &item, walk.out.now());
        walk.out.emit(&item);
        true
    }

    /// Air the category's feature clip if it is under the daily cap.
    fn air_feature(&self, walk: &mut Walk, category: &str) -> bool {
        let Some(item) = walk.daily.available(category).cloned() else {
            return false;
        };

        walk.daily.record_play(category);
        walk.aired_hours.insert((category.to_string(), self.hour_index(walk.out.cursor())));
        self.selector.commit(walk.state, &item, walk.out.now());
        walk.out.emit(&item);
        true
    }

    /// Feature category to air now: the cursor is inside a day-part window and
    /// the category is under its cap and has not aired in this hour.
    fn window_feature(&self, walk: &Walk) -> Option<String> {
        let hour_index = self.hour_index(walk.out.cursor());
        let hour = hour_index.rem_euclid(24) as u32;
        if !self.config.features.windows.iter().any(|window| window.contains(hour)) {
            return None;
        }

        walk.daily
            .iter()
            .map(|(category, _)| category)
            .find(|category| {
                walk.daily.available(category).is_some()
                    && !walk.aired_hours.contains(&(category.to_string(), hour_index))
            })
            .map(str::to_string)
    }

    /// Identifier after a bookend, whatever the cadence counter says.
    fn identifier_after_bookend(&self, walk: &mut Walk) {
        if let Some(identifier) = self.identifier
            && !walk.out.last_was_identifier()
        {
            walk.out.emit_identifier(identifier);
        }
    }

    /// Air the next rotation category that has something to give.
    fn round_robin(&self, walk: &mut Walk) -> bool {
        let len = self.rotation.len();
        for attempt in 0..len {
            let idx = (walk.rotation_idx + attempt) % len;
            if self.air(walk, &self.rotation[idx]) {
                walk.rotation_idx = (idx + 1) % len;
                return true;
            }
        }
        log::debug!("Rotation exhausted at +{:.0}s", walk.out.cursor());
        false
    }

    fn reserved_work_remains(&self, walk: &Walk) -> bool {
        !walk.evening_done
            || (self.config.schedule.strict_fixed_slots && walk.next_slot < self.slots.len())
            || walk.daily.any_available()
    }

    /// Hours since midnight of the program date at `cursor`. Exceeds 23 once
    /// the program runs past midnight.
    fn hour_index(&self, cursor: f64) -> i64 {
        let start = self.config.schedule.day_start.num_seconds_from_midnight() as f64;
        ((start + cursor) / 3600.0).floor() as i64
    }
}

/// Categories the rotation never draws from.
fn is_reserved(config: &Config, category: &str) -> bool {
    category == config.identifier.category
        || config.fillers.is_filler(category)
        || config.bookends.morning.as_deref() == Some(category)
        || config.bookends.evening.as_deref() == Some(category)
}
