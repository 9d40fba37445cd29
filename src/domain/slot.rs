//! Fixed programming slots.

use chrono::{NaiveTime, Timelike};

use crate::error::{PlaygenError, Result};

const SECS_PER_DAY: u32 = 24 * 60 * 60;

/// A `(time-of-day, category)` entry of the fixed programming table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub time: NaiveTime,
    pub category: String,
}

impl ScheduleSlot {
    pub fn new(time: NaiveTime, category: impl Into<String>) -> Self {
        Self {
            time,
            category: category.into(),
        }
    }

    /// Parse a slot from `HH:MM:SS` (or `HH:MM`) and a category.
    pub fn parse(time: &str, category: impl Into<String>) -> Result<Self> {
        Ok(Self::new(parse_time_of_day(time)?, category))
    }

    /// Seconds from `day_start` to this slot, wrapping past midnight.
    pub fn offset_from(&self, day_start: NaiveTime) -> f64 {
        let slot = self.time.num_seconds_from_midnight();
        let start = day_start.num_seconds_from_midnight();
        ((slot + SECS_PER_DAY - start) % SECS_PER_DAY) as f64
    }
}

/// Parse `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| PlaygenError::Config(format!("invalid time of day '{}': {}", value, e)))
}

/// Sort slots by their offset from the day-start anchor.
pub fn order_slots(mut slots: Vec<ScheduleSlot>, day_start: NaiveTime) -> Vec<ScheduleSlot> {
    slots.sort_by(|a, b| a.offset_from(day_start).total_cmp(&b.offset_from(day_start)));
    slots
}
