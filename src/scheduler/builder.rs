//! Output accumulator shared by the timeline and template builders.

use chrono::{NaiveDateTime, TimeDelta};

use crate::domain::{MediaItem, ProgramItem};

/// Emitted items plus the virtual clock and identifier bookkeeping.
#[derive(Debug)]
pub struct ProgramBuilder {
    start: NaiveDateTime,
    cursor: f64,
    items: Vec<ProgramItem>,
    since_identifier: u32,
    last_was_identifier: bool,
}

impl ProgramBuilder {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            cursor: 0.0,
            items: Vec::new(),
            since_identifier: 0,
            last_was_identifier: false,
        }
    }

    /// Seconds since the day-start anchor.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Wall-clock time of the cursor.
    pub fn now(&self) -> NaiveDateTime {
        self.start + TimeDelta::milliseconds((self.cursor * 1000.0).round() as i64)
    }

    /// Move the cursor forward without emitting.
    pub fn advance(&mut self, secs: f64) {
        self.cursor += secs;
    }

    /// Jump the cursor to `offset` if that is ahead of it.
    pub fn advance_to(&mut self, offset: f64) {
        if offset > self.cursor {
            self.cursor = offset;
        }
    }

    pub fn emit(&mut self, item: &MediaItem) {
        self.push(item);
        self.since_identifier += 1;
        self.last_was_identifier = false;
    }

    /// Gap filler; does not count toward the identifier cadence.
    pub fn emit_filler(&mut self, item: &MediaItem) {
        self.push(item);
        self.last_was_identifier = false;
    }

    pub fn emit_identifier(&mut self, item: &MediaItem) {
        self.push(item);
        self.since_identifier = 0;
        self.last_was_identifier = true;
    }

    fn push(&mut self, item: &MediaItem) {
        self.items.push(ProgramItem::from(item));
        self.cursor += item.duration;
    }

    pub fn last_was_identifier(&self) -> bool {
        self.last_was_identifier
    }

    /// At least `threshold` content items since the last identifier and the
    /// previous emission was not an identifier.
    pub fn identifier_due(&self, threshold: u32) -> bool {
        !self.last_was_identifier && self.since_identifier >= threshold
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<ProgramItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap().and_hms_opt(6, 0, 0).unwrap()
    }

    #[test]
    fn test_emit_advances_cursor() {
        let mut builder = ProgramBuilder::new(start());
        builder.emit(&MediaItem::new("/m/a.mp4", 90.5, 0));
        assert_eq!(builder.cursor(), 90.5);
        assert_eq!(builder.now(), start() + TimeDelta::milliseconds(90_500));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_identifier_due_counts_content() {
        let mut builder = ProgramBuilder::new(start());
        let clip = MediaItem::new("/m/a.mp4", 10.0, 0);
        let spica = MediaItem::new("/m/SPICA.mp4", 25.0, 0);

        assert!(!builder.identifier_due(2));
        builder.emit(&clip);
        builder.emit(&clip);
        assert!(builder.identifier_due(2));

        builder.emit_identifier(&spica);
        assert!(builder.last_was_identifier());
        assert!(!builder.identifier_due(0));

        builder.emit_filler(&clip);
        assert!(!builder.last_was_identifier());
        assert!(!builder.identifier_due(1));
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let mut builder = ProgramBuilder::new(start());
        builder.advance(100.0);
        builder.advance_to(50.0);
        assert_eq!(builder.cursor(), 100.0);
        builder.advance_to(300.0);
        assert_eq!(builder.cursor(), 300.0);
    }
}
