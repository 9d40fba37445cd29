//! Program construction.
//!
//! - **Recency selection**: picks the next clip of a category from the play history
//! - **Daily selection**: fixes the day's repeating feature clips
//! - **Timeline**: walks the broadcast day and fills it
//! - **Template replay**: refills a previous program's structure

mod builder;
mod daily;
mod recency;
mod template;
mod timeline;

pub use builder::ProgramBuilder;
pub use daily::{DailyPick, DailyPicks, DailySelector, next_episode};
pub use recency::{PlayPriority, RecencySelector, play_priority};
pub use template::TemplateReplay;
pub use timeline::TimelineScheduler;
