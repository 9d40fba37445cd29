//! Domain types for playgen
//!
//! - MediaItem / CategoryPool: scanned clips grouped by logical category
//! - ProgramItem / Program: the generated day, in ffplayout's playlist format
//! - ScheduleSlot: an entry of the fixed programming table

pub mod media;
pub mod program;
pub mod slot;

pub use media::{CategoryPool, FolderMap, MediaItem};
pub use program::{Program, ProgramItem};
pub use slot::{ScheduleSlot, order_slots, parse_time_of_day};
