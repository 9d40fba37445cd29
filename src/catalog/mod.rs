//! Media catalog: turning a directory of clips into category pools.
//!
//! - **Scanner** walks the library and probes clip durations
//! - **CategoryResolver** maps folder names to logical categories
//! - **Series** parsing orders episodic content by season and episode

mod category;
mod probe;
mod scanner;
mod series;

pub use category::{CategoryResolver, CategoryRule};
pub use probe::{DurationProbe, FfprobeProbe, FixedDurationProbe, duration_or_default, parse_duration};
pub use scanner::Scanner;
pub use series::{SeriesGroup, SeriesInfo, group_series, parse_series};
