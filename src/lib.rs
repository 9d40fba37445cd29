//! Playgen - daily broadcast program generator
//!
//! Builds a day-long program for a linear TV channel from a categorized media
//! library. Clip selection avoids near-term repeats, keeps series progressing
//! episode by episode and repeats one feature clip per category through the
//! day. Play history persists between runs.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod scheduler;
pub mod state;

pub use error::{PlaygenError, Result};
