//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: build and write the program for a date
//! - scan: summarize the media library by category
//! - peek: preview the next pick of a category

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Playgen - daily broadcast program generator
#[derive(Parser, Debug)]
#[command(name = "playgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the program for a date and write it to the output directory
    Generate {
        /// Program date (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Previous program to replay with fresh picks
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Skip ffprobe and use the default duration for every clip
        #[arg(long)]
        no_probe: bool,
    },

    /// Scan the media library and list categories
    Scan {
        /// Skip ffprobe and use the default duration for every clip
        #[arg(long)]
        no_probe: bool,
    },

    /// Show the clip a category would get next, without recording it
    Peek {
        /// Category name (e.g. dokumentarni)
        category: String,

        /// Date to evaluate recency against (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}
