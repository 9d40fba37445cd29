//! CLI module for playgen - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
