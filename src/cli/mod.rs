//! CLI module
//!
//! The binary takes no arguments beyond `--help` and `--version`: it loads
//! `config/etl.yaml`, runs the job once and prints a JSON summary.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
