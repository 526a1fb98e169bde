//! CLI module
//!
//! Command-line interface for searching and looking up assets.
//!
//! # Commands
//!
//! - `search` - Run a query across all result pages
//! - `lookup` - Fetch assets by identifier in batches
//! - `config` - Show the config location or merged settings

mod commands;
mod output;
mod runner;

pub use commands::{Cli, Commands, ConfigAction, OutputFormat};
pub use output::render;
pub use runner::{Outcome, Runner};
