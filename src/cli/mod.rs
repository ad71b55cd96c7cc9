//! CLI module
//!
//! Command-line interface for browsing the feed.
//!
//! # Commands
//!
//! - `browse` - Load the top-rated movies page by page, scrolling to the end
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
