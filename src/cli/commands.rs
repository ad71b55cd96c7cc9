//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Endless feed browser
#[derive(Parser, Debug)]
#[command(name = "endless-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides config and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Page limit (overrides config and environment)
    #[arg(long, global = true)]
    pub total_pages: Option<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the feed, scrolling to the end after every page
    Browse {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,

        /// Rows that fit on the simulated screen
        #[arg(long, default_value = "10")]
        visible_rows: usize,

        /// Ask before retrying a failed page instead of stopping
        #[arg(short, long)]
        interactive: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one row per line)
    Json,
    /// Human-readable output
    Pretty,
}
