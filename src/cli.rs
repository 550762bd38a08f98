//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mvpforge")]
#[command(about = "Turn fresh arXiv research into scored startup blueprints", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a config file (defaults to ~/.mvpforge/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch papers, generate ideas, and persist today's batch
    Run {
        /// Batch date override (YYYY-MM-DD, defaults to today UTC)
        #[arg(long)]
        date: Option<String>,

        /// Papers fetched per category (overrides config)
        #[arg(long)]
        max_per_category: Option<usize>,
    },

    /// Show the most recent batch
    Latest,

    /// Show the batch for a specific date
    Show {
        /// Batch date (YYYY-MM-DD)
        date: String,
    },
}
