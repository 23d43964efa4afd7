//! CLI parse: clap types for Replica. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Replica CLI - Manual, auditable backup replication
#[derive(Parser)]
#[command(name = "replica")]
#[command(about = "Manual, auditable backup replication driven by content hashes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a tree, review detected changes, and commit them to its database
    Check {
        /// Tree root to check
        directory: PathBuf,
    },
    /// Show pending changes without committing anything
    Status {
        /// Tree root to inspect
        directory: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Propagate committed changes from a clean source tree to a clean destination
    Replicate {
        /// Source tree root
        src: PathBuf,
        /// Destination tree root
        dst: PathBuf,
    },
}
