//! Replica CLI Binary
//!
//! Command-line interface for manual, auditable backup replication.

use clap::Parser;
use replica::cli::{Cli, CommandOutcome, RunContext};
use replica::logging::init_logging;
use std::process;
use tracing::{error, info};

/// Exit code for a review the user declined; distinct from success (0),
/// operation failure (1), and usage errors (2, from clap).
const EXIT_CANCELED: i32 = 3;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Replica CLI starting");

    let context = RunContext::new(cli.no_progress);

    match context.execute(&cli.command) {
        Ok(CommandOutcome::Completed(output)) => {
            info!("Command completed successfully");
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Ok(CommandOutcome::Canceled) => {
            info!("Review canceled by user");
            println!("Canceled.");
            process::exit(EXIT_CANCELED);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
