// mdxscrub/src/main.rs
//! mdxscrub entry point.
//!
//! Parses arguments, initializes logging, and dispatches to the command
//! implementations. Exit codes: 0 on success, 1 on configuration errors,
//! 2 when per-document failures occurred during an otherwise complete run.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use mdxscrub::cli::{Cli, Commands};
use mdxscrub::{commands, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let exit_code = match &cli.command {
        Commands::Clean(cmd) => commands::clean::run_clean(cmd)?,
        Commands::Rules(cmd) => commands::rules::run_rules(cmd)?,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
