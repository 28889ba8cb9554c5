// mdxscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the mdxscrub
//! application, including all available commands and their arguments.
//!
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "mdxscrub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip CMS export artifacts from MDX files",
    long_about = "mdxscrub is a command-line utility for cleaning up MDX documents exported \
from a content-management platform. It applies an ordered table of named cleanup rules \
(newsletter widgets, bookmark cards, inline SVG buttons, raw script/style blocks, comparison \
operators that collide with JSX syntax) to every .mdx file under a directory, reports which \
rules fired and how often, and supports a dry-run mode that commits nothing.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this run)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `mdxscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cleans every .mdx file under a directory, applying the rule table.
    #[command(about = "Cleans every .mdx file under a directory, applying the rule table.")]
    Clean(CleanCommand),

    /// Lists the effective rule table without touching any file.
    #[command(about = "Lists the effective rule table without touching any file.")]
    Rules(RulesCommand),
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanCommand {
    /// Directory scanned recursively for .mdx files.
    #[arg(value_name = "DIR", help = "Directory scanned recursively for .mdx files.")]
    pub dir: PathBuf,

    /// Compute and report would-be changes without writing any file.
    #[arg(long = "dry-run", help = "Report would-be changes without writing any file.")]
    pub dry_run: bool,

    /// Path to a custom rule configuration file (YAML), merged over the defaults.
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom rule configuration file (YAML), merged over the defaults.")]
    pub config: Option<PathBuf>,

    /// Explicitly enable only these rule names (comma-separated).
    #[arg(long = "enable", value_name = "RULES", value_delimiter = ',', help = "Explicitly enable only these rule names (comma-separated).")]
    pub enable_rules: Vec<String>,

    /// Disable these rule names (comma-separated).
    #[arg(long = "disable", value_name = "RULES", value_delimiter = ',', help = "Disable these rule names (comma-separated).")]
    pub disable_rules: Vec<String>,

    /// Write the run statistics as JSON to this file.
    #[arg(long = "summary-json", value_name = "FILE", help = "Write the run statistics as JSON to this file.")]
    pub summary_json: Option<PathBuf>,
}

/// Arguments for the `rules` command.
#[derive(Parser, Debug)]
pub struct RulesCommand {
    /// Path to a custom rule configuration file (YAML), merged over the defaults.
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom rule configuration file (YAML), merged over the defaults.")]
    pub config: Option<PathBuf>,
}
