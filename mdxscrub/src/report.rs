//! Human-readable run reporting for the mdxscrub CLI.
//!
//! The summary is the user-visible contract of a run: files processed and
//! modified, per-rule hit counts across the whole corpus, the modified
//! paths in processing order, any per-document failures, and in dry-run
//! mode an explicit indicator that no writes occurred.
//!
//! License: MIT OR Apache-2.0

use comfy_table::{presets::UTF8_BORDERS_ONLY, Cell, Table};
use is_terminal::IsTerminal;
use owo_colors::{OwoColorize, Style};
use std::io;

use mdxscrub_core::{RuleConfig, RuleKind, RunMode, RunStats};

fn styles(colored: bool) -> (Style, Style, Style, Style) {
    if colored {
        (
            Style::new().bold(),
            Style::new().green(),
            Style::new().yellow(),
            Style::new().red(),
        )
    } else {
        (Style::new(), Style::new(), Style::new(), Style::new())
    }
}

/// Prints the end-of-run summary to stdout.
pub fn print_run_summary(stats: &RunStats, mode: RunMode) {
    let colored = io::stdout().is_terminal();
    let (heading, ok, notice, alert) = styles(colored);

    println!();
    println!("{}", "Cleanup Summary".style(heading));
    println!("  Files processed: {}", stats.files_processed);
    println!("  Files modified:  {}", stats.files_modified.style(ok));
    if !stats.failures.is_empty() {
        println!("  Files failed:    {}", stats.failures.len().style(alert));
    }

    if !stats.per_rule_hits.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Rule", "Hits"]);
        for (rule_name, count) in &stats.per_rule_hits {
            table.add_row(vec![Cell::new(rule_name), Cell::new(count)]);
        }
        println!();
        println!("{}", table);
    }

    if !stats.modified_paths.is_empty() {
        println!();
        let label = match mode {
            RunMode::DryRun => "Would modify:",
            RunMode::Apply => "Modified:",
        };
        println!("{}", label.style(heading));
        for path in &stats.modified_paths {
            println!("  {}", path.display());
        }
    }

    if !stats.failures.is_empty() {
        println!();
        println!("{}", "Failures:".style(heading));
        for failure in &stats.failures {
            println!("  {}: {}", failure.path.display(), failure.message.style(alert));
        }
    }

    if mode == RunMode::DryRun {
        println!();
        println!("{}", "DRY RUN: no files were written.".style(notice));
        println!("Run again without --dry-run to apply the changes.");
    }
}

/// Prints the effective rule table for the `rules` command.
pub fn print_rule_table(config: &RuleConfig) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Rule", "Kind", "Flags", "Description"]);

    for rule in &config.rules {
        let kind = match rule.kind {
            RuleKind::Regex => "regex",
            RuleKind::Block => "block",
        };

        let mut flags = Vec::new();
        if rule.multiline {
            flags.push("m");
        }
        if rule.dot_matches_new_line {
            flags.push("s");
        }
        if rule.case_insensitive {
            flags.push("i");
        }
        if !rule.is_enabled() {
            flags.push("disabled");
        }

        table.add_row(vec![
            Cell::new(&rule.name),
            Cell::new(kind),
            Cell::new(flags.join(",")),
            Cell::new(rule.description.as_deref().unwrap_or("")),
        ]);
    }

    println!("{}", table);
    println!("{} rule(s) in application order.", config.rules.len());
}
