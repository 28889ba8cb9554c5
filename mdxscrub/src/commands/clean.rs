//! Clean command implementation: walk a directory of MDX files, run the
//! cleanup pipeline over each one, and report.
//!
//! License: MIT OR Apache-2.0

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

use mdxscrub_core::{
    merge_rules, CorpusRunner, DocumentSink, RuleConfig, RunMode, RunStats, Sanitizer,
};

use crate::cli::CleanCommand;
use crate::discovery;
use crate::report;

/// Filesystem-backed write collaborator: full overwrite per document.
#[derive(Debug, Default)]
pub struct FsSink;

impl DocumentSink for FsSink {
    fn write(&mut self, path: &Path, text: &str) -> std::io::Result<()> {
        fs::write(path, text)
    }
}

/// Builds the effective rule table from defaults, an optional user config
/// file, and the enable/disable lists.
pub fn effective_config(
    config_path: Option<&Path>,
    enable_rules: &[String],
    disable_rules: &[String],
) -> Result<RuleConfig> {
    let defaults = RuleConfig::load_default_rules()?;
    let user = match config_path {
        Some(path) => Some(RuleConfig::load_from_file(path)?),
        None => None,
    };

    let mut config = merge_rules(defaults, user);
    config.set_active_rules(enable_rules, disable_rules);
    Ok(config)
}

/// Runs the `clean` command. Returns the process exit code: 0 on a clean
/// run, 2 when any per-document failure occurred (the run still completes
/// and reports). Configuration errors bubble up as `Err` and exit 1.
pub fn run_clean(cmd: &CleanCommand) -> Result<i32> {
    if !cmd.dir.is_dir() {
        bail!("{} is not a directory", cmd.dir.display());
    }

    let config = effective_config(
        cmd.config.as_deref(),
        &cmd.enable_rules,
        &cmd.disable_rules,
    )?;
    let sanitizer = Sanitizer::new(&config).context("Failed to build the cleanup pipeline")?;

    let mode = if cmd.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Apply
    };

    let files = discovery::find_mdx_files(&cmd.dir);
    info!(
        "Processing {} MDX file(s) under {}.",
        files.len(),
        cmd.dir.display()
    );

    let sources = files.into_iter().map(|path| {
        debug!("Reading {}.", path.display());
        let read = fs::read_to_string(&path);
        (path, read)
    });

    let runner = CorpusRunner::new(&sanitizer, mode);
    let stats = runner.run(sources, &mut FsSink);

    report::print_run_summary(&stats, mode);

    if let Some(json_path) = &cmd.summary_json {
        write_summary_json(json_path, &stats)?;
    }

    Ok(if stats.failures.is_empty() { 0 } else { 2 })
}

fn write_summary_json(path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize run statistics")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary JSON to {}", path.display()))?;
    info!("Wrote summary JSON to {}.", path.display());
    Ok(())
}
