//! Rules command implementation: print the effective rule table.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;

use crate::cli::RulesCommand;
use crate::commands::clean::effective_config;
use crate::report;

pub fn run_rules(cmd: &RulesCommand) -> Result<i32> {
    let config = effective_config(cmd.config.as_deref(), &[], &[])?;
    report::print_rule_table(&config);
    Ok(0)
}
