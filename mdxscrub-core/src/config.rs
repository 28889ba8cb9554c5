//! Configuration management for `mdxscrub-core`.
//!
//! This module defines the core data structures for cleanup rules and rule
//! sets. It handles serialization/deserialization of YAML rule tables and
//! provides utilities for loading, merging, and validating them.
//!
//! Rule order is significant: later rules see the output of earlier rules,
//! and the default table is ordered deliberately (e.g. brace rewriting runs
//! after every rule that strips brace-bearing CSS).
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::ScrubError;
use crate::replacements::BuiltinReplacer;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The matching strategy a rule uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A regex pattern with a template or builtin-function replacement.
    #[default]
    Regex,
    /// A line-oriented scanner that drops marked blocks of lines.
    Block,
}

/// Represents a single cleanup rule in a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupRule {
    /// Unique identifier for the rule (e.g., "newsletter_css"). Used as the
    /// statistics key in run reports.
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// Whether this is a regex rule or a line-block rule.
    pub kind: RuleKind,
    /// The regex pattern string (regex rules only).
    pub pattern: Option<String>,
    /// Replacement template; may reference capture groups as `${1}`.
    /// Defaults to the empty string, i.e. strip the match.
    pub replace_with: String,
    /// Name of a built-in replacement function. When set, it takes
    /// precedence over `replace_with`.
    pub replace_fn: Option<String>,
    /// If true, enables multiline mode (`^`/`$` match line boundaries).
    pub multiline: bool,
    /// If true, the dot character `.` in the pattern will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, the pattern matches case-insensitively.
    pub case_insensitive: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    /// Substrings that flip a block rule into its skipping state
    /// (block rules only).
    pub markers: Vec<String>,
    /// Exact (trimmed) line contents that end a skipped block. The
    /// separator line itself is kept.
    pub resume_separators: Vec<String>,
    /// If true, a `#`-prefixed heading line also ends a skipped block.
    pub resume_on_heading: bool,
}

impl Default for CleanupRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            kind: RuleKind::Regex,
            pattern: None,
            replace_with: String::new(),
            replace_fn: None,
            multiline: false,
            dot_matches_new_line: false,
            case_insensitive: false,
            enabled: None,
            markers: Vec::new(),
            resume_separators: vec!["* * *".to_string(), "---".to_string()],
            resume_on_heading: true,
        }
    }
}

impl CleanupRule {
    /// Whether the engine should apply this rule.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// An ordered table of cleanup rules. Order is fixed at load time and is a
/// first-class part of the pipeline's semantics.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RuleConfig {
    /// The ordered list of cleanup rules.
    pub rules: Vec<CleanupRule>,
}

impl RuleConfig {
    /// Loads cleanup rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RuleConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in default rule table from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RuleConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Filters active rules based on enable/disable lists provided via CLI.
    ///
    /// A non-empty enable list restricts the table to exactly those names;
    /// the disable list then removes names. Relative order is preserved.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let name = rule.name.as_str();
            !disable_set.contains(name) && (enable_set.is_empty() || enable_set.contains(name))
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    /// Validates rule integrity (names, patterns, capture-group references,
    /// builtin replacement functions, block-rule markers).
    ///
    /// All violations are collected and reported together, before any
    /// document is touched.
    pub fn validate(&self) -> Result<(), ScrubError> {
        let mut rule_names = HashSet::new();
        let mut errors = Vec::new();
        let capture_group_regex = Regex::new(r"\$\{?(\d+)\}?").expect("static pattern");

        for rule in &self.rules {
            if rule.name.is_empty() {
                errors.push("A rule has an empty `name` field.".to_string());
            } else if !rule_names.insert(rule.name.clone()) {
                errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
            }

            match rule.kind {
                RuleKind::Regex => {
                    let pattern = match &rule.pattern {
                        Some(p) => p,
                        None => {
                            errors.push(format!(
                                "Rule '{}' is missing the `pattern` field.",
                                rule.name
                            ));
                            continue;
                        }
                    };

                    if pattern.is_empty() {
                        errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
                    }

                    if let Err(e) = Regex::new(pattern) {
                        errors.push(format!(
                            "Rule '{}' has an invalid regex pattern: {}",
                            rule.name, e
                        ));
                        continue;
                    }

                    if let Some(fn_name) = &rule.replace_fn {
                        if BuiltinReplacer::from_name(fn_name).is_none() {
                            errors.push(format!(
                                "Rule '{}': unknown replacement function '{}'.",
                                rule.name, fn_name
                            ));
                        }
                        continue;
                    }

                    // Escape-aware count of opening parens; an upper bound on
                    // the number of capture groups in the pattern.
                    let mut group_count = 0;
                    let mut is_escaped = false;
                    for c in pattern.chars() {
                        match c {
                            '\\' => is_escaped = !is_escaped,
                            '(' if !is_escaped => {
                                group_count += 1;
                                is_escaped = false;
                            }
                            _ => is_escaped = false,
                        }
                    }

                    for cap in capture_group_regex.captures_iter(&rule.replace_with) {
                        if let Some(group_num_str) = cap.get(1) {
                            if let Ok(group_num) = group_num_str.as_str().parse::<usize>() {
                                if group_num > group_count {
                                    errors.push(format!(
                                        "Rule '{}': replacement references non-existent capture group '${}'.",
                                        rule.name, group_num
                                    ));
                                }
                            }
                        }
                    }
                }
                RuleKind::Block => {
                    if rule.markers.is_empty() {
                        errors.push(format!(
                            "Block rule '{}' has no `markers`; it would never fire.",
                            rule.name
                        ));
                    }
                    if rule.resume_separators.is_empty() && !rule.resume_on_heading {
                        errors.push(format!(
                            "Block rule '{}' has no way to resume copying; it would skip to end of file.",
                            rule.name
                        ));
                    }
                }
            }
        }

        if !errors.is_empty() {
            Err(ScrubError::Validation(errors.join("\n")))
        } else {
            Ok(())
        }
    }
}

/// Merges a user-defined rule table over the defaults.
///
/// User rules with a known name replace the default in place (keeping the
/// default's position in the order); unknown names are appended at the end.
pub fn merge_rules(default_config: RuleConfig, user_config: Option<RuleConfig>) -> RuleConfig {
    debug!(
        "merge_rules called. Initial default rules count: {}",
        default_config.rules.len()
    );

    let mut rules = default_config.rules;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for user_rule in user_cfg.rules {
            match rules.iter_mut().find(|r| r.name == user_rule.name) {
                Some(existing) => *existing = user_rule,
                None => rules.push(user_rule),
            }
        }
    }

    debug!("Final total rules after merge: {}", rules.len());
    RuleConfig { rules }
}
