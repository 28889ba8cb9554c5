//! engine.rs - Applies a compiled rule set to one document's text.
//!
//! The `Sanitizer` is a pure function of its rule set and input: rules are
//! applied strictly in set order, each rule scanning the output of the
//! previous one, exactly once per pass. There is no re-scan loop, which
//! bounds cost at O(text length x rule count) and makes a rule that could
//! re-introduce its own pattern harmless by construction.
//!
//! License: MIT OR Apache-2.0

use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::compiler::{get_or_compile_rules, CompiledMatcher, CompiledRules, Replacer};
use crate::config::RuleConfig;
use crate::errors::ScrubError;

/// Cap on how much a single rule may grow a document, as a multiple of the
/// input length plus slack. A replacement that blows past this is treated
/// as a per-document rule-application failure rather than an OOM hazard.
const MAX_OUTPUT_GROWTH_FACTOR: usize = 16;
const MAX_OUTPUT_GROWTH_SLACK: usize = 4096;

/// The result of one pipeline pass over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOutcome {
    /// The transformed text.
    pub text: String,
    /// True only when `text` differs from the input. A rule whose
    /// replacement is textually identical to its match reports hits but
    /// does not set this.
    pub modified: bool,
    /// Non-overlapping match counts per rule, keyed by rule name. Rules
    /// with zero matches are absent.
    pub hits: HashMap<String, usize>,
}

/// Applies an ordered, compiled rule set to document text.
///
/// Holds no mutable state; the same sanitizer can be reused across a whole
/// corpus run (and shared across threads if a caller parallelizes).
#[derive(Debug)]
pub struct Sanitizer {
    compiled: Arc<CompiledRules>,
}

impl Sanitizer {
    /// Validates and compiles `config` into a ready-to-run sanitizer.
    ///
    /// All configuration problems (duplicate names, malformed patterns,
    /// unknown builtins) surface here, before any document is touched.
    pub fn new(config: &RuleConfig) -> Result<Self, ScrubError> {
        config.validate()?;
        let compiled = get_or_compile_rules(config)?;
        Ok(Self { compiled })
    }

    /// Wraps an already-compiled rule set.
    pub fn from_compiled(compiled: Arc<CompiledRules>) -> Self {
        Self { compiled }
    }

    /// The compiled rules this sanitizer applies, in order.
    pub fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled
    }

    /// Runs one pipeline pass over `text`.
    pub fn sanitize(&self, text: &str) -> Result<SanitizeOutcome, ScrubError> {
        let mut current = text.to_string();
        let mut hits: HashMap<String, usize> = HashMap::new();

        for rule in &self.compiled.rules {
            if !rule.enabled {
                trace!("Skipping disabled rule '{}'.", rule.name);
                continue;
            }

            let (next, count) = match &rule.matcher {
                CompiledMatcher::Regex { regex, replacer } => {
                    apply_regex_rule(&rule.name, regex, replacer, &current)?
                }
                CompiledMatcher::Block {
                    markers,
                    resume_separators,
                    resume_on_heading,
                } => apply_block_rule(markers, resume_separators, *resume_on_heading, &current),
            };

            if count > 0 {
                trace!("Rule '{}' matched {} time(s).", rule.name, count);
                *hits.entry(rule.name.clone()).or_insert(0) += count;
            }
            current = next;
        }

        let modified = current != text;
        debug!(
            "Pipeline pass complete: {} rule hit(s), modified = {}.",
            hits.values().sum::<usize>(),
            modified
        );

        Ok(SanitizeOutcome { text: current, modified, hits })
    }
}

/// Applies one regex rule, building the output span by span.
///
/// The hit count is the number of non-overlapping matches on the text this
/// rule saw, counted even when the replacement equals the match.
fn apply_regex_rule(
    rule_name: &str,
    regex: &Regex,
    replacer: &Replacer,
    text: &str,
) -> Result<(String, usize), ScrubError> {
    let growth_limit = text
        .len()
        .saturating_mul(MAX_OUTPUT_GROWTH_FACTOR)
        .saturating_add(MAX_OUTPUT_GROWTH_SLACK);

    let mut out = String::with_capacity(text.len());
    let mut last_end = 0usize;
    let mut hit_count = 0usize;

    for caps in regex.captures_iter(text) {
        let whole = caps
            .get(0)
            .ok_or_else(|| ScrubError::Fatal("Regex capture failed".to_string()))?;
        hit_count += 1;

        out.push_str(&text[last_end..whole.start()]);
        match replacer {
            Replacer::Template(template) => caps.expand(template, &mut out),
            Replacer::Builtin(builtin) => out.push_str(&builtin.apply(rule_name, &caps)?),
        }
        last_end = whole.end();

        if out.len() > growth_limit {
            return Err(ScrubError::RuleApplication {
                rule: rule_name.to_string(),
                message: format!(
                    "replacement output exceeded {} bytes for a {}-byte input",
                    growth_limit,
                    text.len()
                ),
            });
        }
    }
    out.push_str(&text[last_end..]);

    Ok((out, hit_count))
}

/// States of the line-oriented block scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Copying,
    Skipping,
}

/// Applies one block rule: an explicit two-state machine over lines.
///
/// A line containing any marker enters `Skipping` (the marker line is
/// dropped; each `Copying -> Skipping` transition counts one hit). While
/// skipping, lines are dropped until a separator line or, when enabled, a
/// `#`-prefixed heading line, which is kept and returns the scanner to
/// `Copying`.
fn apply_block_rule(
    markers: &[String],
    resume_separators: &[String],
    resume_on_heading: bool,
    text: &str,
) -> (String, usize) {
    let mut kept: Vec<&str> = Vec::new();
    let mut state = ScanState::Copying;
    let mut hit_count = 0usize;

    for line in text.split('\n') {
        if markers.iter().any(|m| line.contains(m.as_str())) {
            if state == ScanState::Copying {
                hit_count += 1;
            }
            state = ScanState::Skipping;
            continue;
        }

        match state {
            ScanState::Copying => kept.push(line),
            ScanState::Skipping => {
                let trimmed = line.trim();
                let is_separator = resume_separators.iter().any(|s| trimmed == s.as_str());
                if is_separator || (resume_on_heading && line.starts_with('#')) {
                    state = ScanState::Copying;
                    kept.push(line);
                }
            }
        }
    }

    (kept.join("\n"), hit_count)
}
