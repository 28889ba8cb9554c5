//! compiler.rs - Manages the compilation and caching of cleanup rules.
//!
//! This module converts a `RuleConfig` into `CompiledRules`, which are
//! optimized for efficient application. A malformed pattern is an error
//! here, at construction time, before any document is touched. A global,
//! shared cache avoids redundant compilation across runs in one process.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{CleanupRule, RuleConfig, RuleKind, MAX_PATTERN_LENGTH};
use crate::errors::ScrubError;
use crate::replacements::BuiltinReplacer;

/// How a rule turns a match into replacement text.
#[derive(Debug, Clone)]
pub enum Replacer {
    /// A literal template, expanded with `${n}` capture references.
    Template(String),
    /// A named built-in replacement function.
    Builtin(BuiltinReplacer),
}

/// The compiled matching strategy of a rule.
#[derive(Debug)]
pub enum CompiledMatcher {
    /// A compiled regex plus its resolved replacer.
    Regex { regex: Regex, replacer: Replacer },
    /// A line-oriented block scanner (see `engine::apply_block_rule`).
    Block {
        markers: Vec<String>,
        resume_separators: Vec<String>,
        resume_on_heading: bool,
    },
}

/// Represents a single compiled cleanup rule, ready for application.
#[derive(Debug)]
pub struct CompiledRule {
    /// The unique name of the rule; the statistics key.
    pub name: String,
    /// Disabled rules keep their position in the set but are skipped.
    pub enabled: bool,
    /// The compiled matching strategy.
    pub matcher: CompiledMatcher,
}

/// The full ordered set of compiled rules for one pipeline.
#[derive(Debug)]
pub struct CompiledRules {
    /// Compiled rules in application order.
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rule sets.
    /// The key is a hash of the rule table in declaration order.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `RuleConfig` to create a stable, unique key for the cache.
///
/// Rules are hashed in declaration order: order changes pipeline semantics,
/// so two tables with the same rules in a different order must not share a
/// cache entry.
fn hash_config(config: &RuleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.rules.hash(&mut hasher);
    hasher.finish()
}

fn compile_one(rule: &CleanupRule) -> Result<CompiledRule, ScrubError> {
    let matcher = match rule.kind {
        RuleKind::Regex => {
            let pattern = rule.pattern.as_ref().ok_or_else(|| {
                ScrubError::Fatal(format!("Rule '{}' is missing its pattern.", rule.name))
            })?;

            if pattern.len() > MAX_PATTERN_LENGTH {
                return Err(ScrubError::PatternLengthExceeded(
                    rule.name.clone(),
                    pattern.len(),
                    MAX_PATTERN_LENGTH,
                ));
            }

            let regex = RegexBuilder::new(pattern)
                .multi_line(rule.multiline)
                .dot_matches_new_line(rule.dot_matches_new_line)
                .case_insensitive(rule.case_insensitive)
                .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
                .build()
                .map_err(|e| ScrubError::RuleCompilation(rule.name.clone(), e))?;

            let replacer = match &rule.replace_fn {
                Some(fn_name) => BuiltinReplacer::from_name(fn_name)
                    .map(Replacer::Builtin)
                    .ok_or_else(|| {
                        ScrubError::UnknownReplacementFn(rule.name.clone(), fn_name.clone())
                    })?,
                None => Replacer::Template(rule.replace_with.clone()),
            };

            CompiledMatcher::Regex { regex, replacer }
        }
        RuleKind::Block => {
            if rule.markers.is_empty() {
                warn!("Block rule '{}' has no markers and will never fire.", rule.name);
            }
            CompiledMatcher::Block {
                markers: rule.markers.clone(),
                resume_separators: rule.resume_separators.clone(),
                resume_on_heading: rule.resume_on_heading,
            }
        }
    };

    Ok(CompiledRule {
        name: rule.name.clone(),
        enabled: rule.is_enabled(),
        matcher,
    })
}

/// Compiles a rule table into `CompiledRules` for efficient matching.
/// This is the low-level function that performs the actual regex compilation.
pub fn compile_rules(rules_to_compile: &[CleanupRule]) -> Result<CompiledRules, ScrubError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::with_capacity(rules_to_compile.len());
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        match compile_one(rule) {
            Ok(compiled) => {
                debug!("Rule '{}' compiled successfully.", rule.name);
                compiled_rules.push(compiled);
            }
            Err(e) => compilation_errors.push(e),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(ScrubError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
        Ok(CompiledRules { rules: compiled_rules })
    }
}

/// Gets a `CompiledRules` instance from the cache or compiles them if not
/// found.
///
/// This is the public entry point for retrieving compiled rules. It returns
/// an `Arc` to a `CompiledRules` instance, allowing for cheap sharing.
pub fn get_or_compile_rules(config: &RuleConfig) -> Result<Arc<CompiledRules>, ScrubError> {
    let cache_key = hash_config(config);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_RULES_CACHE
            .read()
            .map_err(|_| ScrubError::Fatal("Compiled rules cache lock poisoned".to_string()))?;
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {}", &cache_key);
            return Ok(Arc::clone(rules));
        }
    } // Read lock is released here.

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = compile_rules(&config.rules)?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_RULES_CACHE
        .write()
        .map_err(|_| ScrubError::Fatal("Compiled rules cache lock poisoned".to_string()))?
        .insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached rules for key: {}", &cache_key);
    Ok(compiled_arc)
}
