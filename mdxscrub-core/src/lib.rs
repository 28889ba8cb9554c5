// mdxscrub-core/src/lib.rs
//! # mdxscrub Core Library
//!
//! `mdxscrub-core` provides the platform-independent logic for cleaning up
//! MDX documents exported from a CMS. It defines the data structures for
//! cleanup rules, compiles them into an efficient form, applies them as an
//! ordered pattern-substitution pipeline, and aggregates statistics across
//! a whole corpus run.
//!
//! The library is pure text transformation: it decides nothing about file
//! discovery and performs no terminal output. File reads arrive through the
//! runner's source iterator; writes leave through the `DocumentSink` seam.
//!
//! ## Modules
//!
//! * `config`: Defines `CleanupRule`s and `RuleConfig` with loading,
//!   merging, filtering, and validation.
//! * `compiler`: Compiles a rule table into `CompiledRules`, with caching.
//! * `replacements`: Built-in replacement functions for rules whose output
//!   is not a capture template.
//! * `engine`: The `Sanitizer`: one ordered pipeline pass over one text.
//! * `runner`: The `CorpusRunner`: iterates documents, persists changes in
//!   apply mode, and accumulates `RunStats`.
//! * `errors`: The `ScrubError` taxonomy.
//!
//! ## Usage Example
//!
//! ```rust
//! use mdxscrub_core::{RuleConfig, Sanitizer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RuleConfig::load_default_rules()?;
//! let sanitizer = Sanitizer::new(&config)?;
//! let outcome = sanitizer.sanitize("revenue <17% growth")?;
//! assert_eq!(outcome.text, "revenue less than 17% growth");
//! assert!(outcome.modified);
//! # Ok(())
//! # }
//! ```
//!
//! License: MIT OR Apache-2.0

pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod replacements;
pub mod runner;

pub use compiler::{CompiledMatcher, CompiledRule, CompiledRules, Replacer};
pub use config::{merge_rules, CleanupRule, RuleConfig, RuleKind};
pub use engine::{SanitizeOutcome, Sanitizer};
pub use errors::ScrubError;
pub use replacements::BuiltinReplacer;
pub use runner::{CorpusRunner, DocumentSink, RunFailure, RunMode, RunStats};
