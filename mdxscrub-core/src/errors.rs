//! errors.rs - Custom error types for the mdxscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `mdxscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Failed to compile cleanup rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Duplicate rule name found: '{0}'")]
    DuplicateRuleName(String),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Rule '{0}': unknown replacement function '{1}'")]
    UnknownReplacementFn(String, String),

    #[error("Rule '{rule}' failed while rewriting a match: {message}")]
    RuleApplication { rule: String, message: String },

    #[error("Rule validation failed:\n{0}")]
    Validation(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
