//! Command implementations for the mdxscrub CLI.
//!
//! License: MIT OR Apache-2.0

pub mod clean;
pub mod rules;
