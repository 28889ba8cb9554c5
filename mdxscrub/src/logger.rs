//! Logger initialization for the mdxscrub CLI.
//!
//! License: MIT OR Apache-2.0

use log::LevelFilter;

/// Initializes env_logger, honoring `RUST_LOG` unless an explicit level is
/// given. Safe to call more than once; only the first call takes effect.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let _ = builder.format_timestamp(None).try_init();
}
