// mdxscrub/src/lib.rs
//! # mdxscrub CLI Application
//!
//! This crate provides the command-line interface over the
//! `mdxscrub-core` cleanup pipeline: argument parsing, file discovery,
//! logging setup, and run reporting.

pub mod cli;
pub mod commands;
pub mod discovery;
pub mod logger;
pub mod report;
