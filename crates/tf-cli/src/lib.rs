//! Timeflies CLI library.
//!
//! This crate provides the command line interface and the text/JSON report
//! renderers for the timeflies work log processor.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Job};
pub use config::Config;
