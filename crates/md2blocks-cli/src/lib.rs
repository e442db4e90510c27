//! md2blocks CLI.
//!
//! Command-line front end for the `md2blocks` renderer: walks Markdown files,
//! renders each one into block descriptors and prints them as JSON, or checks
//! them for rendering problems.
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - layered configuration (defaults, file, environment, flags)
//! - [`commands`] - `convert` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status messages on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
