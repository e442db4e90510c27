//! Command-line interface definition.
//!
//! - `md2blocks convert` - render Markdown files into block descriptor JSON
//! - `md2blocks check` - render Markdown files and report diagnostics

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// md2blocks - render Markdown into block descriptors
#[derive(Parser, Debug)]
#[command(
    name = "md2blocks",
    version,
    about = "Render Markdown into block descriptors",
    long_about = "md2blocks renders Markdown documents into the ordered tree of typed block\n\
                  descriptors a block-based document store creates one by one. Output is JSON."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to md2blocks.toml in the working directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render Markdown files and print their block descriptors as JSON
    ///
    /// Directories are searched recursively for .md and .markdown files.
    Convert(ConvertArgs),

    /// Render Markdown files and report diagnostics without printing blocks
    Check(CheckArgs),
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Markdown files or directories
    ///
    /// Examples:
    ///   md2blocks convert README.md
    ///   md2blocks convert docs/ notes/todo.md
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Keep raw HTML as plain text instead of extracting <img> tags
    #[arg(long)]
    pub no_html: bool,

    /// Keep $ and $$ as plain text instead of rendering equations
    #[arg(long)]
    pub no_latex: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Markdown files or directories
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Treat rendering diagnostics as failures
    #[arg(long)]
    pub fail_on_diagnostics: bool,

    /// Keep raw HTML as plain text instead of extracting <img> tags
    #[arg(long)]
    pub no_html: bool,

    /// Keep $ and $$ as plain text instead of rendering equations
    #[arg(long)]
    pub no_latex: bool,
}
