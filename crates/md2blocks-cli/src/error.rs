//! Error handling for the md2blocks CLI.
//!
//! `CliError` is the error every command returns. Domain errors convert into
//! it through `#[from]`; `main` turns it into a miette report.
//!
//! ```rust,no_run
//! use md2blocks_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod miette;

pub use self::miette::cli_error_to_miette;

use md2blocks::ConvertError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A document failed to render
    #[error("Failed to convert {}: {source}", .path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: Box<ConvertError>,
    },

    /// `check` found diagnostics while they are configured as failures
    #[error("{count} rendering diagnostic(s) in {documents} document(s)")]
    Diagnostics { count: usize, documents: usize },

    /// Paths resolved to no Markdown files
    #[error("No Markdown files found\n\nHint: Pass .md or .markdown files, or directories containing them")]
    NoInputs,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal failure
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{0}")]
    Custom(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create md2blocks.toml or drop --config", .0.display())]
    NotFound(PathBuf),

    /// Figment could not extract the merged configuration
    #[error("Invalid configuration: {message}\n\nHint: {hint}")]
    Invalid { message: String, hint: String },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Attach context to a `Result` on its way into `CliError`
pub trait ResultExt<T> {
    /// A missing-file I/O error becomes [`CliError::FileNotFound`] for `path`
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}
