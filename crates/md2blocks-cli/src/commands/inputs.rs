//! Markdown input discovery and per-document rendering.

use crate::config::Md2BlocksConfig;
use crate::error::{CliError, Result, ResultExt};
use md2blocks::{Output, convert};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m)))
}

/// Expand the given paths into Markdown files.
///
/// Files are taken as given whatever their extension; directories are walked
/// for `.md`/`.markdown` files in sorted order. Duplicates keep their first
/// position.
pub(crate) fn collect(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.clone()));
        }
        if path.is_file() {
            push_unique(&mut files, path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                push_unique(&mut files, entry.into_path());
            }
        }
    }

    if files.is_empty() {
        return Err(CliError::NoInputs);
    }
    tracing::debug!(count = files.len(), "collected markdown files");
    Ok(files)
}

fn push_unique(files: &mut Vec<PathBuf>, path: PathBuf) {
    if !files.contains(&path) {
        files.push(path);
    }
}

/// Read and render one document
pub(crate) fn render_file(path: &Path, config: &Md2BlocksConfig) -> Result<Output> {
    let source = std::fs::read_to_string(path).with_path(path)?;
    let shown = path.display().to_string();
    tracing::debug!(path = %shown, bytes = source.len(), "rendering");

    convert(&source, config.convert_options(shown)).map_err(|source| CliError::Convert {
        path: path.to_path_buf(),
        source,
    })
}
