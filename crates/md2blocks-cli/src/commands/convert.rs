//! Convert command implementation.
//!
//! Renders every input and writes a JSON array with one entry per document:
//! `{"path": ..., "blocks": [...], "diagnostics": [...]}`.

use super::inputs;
use crate::cli::ConvertArgs;
use crate::config::{CliOverrides, Md2BlocksConfig};
use crate::error::{Result, ResultExt};
use crate::ui;
use md2blocks::{Block, Diagnostic};
use serde::Serialize;
use std::path::Path;

/// One rendered document in the JSON output
#[derive(Debug, Serialize)]
pub struct Document {
    pub path: String,
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Execute the convert command.
///
/// The first document that fails to render aborts the command; nothing is
/// written in that case.
pub fn execute(args: &ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = CliOverrides::from_flags(args.no_html, args.no_latex).pretty(args.pretty);
    let config = Md2BlocksConfig::load(&overrides, config_path)?;
    let documents = convert_all(&args.paths, &config)?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&documents)?
    } else {
        serde_json::to_string(&documents)?
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_path(parent)?;
            }
            std::fs::write(path, json + "\n").with_path(path)?;
            ui::success(&format!(
                "Wrote {} document(s) to {}",
                documents.len(),
                path.display()
            ));
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Render every Markdown file under `paths`
pub fn convert_all(paths: &[std::path::PathBuf], config: &Md2BlocksConfig) -> Result<Vec<Document>> {
    let files = inputs::collect(paths)?;
    let mut documents = Vec::with_capacity(files.len());

    for file in files {
        let output = inputs::render_file(&file, config)?;
        tracing::info!(
            "{}",
            ui::document_summary(&file.display().to_string(), output.blocks.len(), output.diagnostics.len())
        );
        documents.push(Document {
            path: file.display().to_string(),
            blocks: output.blocks,
            diagnostics: output.diagnostics,
        });
    }

    Ok(documents)
}
