//! Check command implementation.
//!
//! Renders every input without printing blocks. Fatal render errors always
//! fail the command; diagnostics fail it only with `fail_on_diagnostics`.

use super::inputs;
use crate::cli::CheckArgs;
use crate::config::{CliOverrides, Md2BlocksConfig};
use crate::error::{CliError, Result};
use crate::ui;
use std::path::Path;

/// Totals over all checked documents
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub documents: usize,
    pub failed: usize,
    pub diagnostics: usize,
    pub documents_with_diagnostics: usize,
}

pub fn execute(args: &CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = CliOverrides::from_flags(args.no_html, args.no_latex)
        .fail_on_diagnostics(args.fail_on_diagnostics);
    let config = Md2BlocksConfig::load(&overrides, config_path)?;

    let summary = check_all(&args.paths, &config)?;
    evaluate(&summary, &config)
}

/// Render every document, reporting problems as they are found.
///
/// A document that fails to render is reported and counted; the remaining
/// documents are still checked.
pub fn check_all(paths: &[std::path::PathBuf], config: &Md2BlocksConfig) -> Result<CheckSummary> {
    let files = inputs::collect(paths)?;
    let mut summary = CheckSummary::default();
    ui::info(&format!("Checking {} document(s)", files.len()));

    for file in files {
        summary.documents += 1;
        let shown = file.display().to_string();

        match inputs::render_file(&file, config) {
            Ok(output) if output.diagnostics.is_empty() => {
                ui::success(&ui::document_summary(&shown, output.blocks.len(), 0));
            }
            Ok(output) => {
                summary.diagnostics += output.diagnostics.len();
                summary.documents_with_diagnostics += 1;
                ui::warning(&ui::document_summary(
                    &shown,
                    output.blocks.len(),
                    output.diagnostics.len(),
                ));
                for diagnostic in &output.diagnostics {
                    eprintln!("    {diagnostic}");
                }
            }
            Err(CliError::Convert { source, .. }) => {
                summary.failed += 1;
                ui::error(&format!("{shown}: {source}"));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

fn evaluate(summary: &CheckSummary, config: &Md2BlocksConfig) -> Result<()> {
    if summary.failed > 0 {
        return Err(CliError::Custom(format!(
            "{} of {} document(s) failed to render",
            summary.failed, summary.documents
        )));
    }
    if config.fail_on_diagnostics && summary.diagnostics > 0 {
        return Err(CliError::Diagnostics {
            count: summary.diagnostics,
            documents: summary.documents_with_diagnostics,
        });
    }
    ui::success(&format!("Checked {} document(s)", summary.documents));
    Ok(())
}
