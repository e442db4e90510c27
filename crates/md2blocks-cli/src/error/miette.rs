//! Conversion of CLI errors into miette reports.

use crate::error::CliError;
use miette::Report;

/// Convert a `CliError` into a miette `Report`
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Convert { path, source } => {
            let headline = format!("Failed to convert {}", path.display());
            match source.suggestion.clone() {
                Some(help) => miette::miette!(help = help, "{}: {}", headline, source.message),
                None => miette::miette!("{}: {}", headline, source),
            }
        }
        CliError::Diagnostics { .. } => miette::miette!(
            help = "Run `md2blocks check` without --fail-on-diagnostics to only report them",
            "{}",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2blocks::ConvertError;
    use std::path::PathBuf;

    #[test]
    fn convert_suggestion_becomes_help() {
        let err = CliError::Convert {
            path: PathBuf::from("a.md"),
            source: Box::new(ConvertError::new("bad").with_suggestion("fix it")),
        };
        let report = cli_error_to_miette(err);
        assert_eq!(report.to_string(), "Failed to convert a.md: bad");
        assert_eq!(report.help().map(|h| h.to_string()).as_deref(), Some("fix it"));
    }

    #[test]
    fn other_errors_keep_message() {
        let report = cli_error_to_miette(CliError::FileNotFound(PathBuf::from("a.md")));
        assert_eq!(report.to_string(), "File not found: a.md");
    }
}
