//! Per-conversion render state

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Trail;

/// Category of a non-fatal rendering problem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Code fence language has no match; rendered as Plain Text
    UnsupportedLanguage,
    /// Heading deeper than the target supports; clamped
    HeadingDepth,
    /// Table cell held non-text content which was dropped
    TableCellContent,
    /// Image nested in a link was moved out as a sibling
    ImageInLink,
}

/// A non-fatal problem found while rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Ancestor path of the node that triggered it
    pub trail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.trail)
    }
}

/// State threaded through one document conversion.
///
/// A fresh context is created for every top-level conversion, so nothing
/// carries over between documents rendered by the same renderer.
#[derive(Debug, Default)]
pub struct RenderContext {
    diagnostics: Vec<Diagnostic>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it; rendering continues
    pub fn warn(&mut self, kind: DiagnosticKind, trail: &Trail<'_>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            trail: trail.to_string(),
        };
        tracing::warn!(trail = %diagnostic.trail, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
