//! Error types for parsing and rendering
//!
//! [`RenderError`] is the fatal outcome of a tree walk. [`ConvertError`] wraps
//! every failure of a whole-document conversion with file context and a hint.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::NodeKind;

/// Fatal rendering failures
///
/// The `trail` of each variant is the ancestor path of the offending node,
/// formatted as `document[0] > list[1] > list_item[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No handler is registered for this node kind
    #[error("no renderer registered for `{kind}` nodes (at {trail})")]
    UnsupportedNodeKind { kind: NodeKind, trail: String },

    /// Block-level content appeared where only inline text can be rendered
    #[error("`{kind}` content cannot be rendered inline (at {trail})")]
    UnrenderableInlineContent { kind: NodeKind, trail: String },

    /// A handler was registered under a kind it cannot render
    #[error("handler for `{expected}` received a `{found}` node (at {trail})")]
    HandlerMismatch {
        expected: NodeKind,
        found: NodeKind,
        trail: String,
    },
}

impl RenderError {
    pub fn trail(&self) -> &str {
        match self {
            RenderError::UnsupportedNodeKind { trail, .. }
            | RenderError::UnrenderableInlineContent { trail, .. }
            | RenderError::HandlerMismatch { trail, .. } => trail,
        }
    }
}

/// Conversion error with file context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertError {
    /// The error message
    pub message: String,
    /// Optional file path of the document being converted
    pub file: Option<String>,
    /// Ancestor path of the node that failed, if rendering failed
    pub trail: Option<String>,
    /// Helpful suggestion to fix the error
    pub suggestion: Option<String>,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            trail: None,
            suggestion: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_trail(mut self, trail: impl Into<String>) -> Self {
        self.trail = Some(trail.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Markdown could not be parsed
    pub fn parse_error(message: impl fmt::Display) -> Self {
        Self::new(format!("Failed to parse Markdown: {}", message))
            .with_suggestion("Check that the document is valid UTF-8 Markdown.")
    }

    /// The parser produced a construct with no counterpart in the block model
    pub fn unsupported_syntax(kind: &str) -> Self {
        Self::new(format!("Unsupported Markdown construct: {}", kind)).with_suggestion(
            "Disable the parser construct that produces it, or add an extension that renders it.",
        )
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref file) = self.file {
            write!(f, "\n  in {}", file)?;
        }

        if let Some(ref trail) = self.trail {
            write!(f, "\n  at {}", trail)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ConvertError {}

impl From<RenderError> for ConvertError {
    fn from(err: RenderError) -> Self {
        let suggestion = match &err {
            RenderError::UnsupportedNodeKind { .. } => {
                "Register the extension that renders this node kind."
            }
            RenderError::UnrenderableInlineContent { .. } => {
                "Block content cannot be nested inside inline formatting."
            }
            RenderError::HandlerMismatch { .. } => {
                "This is an internal error in a handler registration."
            }
        };
        let trail = err.trail().to_string();
        Self::new(format!("Failed to render document: {}", err))
            .with_trail(trail)
            .with_suggestion(suggestion)
    }
}
