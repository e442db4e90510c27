//! Node handlers for the base Markdown syntax
//!
//! Each handler renders one node kind to inline markup or block descriptors.
//! [`base_handlers`] registers all of them; extensions add the rest.

mod block;
mod code;
mod inline;
mod list;
mod table;

pub use block::*;
pub use code::*;
pub use inline::*;
pub use list::*;
pub use table::*;

use crate::ast::{Node, NodeKind};
use crate::error::RenderError;
use crate::render::{HandlerSet, Trail};

/// Handlers for every kind in the base syntax.
///
/// Table rows and cells are rendered by the table handler and have no entry
/// of their own. Raw HTML and equations need an extension.
pub fn base_handlers() -> HandlerSet {
    HandlerSet::new()
        // Block elements
        .with(NodeKind::Document, document_to_blocks)
        .with(NodeKind::Paragraph, paragraph_to_blocks)
        .with(NodeKind::Heading, heading_to_blocks)
        .with(NodeKind::Quote, quote_to_blocks)
        .with(NodeKind::ThematicBreak, thematic_break_to_blocks)
        .with(NodeKind::CodeFence, code_fence_to_block)
        // Lists
        .with(NodeKind::List, list_to_blocks)
        .with(NodeKind::ListItem, list_item_to_block)
        // Tables
        .with(NodeKind::Table, table_to_block)
        // Inline elements
        .with(NodeKind::Strong, strong_to_inline)
        .with(NodeKind::Emphasis, emphasis_to_inline)
        .with(NodeKind::InlineCode, inline_code_to_inline)
        .with(NodeKind::Strikethrough, strikethrough_to_inline)
        .with(NodeKind::Escape, escape_to_inline)
        .with(NodeKind::Link, link_to_inline)
        .with(NodeKind::Image, image_to_block)
        .with(NodeKind::LineBreak, line_break_to_inline)
        .with(NodeKind::RawText, raw_text_to_inline)
}

/// Error for a handler invoked on a node of another kind
pub(crate) fn mismatch(expected: NodeKind, node: &Node, trail: &Trail<'_>) -> RenderError {
    RenderError::HandlerMismatch {
        expected,
        found: node.kind(),
        trail: trail.to_string(),
    }
}
