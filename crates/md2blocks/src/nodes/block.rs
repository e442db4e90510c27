//! Block-level node handlers (document, headings, paragraphs, quotes, dividers)

use super::mismatch;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::render::{
    DiagnosticKind, RenderContext, Renderer, Rendered, Trail, combine, pieces_to_blocks,
};

/// Deepest heading level the block model can express
pub const MAX_HEADING_LEVEL: u8 = 3;

/// Render the document root: every child in order
pub fn document_to_blocks(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Document(doc) = node else {
        return Err(mismatch(NodeKind::Document, node, trail));
    };
    let pieces = renderer.render_children(&doc.children, trail, ctx)?;
    Ok(Rendered::Blocks(pieces_to_blocks(pieces)))
}

/// Convert heading node, clamping levels the target cannot show
pub fn heading_to_blocks(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Heading(heading) = node else {
        return Err(mismatch(NodeKind::Heading, node, trail));
    };

    let level = if heading.level > MAX_HEADING_LEVEL {
        ctx.warn(
            DiagnosticKind::HeadingDepth,
            trail,
            format!(
                "h{} not supported, converting to h{}",
                heading.level, MAX_HEADING_LEVEL
            ),
        );
        MAX_HEADING_LEVEL
    } else {
        heading.level
    };

    let (text, blocks) = renderer.render_inline(&heading.children, trail, ctx)?;
    Ok(combine(text, blocks, |title| match level {
        0 | 1 => Block::Header { title },
        2 => Block::SubHeader { title },
        _ => Block::SubSubHeader { title },
    }))
}

/// Convert paragraph node
pub fn paragraph_to_blocks(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Paragraph(para) = node else {
        return Err(mismatch(NodeKind::Paragraph, node, trail));
    };
    let (text, blocks) = renderer.render_inline(&para.children, trail, ctx)?;
    Ok(combine(text, blocks, Block::text))
}

/// Convert block quote; nested paragraphs fold into the quote's text and any
/// other blocks follow it
pub fn quote_to_blocks(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Quote(quote) = node else {
        return Err(mismatch(NodeKind::Quote, node, trail));
    };
    let (text, blocks) = renderer.render_text(&quote.children, trail, ctx)?;
    Ok(combine(text, blocks, |title| Block::Quote { title }))
}

pub fn thematic_break_to_blocks(
    _renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    _ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    if !matches!(node, Node::ThematicBreak) {
        return Err(mismatch(NodeKind::ThematicBreak, node, trail));
    }
    Ok(Rendered::block(Block::Divider))
}
