//! Inline node handlers (emphasis, strong, code spans, links, images, etc.)
//!
//! Inline content renders to the target's Markdown-like span markup. Images
//! have no inline form, so any wrapper that contains one hoists it after the
//! wrapped text.

use super::mismatch;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::render::{DiagnosticKind, RenderContext, Renderer, Rendered, Trail, combine_inline};

/// Literal text, returned verbatim
pub fn raw_text_to_inline(
    _renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    _ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::RawText(content) = node else {
        return Err(mismatch(NodeKind::RawText, node, trail));
    };
    Ok(Rendered::Inline(content.clone()))
}

pub fn line_break_to_inline(
    _renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    _ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    if !matches!(node, Node::LineBreak) {
        return Err(mismatch(NodeKind::LineBreak, node, trail));
    }
    Ok(Rendered::Inline("\n".to_string()))
}

/// Wrap the children of a span node with `open`/`close` markup
fn wrap_span(
    renderer: &Renderer,
    children: &[Node],
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
    open: &str,
    close: &str,
) -> Result<Rendered, RenderError> {
    let (text, blocks) = renderer.render_inline(children, trail, ctx)?;
    Ok(combine_inline(text, blocks, |text| {
        format!("{open}{text}{close}")
    }))
}

pub fn strong_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Strong(strong) = node else {
        return Err(mismatch(NodeKind::Strong, node, trail));
    };
    wrap_span(renderer, &strong.children, trail, ctx, "**", "**")
}

pub fn emphasis_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Emphasis(emph) = node else {
        return Err(mismatch(NodeKind::Emphasis, node, trail));
    };
    wrap_span(renderer, &emph.children, trail, ctx, "*", "*")
}

pub fn inline_code_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::InlineCode(code) = node else {
        return Err(mismatch(NodeKind::InlineCode, node, trail));
    };
    wrap_span(renderer, &code.children, trail, ctx, "`", "`")
}

pub fn strikethrough_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Strikethrough(del) = node else {
        return Err(mismatch(NodeKind::Strikethrough, node, trail));
    };
    wrap_span(renderer, &del.children, trail, ctx, "~", "~")
}

/// Backslash escape; the escaped character stays escaped for the target
pub fn escape_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Escape(escape) = node else {
        return Err(mismatch(NodeKind::Escape, node, trail));
    };
    wrap_span(renderer, &escape.children, trail, ctx, "\\", "")
}

/// Convert link node.
///
/// The `[text](target)` markup is always emitted. Images in the link text
/// cannot be linked, so they follow the link as separate blocks.
pub fn link_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Link(link) = node else {
        return Err(mismatch(NodeKind::Link, node, trail));
    };

    let (text, blocks) = renderer.render_inline(&link.children, trail, ctx)?;
    let markup = format!("[{}]({})", text, link.target);
    if blocks.is_empty() {
        return Ok(Rendered::Inline(markup));
    }

    ctx.warn(
        DiagnosticKind::ImageInLink,
        trail,
        format!(
            "{} image(s) inside link to {} moved out as separate blocks",
            blocks.len(),
            link.target
        ),
    );
    let mut out = Vec::with_capacity(blocks.len() + 1);
    out.push(Block::fragment(markup));
    out.extend(blocks);
    Ok(Rendered::Blocks(out))
}

/// Convert image node; caption is the title, else the alt text
pub fn image_to_block(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Image(image) = node else {
        return Err(mismatch(NodeKind::Image, node, trail));
    };

    let caption = match image.title.as_deref() {
        Some(title) if !title.is_empty() => Some(title.to_string()),
        _ => {
            let (alt, _) = renderer.render_inline(&image.children, trail, ctx)?;
            (!alt.is_empty()).then_some(alt)
        }
    };

    Ok(Rendered::block(Block::image(image.src.clone(), caption)))
}
