//! LaTeX equations
//!
//! `$...$` is an inline equation, rendered as `$$...$$` markup. A `$$` fenced
//! block is an equation descriptor; its backslashes are doubled because the
//! target reads the text as an escaped string.

use markdown::Constructs;

use super::Extension;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::nodes::mismatch;
use crate::render::{HandlerSet, RenderContext, Renderer, Rendered, Trail, combine, combine_inline};

/// Renders inline and block equations
#[derive(Debug, Clone, Copy, Default)]
pub struct Latex;

impl Extension for Latex {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn configure_parser(&self, constructs: &mut Constructs) {
        constructs.math_flow = true;
        constructs.math_text = true;
    }

    fn handlers(&self) -> HandlerSet {
        HandlerSet::new()
            .with(NodeKind::InlineEquation, inline_equation_to_inline)
            .with(NodeKind::BlockEquation, block_equation_to_block)
    }
}

fn inline_equation_to_inline(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::InlineEquation(eq) = node else {
        return Err(mismatch(NodeKind::InlineEquation, node, trail));
    };
    let (text, blocks) = renderer.render_inline(&eq.children, trail, ctx)?;
    Ok(combine_inline(text, blocks, |latex| format!("$${latex}$$")))
}

fn block_equation_to_block(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::BlockEquation(eq) = node else {
        return Err(mismatch(NodeKind::BlockEquation, node, trail));
    };
    let (text, blocks) = renderer.render_inline(&eq.children, trail, ctx)?;
    Ok(combine(text, blocks, |latex| Block::Equation {
        latex: latex.replace('\\', "\\\\"),
    }))
}
