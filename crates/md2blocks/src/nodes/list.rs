//! List node conversions (numbered, bulleted, to-do)

use super::mismatch;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::render::{RenderContext, Renderer, Rendered, Trail, pieces_to_blocks, split_text};

/// A list has no block of its own: its items are emitted in order
pub fn list_to_blocks(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::List(list) = node else {
        return Err(mismatch(NodeKind::List, node, trail));
    };
    let pieces = renderer.render_children(&list.children, trail, ctx)?;
    Ok(Rendered::Blocks(pieces_to_blocks(pieces)))
}

/// Convert list item node.
///
/// The item's paragraphs form its title; every other block (sub-lists,
/// images, quotes) becomes a child. The kind is chosen per item: a numeric
/// leader gives a numbered item, a leading `[ ]`/`[x]` gives a to-do item,
/// anything else a bulleted one.
pub fn list_item_to_block(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::ListItem(item) = node else {
        return Err(mismatch(NodeKind::ListItem, node, trail));
    };

    let pieces = renderer.render_children(&item.children, trail, ctx)?;
    let (title, children) = split_text(pieces);

    let block = if is_numbered(&item.leader) {
        Block::NumberedListItem { title, children }
    } else if let Some((checked, rest)) = parse_checkbox(&title) {
        Block::TodoListItem {
            title: rest.to_string(),
            checked,
            children,
        }
    } else {
        Block::BulletedListItem { title, children }
    };

    Ok(Rendered::block(block))
}

fn is_numbered(leader: &str) -> bool {
    leader.starts_with(|c: char| c.is_ascii_digit())
}

/// Split a `[x] ` / `[ ] ` checkbox token off the start of `text`.
///
/// Returns whether it was checked and the text after the token.
fn parse_checkbox(text: &str) -> Option<(bool, &str)> {
    let rest = text.strip_prefix('[')?;
    let mut chars = rest.chars();
    let checked = match chars.next()? {
        'x' | 'X' => true,
        ' ' => false,
        _ => return None,
    };
    let rest = chars.as_str().strip_prefix(']')?;
    rest.strip_prefix(|c: char| c == ' ' || c == '\t')
        .map(|rest| (checked, rest))
}
