//! Render results and the rules that merge them
//!
//! Handlers return a [`Rendered`] value: inline markup or a run of block
//! descriptors. Sibling results are flattened into [`Piece`]s and then
//! reconciled: text is concatenated, blocks that cannot live inside text are
//! hoisted after it in their original order.

use crate::block::Block;

/// Result of rendering one node
#[derive(Clone, Debug, PartialEq)]
pub enum Rendered {
    /// Inline markup, e.g. `**bold**`
    Inline(String),
    /// Zero or more block descriptors
    Blocks(Vec<Block>),
}

/// One item of a flattened sibling run
#[derive(Clone, Debug, PartialEq)]
pub enum Piece {
    Text(String),
    Block(Block),
}

impl Rendered {
    pub fn block(block: Block) -> Self {
        Rendered::Blocks(vec![block])
    }

    pub fn empty() -> Self {
        Rendered::Blocks(Vec::new())
    }

    pub fn into_pieces(self) -> Vec<Piece> {
        match self {
            Rendered::Inline(text) => vec![Piece::Text(text)],
            Rendered::Blocks(blocks) => blocks.into_iter().map(Piece::Block).collect(),
        }
    }

    /// Block descriptors only: stray text becomes a text block and raw
    /// fragments are promoted to text blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        pieces_to_blocks(self.into_pieces())
    }
}

/// Flatten sibling results into one ordered run
pub fn flatten(results: impl IntoIterator<Item = Rendered>) -> Vec<Piece> {
    results.into_iter().flat_map(Rendered::into_pieces).collect()
}

/// Concatenate the text of a run and collect the blocks that are not text.
///
/// Text-like descriptors (paragraph text, raw fragments) unwrap into the
/// string; every other block is returned in order of appearance.
pub fn split_text(pieces: Vec<Piece>) -> (String, Vec<Block>) {
    let mut text = String::new();
    let mut blocks = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Text(s) => text.push_str(&s),
            Piece::Block(block) if block.is_text_like() => {
                text.push_str(block.title().unwrap_or_default())
            }
            Piece::Block(block) => blocks.push(block),
        }
    }

    (text, blocks)
}

/// Block-level reconciliation: the wrapped text (when non-empty) followed by
/// the hoisted blocks
pub fn combine(text: String, blocks: Vec<Block>, wrap: impl FnOnce(String) -> Block) -> Rendered {
    let mut out = Vec::with_capacity(blocks.len() + 1);
    if !text.is_empty() {
        out.push(wrap(text));
    }
    out.extend(blocks);
    Rendered::Blocks(out)
}

/// Inline reconciliation.
///
/// With nothing hoisted the result stays inline. Otherwise the wrapped text
/// becomes a fragment descriptor ahead of the hoisted blocks.
pub fn combine_inline(
    text: String,
    blocks: Vec<Block>,
    wrap: impl FnOnce(String) -> String,
) -> Rendered {
    if blocks.is_empty() {
        if text.is_empty() {
            return Rendered::empty();
        }
        return Rendered::Inline(wrap(text));
    }
    combine(text, blocks, |text| Block::fragment(wrap(text)))
}

/// Turn a run into block descriptors for the public boundary
pub fn pieces_to_blocks(pieces: Vec<Piece>) -> Vec<Block> {
    pieces
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Text(text) if text.is_empty() => None,
            Piece::Text(text) => Some(Block::text(text)),
            Piece::Block(Block::Fragment { title }) => Some(Block::text(title)),
            Piece::Block(block) => Some(block),
        })
        .collect()
}
