//! Table node conversions
//!
//! Rows are not blocks in the target model. A table becomes one descriptor
//! carrying a synthesized schema (from the header row) and the body rows as
//! arrays of cell strings.

use super::mismatch;
use crate::ast::{Node, NodeKind};
use crate::block::{Block, table_schema};
use crate::error::RenderError;
use crate::render::{DiagnosticKind, RenderContext, Renderer, Rendered, Trail};

/// Convert table node
pub fn table_to_block(
    renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::Table(table) = node else {
        return Err(mismatch(NodeKind::Table, node, trail));
    };

    let header_trail = trail.child(table.header.kind(), 0);
    let header = row_to_cells(renderer, &table.header, &header_trail, ctx)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (index, row) in table.rows.iter().enumerate() {
        let row_trail = trail.child(row.kind(), index + 1);
        let mut cells = row_to_cells(renderer, row, &row_trail, ctx)?;
        if cells.len() < header.len() {
            cells.resize(header.len(), String::new());
        }
        rows.push(cells);
    }

    tracing::debug!(columns = header.len(), rows = rows.len(), "Converted table");

    Ok(Rendered::block(Block::Table {
        schema: table_schema(&header),
        rows,
    }))
}

/// Render one row to its cell strings, keeping the row's own grouping
fn row_to_cells(
    renderer: &Renderer,
    row: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<Vec<String>, RenderError> {
    let Node::TableRow(row) = row else {
        return Err(mismatch(NodeKind::TableRow, row, trail));
    };

    let mut cells = Vec::with_capacity(row.children.len());
    for (index, cell) in row.children.iter().enumerate() {
        let cell_trail = trail.child(cell.kind(), index);
        cells.push(cell_to_text(renderer, cell, &cell_trail, ctx)?);
    }
    Ok(cells)
}

/// Render a cell to plain text; content that is not text is dropped
fn cell_to_text(
    renderer: &Renderer,
    cell: &Node,
    trail: &Trail<'_>,
    ctx: &mut RenderContext,
) -> Result<String, RenderError> {
    let Node::TableCell(cell) = cell else {
        return Err(mismatch(NodeKind::TableCell, cell, trail));
    };

    let (text, blocks) = renderer.render_inline(&cell.children, trail, ctx)?;
    if !blocks.is_empty() {
        let kinds: Vec<_> = blocks.iter().map(|b| b.kind().as_str()).collect();
        ctx.warn(
            DiagnosticKind::TableCellContent,
            trail,
            format!(
                "table cell contained non-text content ({}) which was dropped",
                kinds.join(", ")
            ),
        );
    }
    Ok(text)
}
