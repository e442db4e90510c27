//! Tree-to-tree rendering engine
//!
//! Walks an [`ast::Node`](crate::ast::Node) tree and produces block
//! descriptors. Handlers are looked up per node kind in a [`HandlerSet`];
//! the ancestor [`Trail`] is passed down by reference and diagnostics are
//! collected in a per-conversion [`RenderContext`].

mod context;
mod rendered;
mod renderer;
mod trail;

pub use context::{Diagnostic, DiagnosticKind, RenderContext};
pub use rendered::{Piece, Rendered, combine, combine_inline, flatten, pieces_to_blocks, split_text};
pub use renderer::{Handler, HandlerSet, Output, Renderer, RendererBuilder};
pub use trail::Trail;
