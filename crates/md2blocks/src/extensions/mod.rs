//! Renderer extensions
//!
//! An extension switches on the parser constructs that produce a node kind
//! and registers the handlers that render it. Extensions are merged into a
//! [`Renderer`](crate::Renderer) by [`RendererBuilder`](crate::RendererBuilder)
//! in the order they are added.

mod html;
mod latex;

pub use html::HtmlImages;
pub use latex::Latex;

use markdown::Constructs;

use crate::render::HandlerSet;

/// Adds node kinds to a renderer
///
/// Implement this trait to render syntax the base renderer does not know
/// about, or to replace a base handler. Handlers returned by a later
/// extension override those of earlier ones for the same kind.
///
/// # Thread Safety
///
/// Extensions must be `Send + Sync` so a built renderer can be shared across
/// threads. Handlers are plain functions and carry no state.
pub trait Extension: Send + Sync {
    /// Extension name for debugging and logging
    ///
    /// Use a short, lowercase identifier like "html-images" or "latex".
    fn name(&self) -> &'static str;

    /// Enable the parser constructs this extension renders
    ///
    /// # Default Implementation
    ///
    /// Leaves the constructs untouched.
    fn configure_parser(&self, constructs: &mut Constructs) {
        let _ = constructs;
    }

    /// Handlers to merge into the renderer
    fn handlers(&self) -> HandlerSet;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Node, NodeKind};
    use crate::block::Block;
    use crate::error::RenderError;
    use crate::render::{RenderContext, Renderer, Rendered, Trail};

    fn divider_for_quote(
        _renderer: &Renderer,
        _node: &Node,
        _trail: &Trail<'_>,
        _ctx: &mut RenderContext,
    ) -> Result<Rendered, RenderError> {
        Ok(Rendered::block(Block::Divider))
    }

    struct QuotesAsDividers;

    impl Extension for QuotesAsDividers {
        fn name(&self) -> &'static str {
            "quotes-as-dividers"
        }

        fn handlers(&self) -> HandlerSet {
            HandlerSet::new().with(NodeKind::Quote, divider_for_quote)
        }
    }

    #[test]
    fn later_extension_overrides_base_handler() {
        let renderer = Renderer::builder().extension(QuotesAsDividers).build();
        let doc = Node::document(vec![Node::quote(vec![Node::paragraph(vec![
            Node::text("q"),
        ])])]);
        let output = renderer.render_document(&doc).unwrap();
        assert_eq!(output.blocks, vec![Block::Divider]);
        assert_eq!(renderer.extensions(), &["quotes-as-dividers"]);
    }

    #[test]
    fn default_configure_parser_is_a_no_op() {
        let mut constructs = crate::parse::base_constructs();
        QuotesAsDividers.configure_parser(&mut constructs);
        assert!(!constructs.html_flow);
        assert!(!constructs.math_flow);
    }
}
