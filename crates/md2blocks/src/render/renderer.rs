//! Dispatch core: node kind to handler

use markdown::{Constructs, ParseOptions};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::context::{Diagnostic, RenderContext};
use super::rendered::{Piece, Rendered, flatten, split_text};
use super::trail::Trail;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::{ConvertError, RenderError};
use crate::extensions::Extension;

/// Renders one node of the kind it is registered under
pub type Handler =
    fn(&Renderer, &Node, &Trail<'_>, &mut RenderContext) -> Result<Rendered, RenderError>;

/// Mapping from node kind to handler
#[derive(Clone, Default)]
pub struct HandlerSet {
    handlers: FxHashMap<NodeKind, Handler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: NodeKind, handler: Handler) -> Self {
        self.insert(kind, handler);
        self
    }

    /// Register a handler, returning the one it replaced
    pub fn insert(&mut self, kind: NodeKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    pub fn get(&self, kind: NodeKind) -> Option<Handler> {
        self.handlers.get(&kind).copied()
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Merge `other` into this set; entries in `other` win.
    ///
    /// Returns the kinds whose handler was replaced.
    pub fn merge(&mut self, other: HandlerSet) -> Vec<NodeKind> {
        let mut replaced = Vec::new();
        for (kind, handler) in other.handlers {
            if self.handlers.insert(kind, handler).is_some() {
                replaced.push(kind);
            }
        }
        replaced.sort_unstable();
        replaced
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

/// Blocks and diagnostics of one converted document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Markdown to block descriptor renderer.
///
/// Holds no per-document state: one renderer can convert any number of
/// documents, concurrently or in sequence.
#[derive(Debug, Clone)]
pub struct Renderer {
    handlers: HandlerSet,
    constructs: Constructs,
    extensions: Vec<&'static str>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Renderer with the base handlers only (no raw HTML, no equations)
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Renderer with the HTML image and LaTeX extensions
    pub fn with_default_extensions() -> Self {
        Self::builder()
            .extension(crate::extensions::HtmlImages)
            .extension(crate::extensions::Latex)
            .build()
    }

    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// Names of merged extensions, in registration order
    pub fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    pub fn handles(&self, kind: NodeKind) -> bool {
        self.handlers.contains(kind)
    }

    /// Parser options with every construct the registered extensions need
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            constructs: self.constructs.clone(),
            ..ParseOptions::gfm()
        }
    }

    /// Parse and render a Markdown document
    pub fn convert(&self, source: &str) -> Result<Output, ConvertError> {
        let root = crate::parse::parse(source, &self.parse_options())?;
        Ok(self.render_document(&root)?)
    }

    /// Render a whole tree with a fresh context
    pub fn render_document(&self, root: &Node) -> Result<Output, RenderError> {
        let mut ctx = RenderContext::new();
        let trail = Trail::root(root.kind());
        let blocks = self.render(root, &trail, &mut ctx)?.into_blocks();
        tracing::debug!(
            blocks = blocks.len(),
            diagnostics = ctx.diagnostics().len(),
            "Rendered document"
        );
        Ok(Output {
            blocks,
            diagnostics: ctx.into_diagnostics(),
        })
    }

    /// Render one node with the handler registered for its kind
    pub fn render(
        &self,
        node: &Node,
        trail: &Trail<'_>,
        ctx: &mut RenderContext,
    ) -> Result<Rendered, RenderError> {
        let kind = node.kind();
        let handler = self
            .handlers
            .get(kind)
            .ok_or_else(|| RenderError::UnsupportedNodeKind {
                kind,
                trail: trail.to_string(),
            })?;
        handler(self, node, trail, ctx)
    }

    /// Render siblings independently and flatten the results in order
    pub fn render_children(
        &self,
        children: &[Node],
        parent: &Trail<'_>,
        ctx: &mut RenderContext,
    ) -> Result<Vec<Piece>, RenderError> {
        let mut results = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            let trail = parent.child(child.kind(), index);
            results.push(self.render(child, &trail, ctx)?);
        }
        Ok(flatten(results))
    }

    /// Render children to text plus the blocks that could not become text
    pub fn render_text(
        &self,
        children: &[Node],
        parent: &Trail<'_>,
        ctx: &mut RenderContext,
    ) -> Result<(String, Vec<Block>), RenderError> {
        Ok(split_text(self.render_children(children, parent, ctx)?))
    }

    /// Like [`Renderer::render_text`], for inline contexts.
    ///
    /// Block-level children have no inline rendering and fail the conversion.
    pub fn render_inline(
        &self,
        children: &[Node],
        parent: &Trail<'_>,
        ctx: &mut RenderContext,
    ) -> Result<(String, Vec<Block>), RenderError> {
        if let Some((index, child)) = children
            .iter()
            .enumerate()
            .find(|(_, child)| child.kind().is_block())
        {
            return Err(RenderError::UnrenderableInlineContent {
                kind: child.kind(),
                trail: parent.child(child.kind(), index).to_string(),
            });
        }
        self.render_text(children, parent, ctx)
    }
}

/// Builds a [`Renderer`] from the base handlers plus extensions
pub struct RendererBuilder {
    handlers: HandlerSet,
    constructs: Constructs,
    extensions: Vec<Box<dyn Extension>>,
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self {
            handlers: crate::nodes::base_handlers(),
            constructs: crate::parse::base_constructs(),
            extensions: Vec::new(),
        }
    }

    /// Add an extension; extensions are merged in the order they are added
    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn boxed_extension(mut self, extension: Box<dyn Extension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Register or replace a single handler after all extensions
    pub fn handler(mut self, kind: NodeKind, handler: Handler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn build(self) -> Renderer {
        let RendererBuilder {
            mut handlers,
            mut constructs,
            extensions,
        } = self;

        let mut names = Vec::with_capacity(extensions.len());
        for extension in &extensions {
            extension.configure_parser(&mut constructs);
            let replaced = handlers.merge(extension.handlers());
            tracing::debug!(
                extension = extension.name(),
                replaced = ?replaced,
                "Registered renderer extension"
            );
            names.push(extension.name());
        }

        Renderer {
            handlers,
            constructs,
            extensions: names,
        }
    }
}
