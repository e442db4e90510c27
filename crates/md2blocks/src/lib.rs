//! # md2blocks
//!
//! Markdown to block descriptor renderer.
//!
//! Parses a Markdown document and renders it into an ordered tree of typed
//! block descriptors (headers, text, lists, code, images, tables, equations)
//! ready to be created one by one in a block-based document store. Inline
//! formatting is kept as the store's Markdown-like span markup; constructs
//! the store cannot nest inline (images) are hoisted into sibling blocks.
//!
//! ```
//! use md2blocks::{Block, ConvertOptions, convert};
//!
//! let output = convert("# Hello\n\nSome **bold** text.", ConvertOptions::default()).unwrap();
//! assert_eq!(output.blocks[0], Block::Header { title: "Hello".into() });
//! assert_eq!(output.blocks[1], Block::text("Some **bold** text."));
//! ```

pub mod ast;
pub mod block;
pub mod error;
pub mod extensions;
pub mod nodes;
pub mod parse;
pub mod render;
pub mod upload;

// Re-export public types
pub use ast::{Node, NodeKind};
pub use block::{Block, BlockKind, Column, ColumnType, Schema, TITLE_COLUMN, table_schema};
pub use error::{ConvertError, RenderError};
pub use extensions::{Extension, HtmlImages, Latex};
pub use render::{
    Diagnostic, DiagnosticKind, Handler, HandlerSet, Output, RenderContext, Renderer,
    RendererBuilder, Rendered, Trail,
};
pub use upload::{BlockSink, ImageSource, UploadError, UploadFailure, UploadReport, Uploader};

use bon::Builder;

/// Options for a one-off conversion
#[derive(Builder)]
pub struct ConvertOptions {
    /// Optional filepath for error messages
    #[builder(into)]
    pub filepath: Option<String>,

    /// Render raw HTML, extracting `<img>` tags as images.
    /// Enabled by default. Set to `false` to keep HTML as plain text.
    #[builder(default = true)]
    pub html: bool,

    /// Render `$...$` and `$$...$$` equations.
    /// Enabled by default. Set to `false` to keep dollars as plain text.
    #[builder(default = true)]
    pub latex: bool,

    /// Additional extensions, merged after the built-in ones
    #[builder(default)]
    pub extensions: Vec<Box<dyn Extension>>,
}

impl std::fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("filepath", &self.filepath)
            .field("html", &self.html)
            .field("latex", &self.latex)
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: Box<dyn Extension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Build the renderer these options describe.
    ///
    /// The renderer is reusable; build it once when converting many
    /// documents with the same options.
    pub fn renderer(self) -> Renderer {
        let mut builder = Renderer::builder();
        if self.html {
            builder = builder.extension(HtmlImages);
        }
        if self.latex {
            builder = builder.extension(Latex);
        }
        for extension in self.extensions {
            builder = builder.boxed_extension(extension);
        }
        builder.build()
    }
}

/// Convert a Markdown string to block descriptors
pub fn convert(source: &str, options: ConvertOptions) -> Result<Output, Box<ConvertError>> {
    let filepath = options.filepath.clone();
    let renderer = options.renderer();

    renderer.convert(source).map_err(|err| {
        let err = match filepath {
            Some(file) => err.with_file(file),
            None => err,
        };
        Box::new(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_enable_both_extensions() {
        let options = ConvertOptions::builder().build();
        assert!(options.html);
        assert!(options.latex);
        assert_eq!(options.renderer().extensions(), &["html-images", "latex"]);
    }

    #[test]
    fn extensions_can_be_disabled() {
        let renderer = ConvertOptions::builder()
            .html(false)
            .latex(false)
            .build()
            .renderer();
        assert!(renderer.extensions().is_empty());
        assert!(!renderer.handles(NodeKind::HtmlBlock));
    }

    #[test]
    fn html_disabled_keeps_tags_as_text() {
        let output = convert(
            "<img src=\"a.png\">\n",
            ConvertOptions::builder().html(false).build(),
        )
        .unwrap();
        assert_eq!(output.blocks, vec![Block::text("<img src=\"a.png\">")]);
    }

    #[test]
    fn latex_disabled_keeps_dollars() {
        let output = convert("cost $5$\n", ConvertOptions::builder().latex(false).build()).unwrap();
        assert_eq!(output.blocks, vec![Block::text("cost $5$")]);
    }

    #[test]
    fn errors_carry_filepath() {
        let source = "a".repeat(parse::MAX_SOURCE_SIZE + 1);
        let err = convert(&source, ConvertOptions::builder().filepath("big.md").build()).unwrap_err();
        assert_eq!(err.file.as_deref(), Some("big.md"));
    }

    #[test]
    fn debug_lists_extension_names() {
        let options = ConvertOptions::new().with_extension(Box::new(Latex));
        let debug = format!("{:?}", options);
        assert!(debug.contains("\"latex\""));
    }
}
