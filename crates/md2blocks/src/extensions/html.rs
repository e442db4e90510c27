//! Raw HTML passthrough with image extraction
//!
//! Raw HTML is kept as literal text except for `<img>` tags, which become
//! image descriptors following the text they were cut from. Comments,
//! declarations and processing instructions are dropped.
//!
//! # Example
//!
//! ```markdown
//! <p>Logo: <img src="logo.png" alt="Our logo"></p>
//! ```
//!
//! renders as the text `<p>Logo: </p>` followed by an image of `logo.png`
//! captioned "Our logo".

use std::sync::LazyLock;

use markdown::Constructs;
use regex::Regex;

use super::Extension;
use crate::ast::{Node, NodeKind};
use crate::block::Block;
use crate::error::RenderError;
use crate::nodes::mismatch;
use crate::render::{HandlerSet, RenderContext, Renderer, Rendered, Trail, combine_inline};

/// `<img>` tags (quoted attribute values may hold `>`), plus the markup
/// that produces no output: comments, `<!...>` declarations, `<?...?>`
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)(?P<skip><!--.*?-->|<![^>]*>|<\?.*?\?>)|<(?P<close>/)?img\b(?P<attrs>(?:"[^"]*"|'[^']*'|[^'">])*)>"#,
    )
    .expect("tag pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(?P<name>src|alt)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"'>]+))"#)
        .expect("attribute pattern is valid")
});

/// Renders raw HTML blocks and spans, extracting `<img>` tags as images
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlImages;

impl Extension for HtmlImages {
    fn name(&self) -> &'static str {
        "html-images"
    }

    fn configure_parser(&self, constructs: &mut Constructs) {
        constructs.html_flow = true;
        constructs.html_text = true;
    }

    fn handlers(&self) -> HandlerSet {
        HandlerSet::new()
            .with(NodeKind::HtmlBlock, html_block_to_blocks)
            .with(NodeKind::HtmlSpan, html_span_to_inline)
    }
}

/// Block-level HTML: a text descriptor unless only whitespace remains, then
/// the images
fn html_block_to_blocks(
    _renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    _ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::HtmlBlock(html) = node else {
        return Err(mismatch(NodeKind::HtmlBlock, node, trail));
    };

    let (text, images) = extract_images(&html.content);
    let mut blocks = Vec::with_capacity(images.len() + 1);
    if !text.trim().is_empty() {
        blocks.push(Block::text(text));
    }
    blocks.extend(images);
    Ok(Rendered::Blocks(blocks))
}

fn html_span_to_inline(
    _renderer: &Renderer,
    node: &Node,
    trail: &Trail<'_>,
    _ctx: &mut RenderContext,
) -> Result<Rendered, RenderError> {
    let Node::HtmlSpan(html) = node else {
        return Err(mismatch(NodeKind::HtmlSpan, node, trail));
    };

    let (text, images) = extract_images(&html.content);
    Ok(combine_inline(text, images, |text| text))
}

/// Cut every `<img>` tag out of `html`.
///
/// Returns the remaining markup and one image descriptor per opening tag, in
/// document order. Closing `</img>` tags and comments are dropped.
pub(crate) fn extract_images(html: &str) -> (String, Vec<Block>) {
    let mut text = String::with_capacity(html.len());
    let mut images = Vec::new();
    let mut last = 0;

    for tag in TAG.captures_iter(html) {
        let Some(whole) = tag.get(0) else {
            continue;
        };
        text.push_str(&html[last..whole.start()]);
        last = whole.end();

        if tag.name("skip").is_some() || tag.name("close").is_some() {
            continue;
        }
        let attrs = tag.name("attrs").map_or("", |m| m.as_str());
        let source = attribute(attrs, "src").unwrap_or_default();
        images.push(Block::image(source, attribute(attrs, "alt")));
    }

    text.push_str(&html[last..]);
    (text, images)
}

/// First value of attribute `name` in a tag's attribute text
fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| caps["name"].eq_ignore_ascii_case(name))
        .and_then(|caps| {
            caps.name("dq")
                .or_else(|| caps.name("sq"))
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str().to_string())
        })
}
