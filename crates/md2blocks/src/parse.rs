//! Markdown parsing into the renderer's syntax tree
//!
//! Parsing is done by the `markdown` crate. Its mdast is then adapted to
//! [`ast::Node`](crate::ast::Node): reference links are resolved against
//! their definitions, list markers and backslash escapes are recovered from
//! the source text, and raw HTML is split by position (flow or phrasing).

use markdown::mdast;
use markdown::unist::Position;
use markdown::{Constructs, ParseOptions};
use rustc_hash::FxHashMap;

use crate::ast::{self, Node};
use crate::error::ConvertError;

/// Maximum Markdown source size (10 MiB)
pub const MAX_SOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Parser constructs every renderer starts from.
///
/// GitHub flavored Markdown minus raw HTML, math, footnotes and task list
/// items. Checkbox markers stay in the item text, where the list handler
/// reads them.
pub fn base_constructs() -> Constructs {
    Constructs {
        html_flow: false,
        html_text: false,
        math_flow: false,
        math_text: false,
        gfm_footnote_definition: false,
        gfm_label_start_footnote: false,
        gfm_task_list_item: false,
        ..Constructs::gfm()
    }
}

/// Parse Markdown source into a document node
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node, ConvertError> {
    if source.len() > MAX_SOURCE_SIZE {
        return Err(ConvertError::new(format!(
            "Markdown source exceeds maximum size of {} bytes ({} MB)",
            MAX_SOURCE_SIZE,
            MAX_SOURCE_SIZE / 1024 / 1024
        ))
        .with_suggestion("Split the document into smaller files."));
    }

    let mdast = markdown::to_mdast(source, options).map_err(ConvertError::parse_error)?;
    let adapter = Adapter::new(source, &mdast);

    let children = match &mdast {
        mdast::Node::Root(root) => adapter.flow(&root.children)?,
        other => adapter.flow(std::slice::from_ref(other))?,
    };
    Ok(Node::document(children))
}

/// Target and title of a link reference definition
struct Definition {
    url: String,
    title: Option<String>,
}

struct Adapter<'s> {
    source: &'s str,
    definitions: FxHashMap<String, Definition>,
}

impl<'s> Adapter<'s> {
    fn new(source: &'s str, root: &mdast::Node) -> Self {
        let mut adapter = Adapter {
            source,
            definitions: FxHashMap::default(),
        };
        adapter.collect_definitions(root);
        adapter
    }

    fn collect_definitions(&mut self, node: &mdast::Node) {
        if let mdast::Node::Definition(def) = node {
            // First definition of a label wins
            self.definitions
                .entry(def.identifier.clone())
                .or_insert_with(|| Definition {
                    url: def.url.clone(),
                    title: def.title.clone(),
                });
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    /// Adapt block-level siblings
    fn flow(&self, nodes: &[mdast::Node]) -> Result<Vec<Node>, ConvertError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.node(node, false, &mut out)?;
        }
        Ok(out)
    }

    /// Adapt inline siblings
    fn phrasing(&self, nodes: &[mdast::Node]) -> Result<Vec<Node>, ConvertError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.node(node, true, &mut out)?;
        }
        Ok(out)
    }

    fn node(
        &self,
        node: &mdast::Node,
        inline: bool,
        out: &mut Vec<Node>,
    ) -> Result<(), ConvertError> {
        let adapted = match node {
            // Block elements
            mdast::Node::Paragraph(para) => Node::paragraph(self.phrasing(&para.children)?),
            mdast::Node::Heading(heading) => {
                Node::heading(heading.depth, self.phrasing(&heading.children)?)
            }
            mdast::Node::Blockquote(quote) => Node::quote(self.flow(&quote.children)?),
            mdast::Node::ThematicBreak(_) => Node::ThematicBreak,
            mdast::Node::Code(code) => Node::code_fence(code.lang.as_deref(), code.value.as_str()),
            mdast::Node::Math(math) => Node::block_equation(math.value.as_str()),
            mdast::Node::List(list) => self.list(list)?,
            mdast::Node::Table(table) => self.table(table)?,
            mdast::Node::Html(html) if inline => Node::html_span(html.value.as_str()),
            mdast::Node::Html(html) => Node::html_block(html.value.as_str()),

            // Inline elements
            mdast::Node::Text(text) => {
                out.extend(self.text(text));
                return Ok(());
            }
            mdast::Node::Strong(strong) => Node::strong(self.phrasing(&strong.children)?),
            mdast::Node::Emphasis(emph) => Node::emphasis(self.phrasing(&emph.children)?),
            mdast::Node::Delete(del) => Node::strikethrough(self.phrasing(&del.children)?),
            mdast::Node::InlineCode(code) => Node::inline_code(code.value.as_str()),
            mdast::Node::InlineMath(math) => Node::inline_equation(math.value.as_str()),
            mdast::Node::Break(_) => Node::LineBreak,
            mdast::Node::Link(link) => Node::Link(ast::Link {
                target: link.url.clone(),
                title: link.title.clone(),
                children: self.phrasing(&link.children)?,
            }),
            mdast::Node::LinkReference(reference) => {
                let children = self.phrasing(&reference.children)?;
                match self.definitions.get(&reference.identifier) {
                    Some(def) => Node::Link(ast::Link {
                        target: def.url.clone(),
                        title: def.title.clone(),
                        children,
                    }),
                    None => {
                        out.extend(children);
                        return Ok(());
                    }
                }
            }
            mdast::Node::Image(image) => self.image(&image.url, image.title.clone(), &image.alt),
            mdast::Node::ImageReference(reference) => {
                match self.definitions.get(&reference.identifier) {
                    Some(def) => self.image(&def.url, def.title.clone(), &reference.alt),
                    None => Node::text(reference.alt.as_str()),
                }
            }

            // Metadata with no rendering of its own
            mdast::Node::Definition(_) | mdast::Node::Yaml(_) | mdast::Node::Toml(_) => {
                return Ok(());
            }

            other => return Err(ConvertError::unsupported_syntax(mdast_kind(other))),
        };
        out.push(adapted);
        Ok(())
    }

    fn list(&self, list: &mdast::List) -> Result<Node, ConvertError> {
        let mut items = Vec::with_capacity(list.children.len());
        for child in &list.children {
            let mdast::Node::ListItem(item) = child else {
                return Err(ConvertError::unsupported_syntax(mdast_kind(child)));
            };
            items.push(Node::list_item(
                self.leader(item.position.as_ref(), list.ordered),
                self.flow(&item.children)?,
            ));
        }
        Ok(Node::list(list.ordered, items))
    }

    fn table(&self, table: &mdast::Table) -> Result<Node, ConvertError> {
        let mut rows = Vec::with_capacity(table.children.len());
        for child in &table.children {
            let mdast::Node::TableRow(row) = child else {
                return Err(ConvertError::unsupported_syntax(mdast_kind(child)));
            };
            let mut cells = Vec::with_capacity(row.children.len());
            for cell in &row.children {
                let mdast::Node::TableCell(cell) = cell else {
                    return Err(ConvertError::unsupported_syntax(mdast_kind(cell)));
                };
                cells.push(Node::table_cell(self.phrasing(&cell.children)?));
            }
            rows.push(cells);
        }

        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        Ok(Node::table(header, rows.collect()))
    }

    fn image(&self, url: &str, title: Option<String>, alt: &str) -> Node {
        let children = if alt.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(alt)]
        };
        Node::Image(ast::Image {
            src: url.to_string(),
            title,
            children,
        })
    }

    /// Text, with backslash escapes split back out of the decoded value
    fn text(&self, text: &mdast::Text) -> Vec<Node> {
        let raw = text
            .position
            .as_ref()
            .and_then(|p| self.source.get(self.escape_start(p.start.offset)..p.end.offset));
        match raw {
            Some(raw) if raw.contains('\\') => {
                split_escapes(raw, &text.value)
                    .unwrap_or_else(|| vec![Node::text(text.value.as_str())])
            }
            _ => vec![Node::text(text.value.as_str())],
        }
    }

    /// A text run opening with an escape is positioned after its backslash;
    /// step back onto it so the escape is seen.
    fn escape_start(&self, offset: usize) -> usize {
        let bytes = self.source.as_bytes();
        let escaped = bytes.get(offset).is_some_and(u8::is_ascii_punctuation);
        if offset > 0 && escaped && bytes[offset - 1] == b'\\' {
            offset - 1
        } else {
            offset
        }
    }

    /// Marker token of a list item, read from the source at the item's start
    fn leader(&self, position: Option<&Position>, ordered: bool) -> String {
        let fallback = if ordered { "1." } else { "-" };
        let Some(rest) = position.and_then(|p| self.source.get(p.start.offset..)) else {
            return fallback.to_string();
        };
        let rest = rest.trim_start_matches([' ', '\t']);

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            let end = match rest.as_bytes().get(digits) {
                Some(b'.' | b')') => digits + 1,
                _ => digits,
            };
            return rest[..end].to_string();
        }

        match rest.chars().next() {
            Some(c @ ('-' | '*' | '+')) => c.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Walk the raw source of a text node against its decoded value, turning
/// each `\x` escape into an escape node.
///
/// Characters only present in the source (container prefixes, entity
/// references) are skipped. Returns `None` when the two cannot be aligned.
fn split_escapes(raw: &str, value: &str) -> Option<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut rest = value;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if rest.is_empty() {
            break;
        }
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() && rest.starts_with(next) {
                    chars.next();
                    if !text.is_empty() {
                        nodes.push(Node::text(std::mem::take(&mut text)));
                    }
                    nodes.push(Node::escape(next.to_string()));
                    rest = &rest[next.len_utf8()..];
                    continue;
                }
            }
        }
        if rest.starts_with(c) {
            text.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    if !rest.is_empty() {
        return None;
    }
    if !text.is_empty() {
        nodes.push(Node::text(text));
    }
    Some(nodes)
}

fn mdast_kind(node: &mdast::Node) -> &'static str {
    match node {
        mdast::Node::FootnoteDefinition(_) => "footnote_definition",
        mdast::Node::FootnoteReference(_) => "footnote_reference",
        mdast::Node::MdxJsxFlowElement(_) | mdast::Node::MdxJsxTextElement(_) => "mdx_jsx",
        mdast::Node::MdxjsEsm(_) => "mdx_esm",
        mdast::Node::MdxFlowExpression(_) | mdast::Node::MdxTextExpression(_) => {
            "mdx_expression"
        }
        mdast::Node::ListItem(_) => "list_item",
        mdast::Node::TableRow(_) => "table_row",
        mdast::Node::TableCell(_) => "table_cell",
        mdast::Node::Root(_) => "root",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(source: &str) -> Vec<Node> {
        let options = ParseOptions {
            constructs: base_constructs(),
            ..ParseOptions::gfm()
        };
        let Node::Document(doc) = parse(source, &options).unwrap() else {
            panic!("expected document");
        };
        doc.children
    }

    fn with_html_and_math(source: &str) -> Vec<Node> {
        let options = ParseOptions {
            constructs: Constructs {
                html_flow: true,
                html_text: true,
                math_flow: true,
                math_text: true,
                ..base_constructs()
            },
            ..ParseOptions::gfm()
        };
        let Node::Document(doc) = parse(source, &options).unwrap() else {
            panic!("expected document");
        };
        doc.children
    }

    #[test]
    fn headings_and_paragraphs() {
        let nodes = base("# Title\n\nSome *text*\n");
        assert_eq!(
            nodes,
            vec![
                Node::heading(1, vec![Node::text("Title")]),
                Node::paragraph(vec![
                    Node::text("Some "),
                    Node::emphasis(vec![Node::text("text")]),
                ]),
            ]
        );
    }

    #[test]
    fn list_leaders_come_from_source() {
        let nodes = base("- a\n- b\n\n3) c\n");
        let Node::List(bullets) = &nodes[0] else {
            panic!("expected list, got {:?}", nodes[0]);
        };
        assert!(!bullets.ordered);
        let leaders: Vec<_> = bullets
            .children
            .iter()
            .map(|item| match item {
                Node::ListItem(item) => item.leader.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(leaders, vec!["-", "-"]);

        let Node::List(numbers) = &nodes[1] else {
            panic!("expected list, got {:?}", nodes[1]);
        };
        assert!(numbers.ordered);
        let Node::ListItem(item) = &numbers.children[0] else {
            panic!("expected list item");
        };
        assert_eq!(item.leader, "3)");
    }

    #[test]
    fn nested_list_leader_ignores_indentation() {
        let nodes = base("* outer\n  * inner\n");
        let Node::List(outer) = &nodes[0] else {
            panic!("expected list");
        };
        let Node::ListItem(item) = &outer.children[0] else {
            panic!("expected item");
        };
        let Node::List(inner) = &item.children[1] else {
            panic!("expected nested list, got {:?}", item.children);
        };
        let Node::ListItem(inner_item) = &inner.children[0] else {
            panic!("expected item");
        };
        assert_eq!(inner_item.leader, "*");
    }

    #[test]
    fn task_markers_stay_in_text() {
        let nodes = base("- [x] done\n");
        let Node::List(list) = &nodes[0] else {
            panic!("expected list");
        };
        let Node::ListItem(item) = &list.children[0] else {
            panic!("expected item");
        };
        let [Node::Paragraph(para)] = &item.children[..] else {
            panic!("expected one paragraph, got {:?}", item.children);
        };
        let text: String = para
            .children
            .iter()
            .map(|child| match child {
                Node::RawText(text) => text.as_str(),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(text, "[x] done");
    }

    #[test]
    fn escapes_are_recovered() {
        let nodes = base("a \\* b\n");
        assert_eq!(
            nodes,
            vec![Node::paragraph(vec![
                Node::text("a "),
                Node::escape("*"),
                Node::text(" b"),
            ])]
        );
    }

    #[test]
    fn leading_escape_is_recovered() {
        let nodes = base("\\*not em\\*\n");
        assert_eq!(
            nodes,
            vec![Node::paragraph(vec![
                Node::escape("*"),
                Node::text("not em"),
                Node::escape("*"),
            ])]
        );
    }

    #[test]
    fn escape_after_markup_is_recovered() {
        let nodes = base("**a**\\[b\n");
        assert_eq!(
            nodes,
            vec![Node::paragraph(vec![
                Node::strong(vec![Node::text("a")]),
                Node::escape("["),
                Node::text("b"),
            ])]
        );
    }

    #[test]
    fn split_escapes_skips_source_only_characters() {
        let nodes = split_escapes("x\n> \\_y", "x\n_y").unwrap();
        assert_eq!(
            nodes,
            vec![Node::text("x\n"), Node::escape("_"), Node::text("y")]
        );
        assert!(split_escapes("abc", "xyz").is_none());
    }

    #[test]
    fn reference_links_resolve() {
        let nodes = base("[site][home]\n\n[home]: https://example.com \"Home\"\n");
        assert_eq!(
            nodes,
            vec![Node::paragraph(vec![Node::Link(ast::Link {
                target: "https://example.com".to_string(),
                title: Some("Home".to_string()),
                children: vec![Node::text("site")],
            })])]
        );
    }

    #[test]
    fn images_keep_alt_and_title() {
        let nodes = base("![alt text](a.png \"cap\")\n");
        let Node::Paragraph(para) = &nodes[0] else {
            panic!("expected paragraph");
        };
        let Node::Image(image) = &para.children[0] else {
            panic!("expected image");
        };
        assert_eq!(image.src, "a.png");
        assert_eq!(image.title.as_deref(), Some("cap"));
        assert_eq!(image.children, vec![Node::text("alt text")]);
    }

    #[test]
    fn tables_split_header_and_rows() {
        let nodes = base("| A | B |\n|---|---|\n| 1 | 2 |\n");
        let Node::Table(table) = &nodes[0] else {
            panic!("expected table, got {:?}", nodes);
        };
        assert_eq!(
            *table.header,
            Node::TableRow(ast::Parent {
                children: vec![
                    Node::table_cell(vec![Node::text("A")]),
                    Node::table_cell(vec![Node::text("B")]),
                ]
            })
        );
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn fenced_code_language() {
        let nodes = base("```python\nprint(1)\n```\n");
        assert_eq!(nodes, vec![Node::code_fence(Some("python"), "print(1)")]);
    }

    #[test]
    fn html_disabled_stays_text() {
        let nodes = base("<b>hi</b>\n");
        assert!(matches!(nodes[0], Node::Paragraph(_)));
        assert!(!nodes.iter().any(|n| n.kind() == crate::ast::NodeKind::HtmlBlock));
    }

    #[test]
    fn html_split_by_position() {
        let nodes = with_html_and_math("<div>\nblock\n</div>\n\nsome <b>bold</b>\n");
        assert_eq!(nodes[0], Node::html_block("<div>\nblock\n</div>"));
        assert_eq!(
            nodes[1],
            Node::paragraph(vec![
                Node::text("some "),
                Node::html_span("<b>"),
                Node::text("bold"),
                Node::html_span("</b>"),
            ])
        );
    }

    #[test]
    fn math_nodes() {
        let nodes = with_html_and_math("$$\nx^2\n$$\n\nand $y$\n");
        assert_eq!(nodes[0], Node::block_equation("x^2"));
        assert_eq!(
            nodes[1],
            Node::paragraph(vec![Node::text("and "), Node::inline_equation("y")])
        );
    }

    #[test]
    fn oversized_source_is_rejected() {
        let source = "a".repeat(MAX_SOURCE_SIZE + 1);
        let err = parse(&source, &ParseOptions::gfm()).unwrap_err();
        assert!(err.message.contains("maximum size"));
    }
}
