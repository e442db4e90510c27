//! Markdown syntax tree consumed by the renderer
//!
//! A closed set of node kinds. The parser adapter in [`crate::parse`] produces
//! it from the `markdown` crate's mdast; callers may also build trees by hand
//! with the constructor helpers below.

use std::fmt;

/// A node with ordered children and no other attributes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parent {
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// 1-based depth as written in the source (`#` = 1)
    pub level: u8,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    /// Marker token that opened the item: `-`, `*`, `+`, `1.`, `2)` ...
    pub leader: String,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeFence {
    /// Free-text info string language, if any
    pub language: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// Always a [`Node::TableRow`]
    pub header: Box<Node>,
    /// Body rows, each a [`Node::TableRow`]
    pub rows: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Html {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub target: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub title: Option<String>,
    /// Alt text content
    pub children: Vec<Node>,
}

/// A Markdown syntax tree node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    // Block nodes
    Document(Parent),
    Paragraph(Parent),
    Heading(Heading),
    Quote(Parent),
    List(List),
    ListItem(ListItem),
    CodeFence(CodeFence),
    ThematicBreak,
    Table(Table),
    TableRow(Parent),
    TableCell(Parent),
    HtmlBlock(Html),
    BlockEquation(Parent),

    // Inline nodes
    Strong(Parent),
    Emphasis(Parent),
    InlineCode(Parent),
    Strikethrough(Parent),
    Escape(Parent),
    Link(Link),
    Image(Image),
    HtmlSpan(Html),
    InlineEquation(Parent),
    LineBreak,
    RawText(String),
}

/// Discriminant of [`Node`], used as the handler registry key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    Quote,
    List,
    ListItem,
    CodeFence,
    ThematicBreak,
    Table,
    TableRow,
    TableCell,
    HtmlBlock,
    BlockEquation,
    Strong,
    Emphasis,
    InlineCode,
    Strikethrough,
    Escape,
    Link,
    Image,
    HtmlSpan,
    InlineEquation,
    LineBreak,
    RawText,
}

impl NodeKind {
    pub const ALL: [NodeKind; 24] = [
        NodeKind::Document,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::Quote,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::CodeFence,
        NodeKind::ThematicBreak,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableCell,
        NodeKind::HtmlBlock,
        NodeKind::BlockEquation,
        NodeKind::Strong,
        NodeKind::Emphasis,
        NodeKind::InlineCode,
        NodeKind::Strikethrough,
        NodeKind::Escape,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::HtmlSpan,
        NodeKind::InlineEquation,
        NodeKind::LineBreak,
        NodeKind::RawText,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Quote => "quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::CodeFence => "code_fence",
            NodeKind::ThematicBreak => "thematic_break",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::BlockEquation => "block_equation",
            NodeKind::Strong => "strong",
            NodeKind::Emphasis => "emphasis",
            NodeKind::InlineCode => "inline_code",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::Escape => "escape",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::HtmlSpan => "html_span",
            NodeKind::InlineEquation => "inline_equation",
            NodeKind::LineBreak => "line_break",
            NodeKind::RawText => "raw_text",
        }
    }

    /// Whether nodes of this kind live at block level.
    ///
    /// Block-level nodes can never be reduced to inline markup.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::Quote
                | NodeKind::List
                | NodeKind::ListItem
                | NodeKind::CodeFence
                | NodeKind::ThematicBreak
                | NodeKind::Table
                | NodeKind::TableRow
                | NodeKind::TableCell
                | NodeKind::HtmlBlock
                | NodeKind::BlockEquation
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading(_) => NodeKind::Heading,
            Node::Quote(_) => NodeKind::Quote,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::CodeFence(_) => NodeKind::CodeFence,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::Table(_) => NodeKind::Table,
            Node::TableRow(_) => NodeKind::TableRow,
            Node::TableCell(_) => NodeKind::TableCell,
            Node::HtmlBlock(_) => NodeKind::HtmlBlock,
            Node::BlockEquation(_) => NodeKind::BlockEquation,
            Node::Strong(_) => NodeKind::Strong,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::Strikethrough(_) => NodeKind::Strikethrough,
            Node::Escape(_) => NodeKind::Escape,
            Node::Link(_) => NodeKind::Link,
            Node::Image(_) => NodeKind::Image,
            Node::HtmlSpan(_) => NodeKind::HtmlSpan,
            Node::InlineEquation(_) => NodeKind::InlineEquation,
            Node::LineBreak => NodeKind::LineBreak,
            Node::RawText(_) => NodeKind::RawText,
        }
    }

    /// Ordered children, empty for leaves.
    ///
    /// A table's header row comes first, followed by its body rows.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Document(p)
            | Node::Paragraph(p)
            | Node::Quote(p)
            | Node::TableRow(p)
            | Node::TableCell(p)
            | Node::BlockEquation(p)
            | Node::Strong(p)
            | Node::Emphasis(p)
            | Node::InlineCode(p)
            | Node::Strikethrough(p)
            | Node::Escape(p)
            | Node::InlineEquation(p) => p.children.iter().collect(),
            Node::Heading(h) => h.children.iter().collect(),
            Node::List(l) => l.children.iter().collect(),
            Node::ListItem(i) => i.children.iter().collect(),
            Node::CodeFence(c) => c.children.iter().collect(),
            Node::Link(l) => l.children.iter().collect(),
            Node::Image(i) => i.children.iter().collect(),
            Node::Table(t) => std::iter::once(t.header.as_ref())
                .chain(t.rows.iter())
                .collect(),
            Node::ThematicBreak
            | Node::HtmlBlock(_)
            | Node::HtmlSpan(_)
            | Node::LineBreak
            | Node::RawText(_) => Vec::new(),
        }
    }

    // Constructor helpers

    pub fn document(children: Vec<Node>) -> Self {
        Node::Document(Parent { children })
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Parent { children })
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading(Heading { level, children })
    }

    pub fn quote(children: Vec<Node>) -> Self {
        Node::Quote(Parent { children })
    }

    pub fn list(ordered: bool, children: Vec<Node>) -> Self {
        Node::List(List { ordered, children })
    }

    pub fn list_item(leader: impl Into<String>, children: Vec<Node>) -> Self {
        Node::ListItem(ListItem {
            leader: leader.into(),
            children,
        })
    }

    pub fn code_fence(language: Option<&str>, code: impl Into<String>) -> Self {
        Node::CodeFence(CodeFence {
            language: language.map(str::to_string),
            children: vec![Node::text(code)],
        })
    }

    pub fn table(header: Vec<Node>, rows: Vec<Vec<Node>>) -> Self {
        Node::Table(Table {
            header: Box::new(Node::TableRow(Parent { children: header })),
            rows: rows
                .into_iter()
                .map(|children| Node::TableRow(Parent { children }))
                .collect(),
        })
    }

    pub fn table_cell(children: Vec<Node>) -> Self {
        Node::TableCell(Parent { children })
    }

    pub fn html_block(content: impl Into<String>) -> Self {
        Node::HtmlBlock(Html {
            content: content.into(),
        })
    }

    pub fn html_span(content: impl Into<String>) -> Self {
        Node::HtmlSpan(Html {
            content: content.into(),
        })
    }

    pub fn block_equation(latex: impl Into<String>) -> Self {
        Node::BlockEquation(Parent {
            children: vec![Node::text(latex)],
        })
    }

    pub fn inline_equation(latex: impl Into<String>) -> Self {
        Node::InlineEquation(Parent {
            children: vec![Node::text(latex)],
        })
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Node::Strong(Parent { children })
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Node::Emphasis(Parent { children })
    }

    pub fn inline_code(code: impl Into<String>) -> Self {
        Node::InlineCode(Parent {
            children: vec![Node::text(code)],
        })
    }

    pub fn strikethrough(children: Vec<Node>) -> Self {
        Node::Strikethrough(Parent { children })
    }

    pub fn escape(escaped: impl Into<String>) -> Self {
        Node::Escape(Parent {
            children: vec![Node::text(escaped)],
        })
    }

    pub fn link(target: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link(Link {
            target: target.into(),
            title: None,
            children,
        })
    }

    pub fn image(src: impl Into<String>, alt: &str) -> Self {
        let children = if alt.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(alt)]
        };
        Node::Image(Image {
            src: src.into(),
            title: None,
            children,
        })
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::RawText(content.into())
    }
}
