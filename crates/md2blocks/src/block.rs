//! Block descriptors, the renderer's output model
//!
//! Each [`Block`] describes one remote block to create. The serialized form is
//! a flat JSON object tagged by `"kind"`, with nested descriptors under
//! `"children"` and table data under `"schema"`/`"rows"`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the single title-typed column in every table schema
pub const TITLE_COLUMN: &str = "title";

/// Length of synthesized column keys
const COLUMN_KEY_LEN: usize = 8;

/// A typed block descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        title: String,
    },
    SubHeader {
        title: String,
    },
    SubSubHeader {
        title: String,
    },
    Text {
        title: String,
    },
    Quote {
        title: String,
    },
    Code {
        language: String,
        #[serde(rename = "title_plaintext")]
        code: String,
    },
    Divider,
    BulletedListItem {
        title: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    NumberedListItem {
        title: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    TodoListItem {
        title: String,
        checked: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Block>,
    },
    Image {
        source: String,
        display_source: String,
        caption: Option<String>,
    },
    Table {
        schema: Schema,
        rows: Vec<Vec<String>>,
    },
    Equation {
        #[serde(rename = "title_plaintext")]
        latex: String,
    },
    /// Raw inline text that was split away from hoisted blocks
    Fragment {
        title: String,
    },
}

/// Discriminant of [`Block`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Header,
    SubHeader,
    SubSubHeader,
    Text,
    Quote,
    Code,
    Divider,
    BulletedListItem,
    NumberedListItem,
    TodoListItem,
    Image,
    Table,
    Equation,
    Fragment,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::SubHeader => "sub_header",
            BlockKind::SubSubHeader => "sub_sub_header",
            BlockKind::Text => "text",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::Divider => "divider",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::TodoListItem => "todo_list_item",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::Equation => "equation",
            BlockKind::Fragment => "fragment",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column type in a table schema
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Title,
    Text,
}

/// One schema entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Ordered mapping of column key to column definition
pub type Schema = IndexMap<String, Column>;

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Header { .. } => BlockKind::Header,
            Block::SubHeader { .. } => BlockKind::SubHeader,
            Block::SubSubHeader { .. } => BlockKind::SubSubHeader,
            Block::Text { .. } => BlockKind::Text,
            Block::Quote { .. } => BlockKind::Quote,
            Block::Code { .. } => BlockKind::Code,
            Block::Divider => BlockKind::Divider,
            Block::BulletedListItem { .. } => BlockKind::BulletedListItem,
            Block::NumberedListItem { .. } => BlockKind::NumberedListItem,
            Block::TodoListItem { .. } => BlockKind::TodoListItem,
            Block::Image { .. } => BlockKind::Image,
            Block::Table { .. } => BlockKind::Table,
            Block::Equation { .. } => BlockKind::Equation,
            Block::Fragment { .. } => BlockKind::Fragment,
        }
    }

    pub fn text(title: impl Into<String>) -> Self {
        Block::Text {
            title: title.into(),
        }
    }

    pub fn fragment(title: impl Into<String>) -> Self {
        Block::Fragment {
            title: title.into(),
        }
    }

    /// Image descriptor pointing at `source` (a URL or a document-relative path)
    pub fn image(source: impl Into<String>, caption: Option<String>) -> Self {
        let source = source.into();
        Block::Image {
            display_source: source.clone(),
            source,
            caption,
        }
    }

    /// Rendered inline text of text-bearing descriptors
    pub fn title(&self) -> Option<&str> {
        match self {
            Block::Header { title }
            | Block::SubHeader { title }
            | Block::SubSubHeader { title }
            | Block::Text { title }
            | Block::Quote { title }
            | Block::Fragment { title }
            | Block::BulletedListItem { title, .. }
            | Block::NumberedListItem { title, .. }
            | Block::TodoListItem { title, .. } => Some(title),
            _ => None,
        }
    }

    /// Nested descriptors; empty for kinds that cannot nest
    pub fn children(&self) -> &[Block] {
        match self {
            Block::BulletedListItem { children, .. }
            | Block::NumberedListItem { children, .. }
            | Block::TodoListItem { children, .. } => children,
            _ => &[],
        }
    }

    /// Text-like descriptors unwrap into their title when embedded in other text
    pub fn is_text_like(&self) -> bool {
        matches!(self, Block::Text { .. } | Block::Fragment { .. })
    }

    /// Creation fields for the remote block.
    ///
    /// `kind`, `children`, `schema` and `rows` are stripped; the uploader
    /// handles those separately.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for transient in ["kind", "children", "schema", "rows"] {
            fields.remove(transient);
        }
        fields
    }
}

/// Build a table schema from header names.
///
/// Every column but the last gets a fresh random key and `text` type; the last
/// column is keyed [`TITLE_COLUMN`] with `title` type.
pub fn table_schema(headers: &[String]) -> Schema {
    let mut schema = Schema::with_capacity(headers.len());
    let Some((last, rest)) = headers.split_last() else {
        return schema;
    };

    for name in rest {
        let key = loop {
            let candidate = random_column_key();
            if candidate != TITLE_COLUMN && !schema.contains_key(&candidate) {
                break candidate;
            }
        };
        schema.insert(
            key,
            Column {
                name: name.clone(),
                column_type: ColumnType::Text,
            },
        );
    }

    schema.insert(
        TITLE_COLUMN.to_string(),
        Column {
            name: last.clone(),
            column_type: ColumnType::Title,
        },
    );
    schema
}

fn random_column_key() -> String {
    let mut key = uuid::Uuid::new_v4().simple().to_string();
    key.truncate(COLUMN_KEY_LEN);
    key
}
