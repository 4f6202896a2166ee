//! Rich text node types.
//!
//! A rich text body is a flat list of nodes. Text blocks hold spans whose
//! marks refer either to a decorator name (`strong`, `em`, ...) or to the key
//! of a mark definition scoped to that block (links).

use super::value::{first_str, slug_str, type_tag};
use super::Table;
use serde::Deserialize;
use serde_json::Value;

/// One node of a rich text body.
#[derive(Debug, Clone, PartialEq)]
pub enum RichTextNode {
    /// A paragraph, heading, quote or list item
    TextBlock(TextBlock),

    /// An embedded image
    Image(ImageNode),

    /// An embedded table
    Table(Table),

    /// An embedded code listing
    CodeBlock(CodeBlock),

    /// Any other inline object, kept raw
    Unknown {
        /// The node's type tag (empty if absent)
        kind: String,
        /// The raw node
        value: Value,
    },
}

impl RichTextNode {
    /// Build a node from a raw value. Never fails; unrecognised shapes become
    /// [`RichTextNode::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        if let Value::String(text) = value {
            return RichTextNode::TextBlock(TextBlock::paragraph(text.clone()));
        }

        match type_tag(value) {
            Some("block") => RichTextNode::TextBlock(TextBlock::from_value(value)),
            Some("image") => RichTextNode::Image(ImageNode::from_value(value)),
            Some("table") => RichTextNode::Table(Table::from_value(value)),
            Some("code" | "codeBlock") => {
                match serde_json::from_value::<CodeBlock>(value.clone()) {
                    Ok(code) => RichTextNode::CodeBlock(code),
                    Err(e) => {
                        log::debug!("Code node did not decode: {}", e);
                        RichTextNode::unknown(value)
                    }
                }
            }
            None if Self::looks_like_text_block(value) => {
                RichTextNode::TextBlock(TextBlock::from_value(value))
            }
            _ => RichTextNode::unknown(value),
        }
    }

    /// Parse a rich text field: an array of nodes, a single node, or a plain
    /// string (treated as one paragraph).
    pub fn parse_all(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            Value::Object(_) | Value::String(_) => vec![Self::from_value(value)],
            _ => Vec::new(),
        }
    }

    /// Whether a raw value has the shape of a single text block: a
    /// `block` type tag, a block-style tag, or a `children` array.
    pub fn looks_like_text_block(value: &Value) -> bool {
        if !value.is_object() {
            return false;
        }
        type_tag(value) == Some("block")
            || value.get("style").is_some_and(Value::is_string)
            || value.get("children").is_some_and(Value::is_array)
    }

    /// The node's kind tag.
    pub fn kind(&self) -> &str {
        match self {
            RichTextNode::TextBlock(_) => "block",
            RichTextNode::Image(_) => "image",
            RichTextNode::Table(_) => "table",
            RichTextNode::CodeBlock(_) => "codeBlock",
            RichTextNode::Unknown { kind, .. } => kind,
        }
    }

    fn unknown(value: &Value) -> Self {
        RichTextNode::Unknown {
            kind: type_tag(value).unwrap_or_default().to_string(),
            value: value.clone(),
        }
    }
}

/// A text block: paragraph, heading, blockquote or list item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    /// Block style
    pub style: BlockStyle,

    /// List membership, if this block is a list item
    pub list: Option<ListInfo>,

    /// Inline children
    pub children: Vec<Inline>,

    /// Mark definitions scoped to this block
    pub mark_defs: Vec<MarkDefinition>,
}

impl TextBlock {
    /// Create a normal paragraph holding a single unmarked span.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            children: vec![Inline::Span(Span::new(text))],
            ..Self::default()
        }
    }

    fn from_value(value: &Value) -> Self {
        let style = value
            .get("style")
            .and_then(Value::as_str)
            .map(BlockStyle::parse)
            .unwrap_or_default();

        let list = value
            .get("listItem")
            .and_then(Value::as_str)
            .map(|kind| ListInfo {
                kind: if kind == "number" {
                    ListKind::Number
                } else {
                    ListKind::Bullet
                },
                level: value
                    .get("level")
                    .and_then(Value::as_u64)
                    .map(|l| l.clamp(1, 10) as u8)
                    .unwrap_or(1),
            });

        let children = value
            .get("children")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Inline::from_value).collect())
            .unwrap_or_default();

        let mark_defs = value
            .get("markDefs")
            .and_then(Value::as_array)
            .map(|defs| defs.iter().filter_map(MarkDefinition::from_value).collect())
            .unwrap_or_default();

        Self {
            style,
            list,
            children,
            mark_defs,
        }
    }

    /// Look up a mark definition by key.
    pub fn mark_def(&self, key: &str) -> Option<&MarkDefinition> {
        self.mark_defs.iter().find(|def| def.key == key)
    }
}

/// Style of a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockStyle {
    /// Plain paragraph
    #[default]
    Normal,
    /// Heading of the given depth (1-6)
    Heading(u8),
    /// Quoted paragraph
    Blockquote,
}

impl BlockStyle {
    /// Parse a style tag. Unknown tags fall back to a normal paragraph.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "h1" => BlockStyle::Heading(1),
            "h2" => BlockStyle::Heading(2),
            "h3" => BlockStyle::Heading(3),
            "h4" => BlockStyle::Heading(4),
            "h5" => BlockStyle::Heading(5),
            "h6" => BlockStyle::Heading(6),
            "blockquote" => BlockStyle::Blockquote,
            _ => BlockStyle::Normal,
        }
    }
}

/// List item information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListInfo {
    /// Bullet or numbered
    pub kind: ListKind,
    /// Nesting level, starting at 1
    pub level: u8,
}

/// List marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered list
    Bullet,
    /// Ordered list
    Number,
}

/// Inline child of a text block.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run of text
    Span(Span),
    /// An inline object embedded in the text flow
    Object(RichTextNode),
}

impl Inline {
    fn from_value(value: &Value) -> Option<Self> {
        match type_tag(value) {
            Some("span") | None => {
                let text = value.get("text").and_then(Value::as_str)?;
                Some(Inline::Span(Span {
                    text: text.to_string(),
                    marks: value
                        .get("marks")
                        .and_then(Value::as_array)
                        .map(|marks| {
                            marks
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default(),
                }))
            }
            Some(_) => Some(Inline::Object(RichTextNode::from_value(value))),
        }
    }
}

/// A run of text with mark references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    /// The text content
    pub text: String,

    /// Decorator names or mark definition keys
    pub marks: Vec<String>,
}

impl Span {
    /// Create an unmarked span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// A mark definition (annotation) scoped to one text block.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkDefinition {
    /// Key referenced from span marks
    pub key: String,

    /// Annotation kind (`link`, `internalLink`, ...)
    pub kind: String,

    /// Link target, if the annotation carries one
    pub href: Option<String>,
}

impl MarkDefinition {
    fn from_value(value: &Value) -> Option<Self> {
        let key = first_str(value, &["_key", "key"])?.to_string();
        let kind = type_tag(value).unwrap_or("link").to_string();

        let href = match kind.as_str() {
            "internalLink" => value
                .get("slug")
                .or_else(|| value.get("reference").and_then(|r| r.get("slug")))
                .and_then(slug_str)
                .map(|slug| {
                    if slug.starts_with('/') {
                        slug.to_string()
                    } else {
                        format!("/{}", slug)
                    }
                }),
            _ => first_str(value, &["href", "url"]).map(str::to_string),
        };

        Some(Self { key, kind, href })
    }
}

/// An embedded image node. The asset reference is resolved at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    /// The raw node, holding whichever asset reference shape was supplied
    pub source: Value,

    /// Alternative text
    pub alt: Option<String>,

    /// Caption shown under the image
    pub caption: Option<String>,
}

impl ImageNode {
    /// Build an image node from its raw value.
    pub fn from_value(value: &Value) -> Self {
        Self {
            source: value.clone(),
            alt: first_str(value, &["alt", "altText"]).map(str::to_string),
            caption: first_str(value, &["caption"]).map(str::to_string),
        }
    }
}

/// An embedded code listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeBlock {
    /// Source text
    pub code: String,

    /// Language tag for the fence
    #[serde(alias = "lang")]
    pub language: Option<String>,
}
