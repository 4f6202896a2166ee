//! Document-level types.

use super::value::{display_names, first_str, first_value, slug_str, type_tag};
use super::{Block, RichTextNode};
use crate::error::{Error, Result};
use serde_json::Value;

/// A structured content document, already fetched from the content store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Document type tag (`_type` or `type`)
    pub kind: Option<String>,

    /// Title (`title`, then `name`)
    pub title: Option<String>,

    /// Summary (`seoDescription`, `description`, `excerpt`, `summary`)
    pub summary: Option<String>,

    /// Byline and dates
    pub metadata: Metadata,

    /// Main rich text body (`body`, `richText`, `content`)
    pub body: Vec<RichTextNode>,

    /// Layout blocks (`blocks`, `layout`, `sections`, `pageBuilder`)
    pub blocks: Vec<Block>,

    /// Child entries of a listing document (`childItems`)
    pub child_items: Vec<ListingEntry>,

    /// Heading for the child entry index (`listingHeading`)
    pub listing_heading: Option<String>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Build a document from a JSON value.
    ///
    /// Only a non-object input is an error; every field is optional and
    /// malformed fields are skipped.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidDocument(format!(
                "expected a JSON object, found {}",
                value_kind(value)
            )));
        }

        let body = first_value(value, &["body", "richText", "content"])
            .map(RichTextNode::parse_all)
            .unwrap_or_default();

        let blocks = first_value(value, &["blocks", "layout", "sections", "pageBuilder"])
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Block::from_value).collect())
            .unwrap_or_default();

        let child_items = value
            .get("childItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(ListingEntry::from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            kind: type_tag(value).map(str::to_string),
            title: owned(first_str(value, &["title", "name"])),
            summary: owned(first_str(
                value,
                &["seoDescription", "description", "excerpt", "summary"],
            )),
            metadata: Metadata::from_value(value),
            body,
            blocks,
            child_items,
            listing_heading: owned(first_str(value, &["listingHeading"])),
        })
    }

    /// Add a body node.
    pub fn add_body_node(&mut self, node: RichTextNode) {
        self.body.push(node);
    }

    /// Add a layout block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a listing entry.
    pub fn add_child_item(&mut self, entry: ListingEntry) {
        self.child_items.push(entry);
    }

    /// Whether this document indexes other documents.
    pub fn is_listing(&self) -> bool {
        !self.child_items.is_empty()
    }
}

/// Byline and date metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Author names (`author` or `authors`)
    pub authors: Vec<String>,

    /// Publication date as supplied (`publishedAt`, then `date`)
    pub published_at: Option<String>,

    /// Last update as supplied (`updatedAt`, then `_updatedAt`)
    pub updated_at: Option<String>,

    /// Topic names
    pub topics: Vec<String>,
}

impl Metadata {
    fn from_value(value: &Value) -> Self {
        Self {
            authors: first_value(value, &["author", "authors"])
                .map(display_names)
                .unwrap_or_default(),
            published_at: owned(first_str(value, &["publishedAt", "date"])),
            updated_at: owned(first_str(value, &["updatedAt", "_updatedAt"])),
            topics: first_value(value, &["topics", "tags", "categories"])
                .map(display_names)
                .unwrap_or_default(),
        }
    }

    /// Whether no metadata field is set.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
            && self.published_at.is_none()
            && self.updated_at.is_none()
            && self.topics.is_empty()
    }
}

/// One entry of a listing document's index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingEntry {
    /// Entry title
    pub title: Option<String>,

    /// Entry slug (string or `{ current }`)
    pub slug: Option<String>,

    /// Short description
    pub description: Option<String>,

    /// Publication date as supplied
    pub published_at: Option<String>,
}

impl ListingEntry {
    /// Create an entry with a title and slug.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(Self {
            title: owned(first_str(value, &["title", "name"])),
            slug: value.get("slug").and_then(slug_str).map(str::to_string),
            description: owned(first_str(value, &["description", "excerpt", "summary"])),
            published_at: owned(first_str(value, &["publishedAt", "date"])),
        })
    }
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(|s| s.trim().to_string())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
