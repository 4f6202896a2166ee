//! Generic text extraction for values without a dedicated renderer.
//!
//! A bounded-depth walk collects human-readable strings from an arbitrary
//! value. Strings that look like payloads (data URIs, opaque asset ids,
//! bare URLs) or exceed the leaf length are skipped, as are structural keys.

use super::rich_text::RichTextSerializer;
use super::RenderOptions;
use crate::model::RichTextNode;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Keys whose values are structure, identity, geometry or media rather than
/// readable text.
const SKIPPED_KEYS: &[&str] = &[
    "_key",
    "key",
    "_id",
    "id",
    "_ref",
    "ref",
    "_type",
    "type",
    "_rev",
    "_weak",
    "_createdAt",
    "_updatedAt",
    "createdAt",
    "updatedAt",
    "blockType",
    "blockName",
    "style",
    "listItem",
    "level",
    "markDefs",
    "marks",
    "crop",
    "hotspot",
    "asset",
    "image",
    "media",
    "video",
    "file",
    "icon",
    "caption",
    "alt",
    "altText",
    "href",
    "url",
    "slug",
    "variant",
    "theme",
    "backgroundColor",
    "color",
    "alignment",
];

/// Extracts readable text from arbitrarily shaped values.
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor<'a> {
    rich_text: RichTextSerializer<'a>,
    max_depth: usize,
    max_leaf_length: usize,
}

impl<'a> TextExtractor<'a> {
    /// Create an extractor using the limits in `options`.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            rich_text: RichTextSerializer::new(options),
            max_depth: options.max_depth,
            max_leaf_length: options.max_leaf_length,
        }
    }

    /// Extract, deduplicate (first occurrence wins) and join with blank lines.
    pub fn serialize(&self, value: &Value) -> String {
        let pieces = self.extract(value, 0);
        let mut seen = HashSet::new();
        pieces
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }

    /// Collect candidate strings in document order, starting at `depth`.
    pub fn extract(&self, value: &Value, depth: usize) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(value, depth, &mut out);
        out
    }

    fn walk(&self, value: &Value, depth: usize, out: &mut Vec<String>) {
        if depth > self.max_depth {
            log::trace!("Depth limit {} reached; truncating branch", self.max_depth);
            return;
        }

        match value {
            Value::String(s) => {
                let s = s.trim();
                if self.is_readable(s) {
                    out.push(s.to_string());
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, depth + 1, out);
                }
            }
            Value::Object(map) => {
                if RichTextNode::looks_like_text_block(value) {
                    let text = self.rich_text.serialize(&[RichTextNode::from_value(value)]);
                    if !text.is_empty() {
                        if text.chars().count() < self.max_leaf_length {
                            out.push(text);
                        }
                        return;
                    }
                }
                for (key, child) in map {
                    if !SKIPPED_KEYS.contains(&key.as_str()) {
                        self.walk(child, depth + 1, out);
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    fn is_readable(&self, s: &str) -> bool {
        !s.is_empty()
            && s.chars().count() < self.max_leaf_length
            && !looks_like_payload(s)
    }
}

/// Data URIs, opaque asset ids and host-qualified URLs.
fn looks_like_payload(s: &str) -> bool {
    static ASSET_ID: OnceLock<Regex> = OnceLock::new();
    static URL: OnceLock<Regex> = OnceLock::new();

    let asset_id = ASSET_ID.get_or_init(|| {
        Regex::new(r"^(?:image|file)-[A-Za-z0-9]+(?:-\d+x\d+)?-[A-Za-z0-9]+$").expect("static pattern")
    });
    let url = URL.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//[^\s/]+\S*$").expect("static pattern")
    });

    s.starts_with("data:") || asset_id.is_match(s) || url.is_match(s)
}
