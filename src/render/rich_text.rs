//! Markdown serialization of rich text bodies.

use super::asset::AssetResolver;
use super::RenderOptions;
use crate::model::{
    BlockStyle, CodeBlock, Inline, ListInfo, ListKind, RichTextNode, Span, Table, TextBlock,
};
use serde_json::Value;

/// Link targets treated as "no link".
const PLACEHOLDER_HREFS: &[&str] = &["#", "about:blank", "http://", "https://", "javascript:void(0)"];

/// Serializes rich text nodes to Markdown.
#[derive(Debug, Clone, Copy)]
pub struct RichTextSerializer<'a> {
    assets: AssetResolver<'a>,
    escape: bool,
}

impl<'a> RichTextSerializer<'a> {
    /// Create a serializer using the given options.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            assets: AssetResolver::new(&options.asset),
            escape: options.escape_special_chars,
        }
    }

    /// Serialize a list of nodes. Blocks are separated by a blank line;
    /// consecutive list items by a single newline.
    pub fn serialize(&self, nodes: &[RichTextNode]) -> String {
        let mut output = String::new();
        let mut counters: Vec<u32> = Vec::new();
        let mut prev_list = false;

        for node in nodes {
            let (text, is_list) = match node {
                RichTextNode::TextBlock(block) => match block.list {
                    Some(list) => (self.render_list_item(block, list, &mut counters), true),
                    None => {
                        counters.clear();
                        (self.render_text_block(block), false)
                    }
                },
                other => {
                    counters.clear();
                    (self.render_object(other), false)
                }
            };

            if text.trim().is_empty() {
                continue;
            }
            if !output.is_empty() {
                output.push_str(if prev_list && is_list { "\n" } else { "\n\n" });
            }
            output.push_str(&text);
            prev_list = is_list;
        }

        output
    }

    /// Parse and serialize a raw rich text field (array, single node or
    /// plain string).
    pub fn serialize_value(&self, value: &Value) -> String {
        self.serialize(&RichTextNode::parse_all(value))
    }

    /// Render an image; empty when the asset cannot be resolved.
    pub fn render_image(&self, source: &Value, alt: Option<&str>, caption: Option<&str>) -> String {
        let Some(url) = self.assets.resolve_image_url(source) else {
            return String::new();
        };
        let alt = alt.unwrap_or_default().replace(['[', ']'], "");
        let mut output = format!("![{}]({})", alt.trim(), url);
        if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
            output.push_str(&format!("\n_{}_", caption));
        }
        output
    }

    fn render_object(&self, node: &RichTextNode) -> String {
        match node {
            RichTextNode::TextBlock(block) => self.render_text_block(block),
            RichTextNode::Image(image) => {
                self.render_image(&image.source, image.alt.as_deref(), image.caption.as_deref())
            }
            RichTextNode::Table(table) => render_table(table),
            RichTextNode::CodeBlock(code) => render_code(code),
            RichTextNode::Unknown { kind, .. } => {
                log::debug!("Dropping unsupported rich text node {:?}", kind);
                String::new()
            }
        }
    }

    fn render_text_block(&self, block: &TextBlock) -> String {
        let parts: Vec<String> = self
            .render_segments(block)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => {
                    let text = text.trim();
                    (!text.is_empty()).then(|| style_text(block.style, text))
                }
                Segment::Block(text) if block.style == BlockStyle::Blockquote => {
                    Some(quote_lines(&text))
                }
                Segment::Block(text) => Some(text),
            })
            .collect();
        parts.join("\n\n")
    }

    fn render_list_item(&self, block: &TextBlock, list: ListInfo, counters: &mut Vec<u32>) -> String {
        let level = list.level.max(1) as usize;
        counters.truncate(level);
        counters.resize(level, 0);

        let marker = match list.kind {
            ListKind::Number => {
                counters[level - 1] += 1;
                format!("{}.", counters[level - 1])
            }
            ListKind::Bullet => {
                counters[level - 1] = 0;
                "-".to_string()
            }
        };

        let text = self
            .render_segments(block)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                Segment::Block(text) => Some(text),
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            return String::new();
        }

        let indent = "  ".repeat(level - 1);
        let continuation = format!("\n{}  ", indent);
        format!("{}{} {}", indent, marker, text.replace('\n', &continuation))
    }

    /// Split a block's children into runs of inline text and the block-level
    /// objects between them. Tables, code and captioned images cannot share a
    /// line with surrounding text.
    fn render_segments(&self, block: &TextBlock) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = String::new();

        for child in &block.children {
            match child {
                Inline::Span(span) => current.push_str(&self.render_span(span, block)),
                Inline::Object(node) => {
                    let rendered = self.render_object(node);
                    if !is_block_level(node) {
                        current.push_str(&rendered);
                        continue;
                    }
                    if rendered.trim().is_empty() {
                        continue;
                    }
                    segments.push(Segment::Text(std::mem::take(&mut current)));
                    segments.push(Segment::Block(rendered));
                }
            }
        }

        segments.push(Segment::Text(current));
        segments
    }

    fn render_span(&self, span: &Span, block: &TextBlock) -> String {
        let raw = span.text.as_str();
        let core = raw.trim();
        if span.marks.is_empty() || core.is_empty() {
            return self.escaped(raw);
        }

        let lead = &raw[..raw.len() - raw.trim_start().len()];
        let trail = &raw[raw.trim_end().len()..];

        let is_code = span.marks.iter().any(|m| m == "code");
        let mut text = if is_code {
            wrap_code(core)
        } else {
            self.escaped(core)
        };
        let mut href = None;

        for mark in &span.marks {
            match mark.as_str() {
                "code" => {}
                "strong" | "bold" => text = format!("**{}**", text),
                "em" | "italic" => text = format!("_{}_", text),
                "underline" => text = format!("<u>{}</u>", text),
                "strike-through" | "strike" | "strikethrough" => text = format!("~~{}~~", text),
                key => match block.mark_def(key) {
                    Some(def) if href.is_none() => {
                        match def.href.as_deref().and_then(link_target) {
                            Some(target) => href = Some(target),
                            None => log::debug!(
                                "Link mark {:?} has no usable target; rendering plain text",
                                key
                            ),
                        }
                    }
                    Some(_) => {}
                    None => log::trace!("Ignoring unknown mark {:?}", key),
                },
            }
        }

        if let Some(target) = href {
            text = format!("[{}]({})", text, target);
        }

        format!("{}{}{}", lead, text, trail)
    }

    fn escaped(&self, text: &str) -> String {
        if self.escape {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Render a pipe table. Row 0 is always the header; a missing or empty
/// header yields an empty string.
pub fn render_table(table: &Table) -> String {
    let columns = table.column_count();
    let Some(header) = table.header().filter(|_| columns > 0) else {
        return String::new();
    };

    let row_line = |cells: &[String]| {
        let mut line = String::from("|");
        for i in 0..columns {
            let cell = cells.get(i).map(|c| escape_cell(c)).unwrap_or_default();
            line.push(' ');
            line.push_str(&cell);
            line.push_str(" |");
        }
        line
    };

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(row_line(&header.cells));
    lines.push(format!("|{}", " --- |".repeat(columns)));
    for row in table.body() {
        lines.push(row_line(&row.cells));
    }
    lines.join("\n")
}

/// Render a fenced code block. The fence grows past any backtick run inside
/// the code.
pub fn render_code(code: &CodeBlock) -> String {
    let body = code.code.trim_end_matches(['\n', '\r']);
    if body.trim().is_empty() {
        return String::new();
    }

    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let language = code.language.as_deref().map(str::trim).unwrap_or_default();

    format!("{}{}\n{}\n{}", fence, language, body, fence)
}

/// Rendered children of a text block.
enum Segment {
    Text(String),
    Block(String),
}

fn is_block_level(node: &RichTextNode) -> bool {
    match node {
        RichTextNode::Table(_) | RichTextNode::CodeBlock(_) | RichTextNode::TextBlock(_) => true,
        RichTextNode::Image(image) => image
            .caption
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty()),
        RichTextNode::Unknown { .. } => false,
    }
}

fn style_text(style: BlockStyle, text: &str) -> String {
    match style {
        BlockStyle::Heading(level) => {
            format!("{} {}", "#".repeat(level as usize), text.replace('\n', " "))
        }
        BlockStyle::Blockquote => quote_lines(text),
        BlockStyle::Normal => text.to_string(),
    }
}

fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {}", line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_cell(cell: &str) -> String {
    cell.trim()
        .replace("\r\n", " ")
        .replace('\n', " ")
        .replace('|', "\\|")
}

fn wrap_code(text: &str) -> String {
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

/// The trimmed target, or `None` for an empty or placeholder href.
pub(crate) fn link_target(href: &str) -> Option<&str> {
    let href = href.trim();
    (!is_placeholder(href)).then_some(href)
}

pub(crate) fn is_placeholder(href: &str) -> bool {
    href.is_empty() || PLACEHOLDER_HREFS.contains(&href)
}

/// Escape brackets so text can sit inside a link label.
pub(crate) fn escape_label(text: &str) -> String {
    text.trim().replace('[', "\\[").replace(']', "\\]")
}

/// Escape characters that could be misread as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '|') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
