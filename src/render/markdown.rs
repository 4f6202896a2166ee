//! Markdown rendering for content documents.
//!
//! Assembly order is fixed: title, summary, metadata, separator, body,
//! blocks, listing index. The joined result then goes through the cleanup
//! pipeline and the link normalizer and ends with a single newline.

use crate::model::{Document, ListingEntry, Metadata};
use chrono::{DateTime, NaiveDate};

use super::blocks::BlockSerializer;
use super::links::normalize_links;
use super::rich_text::{escape_label, RichTextSerializer};
use super::{CleanupPipeline, RenderOptions, RenderResult, RenderStats};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    MarkdownRenderer::new(options.clone()).render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: RenderStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> String {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with rendering statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> RenderResult {
        let content = self.render_internal(doc);
        self.stats.count_text(&content);
        RenderResult::new(content, self.stats)
    }

    fn render_internal(&mut self, doc: &Document) -> String {
        let header = self.render_header(doc);
        let content = self.render_content(doc);

        let mut sections = header;
        if !sections.is_empty() && !content.is_empty() {
            sections.push("---".to_string());
        }
        sections.extend(content);

        let cleaned = CleanupPipeline::new(self.options.cleanup.clone()).process(&sections.join("\n\n"));
        let mut output = normalize_links(&cleaned, &self.options.site_url);
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }

    fn render_header(&self, doc: &Document) -> Vec<String> {
        let mut parts = Vec::new();

        if let Some(title) = doc.title.as_deref().filter(|t| !t.is_empty()) {
            parts.push(format!("# {}", title.replace('\n', " ")));
        }

        if let Some(summary) = doc.summary.as_deref().filter(|s| !s.is_empty()) {
            let quoted = summary
                .lines()
                .map(|line| format!("> {}", line.trim()).trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n");
            parts.push(quoted);
        }

        let metadata = render_metadata(&doc.metadata);
        if !metadata.is_empty() {
            parts.push(metadata);
        }

        parts
    }

    fn render_content(&mut self, doc: &Document) -> Vec<String> {
        let mut parts = Vec::new();

        self.stats.body_node_count += doc.body.len() as u32;
        let body = RichTextSerializer::new(&self.options).serialize(&doc.body);
        if !body.trim().is_empty() {
            parts.push(body);
        }

        let serializer = BlockSerializer::new(&self.options);
        for block in &doc.blocks {
            let rendered = serializer.serialize(block);
            let kept = !rendered.trim().is_empty();
            self.stats.add_block(block.is_unknown(), kept);
            if kept {
                parts.push(rendered);
            } else {
                log::trace!("Dropping empty block {:?}", block.block_type);
            }
        }

        let listing = self.render_listing(doc);
        if !listing.is_empty() {
            parts.push(listing);
        }

        parts
    }

    fn render_listing(&mut self, doc: &Document) -> String {
        let items: Vec<String> = doc
            .child_items
            .iter()
            .filter_map(|entry| self.render_listing_entry(entry))
            .collect();

        self.stats.listing_entries += items.len() as u32;
        if items.is_empty() {
            return String::new();
        }

        let heading = doc
            .listing_heading
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.options.listing_heading);
        format!("## {}\n\n{}", heading, items.join("\n"))
    }

    fn render_listing_entry(&self, entry: &ListingEntry) -> Option<String> {
        let slug = entry.slug.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let href = listing_href(&self.options.listing_base_path, slug);
        let title = entry
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(slug);

        let mut line = format!("- [{}]({})", escape_label(title), href);
        if let Some(date) = entry.published_at.as_deref() {
            line.push_str(&format!(" ({})", format_date(date)));
        }
        if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(" — ");
            line.push_str(&description.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        Some(line)
    }
}

fn render_metadata(metadata: &Metadata) -> String {
    let mut lines = Vec::new();

    if !metadata.authors.is_empty() {
        lines.push(format!("**Author:** {}", metadata.authors.join(", ")));
    }

    let published = metadata.published_at.as_deref().map(format_date);
    if let Some(published) = &published {
        lines.push(format!("**Published:** {}", published));
    }
    if let Some(updated) = metadata.updated_at.as_deref().map(format_date) {
        if published.as_ref() != Some(&updated) {
            lines.push(format!("**Updated:** {}", updated));
        }
    }

    if !metadata.topics.is_empty() {
        lines.push(format!("**Topics:** {}", metadata.topics.join(", ")));
    }

    lines.join("  \n")
}

fn listing_href(base_path: &str, slug: &str) -> String {
    if slug.starts_with('/') || slug.contains("://") {
        return slug.to_string();
    }
    format!(
        "{}/{}",
        base_path.trim_end_matches('/'),
        slug.trim_start_matches('/')
    )
}

/// Format an RFC 3339 timestamp or `YYYY-MM-DD` date as `Month D, YYYY`.
///
/// Anything else is returned trimmed but otherwise unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime.format("%B %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%B %-d, %Y").to_string();
    }
    raw.to_string()
}
