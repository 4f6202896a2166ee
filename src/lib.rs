//! # uncms
//!
//! Structured content document to Markdown conversion.
//!
//! This library takes a document already fetched from a headless content
//! store (a JSON tree of rich text, layout blocks and asset references) and
//! produces a clean Markdown rendition suitable for LLM ingestion or a
//! `text/markdown` endpoint.
//!
//! ## Quick Start
//!
//! ```no_run
//! use uncms::{parse_file, render};
//!
//! fn main() -> uncms::Result<()> {
//!     let doc = parse_file("page.json")?;
//!
//!     let options = render::RenderOptions::default()
//!         .with_site_url("https://example.com")
//!         .with_project("abc123", "production");
//!     let markdown = render::to_markdown(&doc, &options);
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Rich text**: headings, lists, marks, links, inline images, tables, code
//! - **Layout blocks**: dedicated renderers for common kinds, generic text
//!   extraction for everything else
//! - **Asset resolution**: opaque image ids mapped to CDN URLs
//! - **Link normalization**: root-relative links made absolute
//! - **Cleanup pipeline**: line endings, Unicode normalization, blank lines
//!
//! Rendering never fails. Errors only come from reading input and from
//! invalid configuration.

pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Block, BlockKind, Document, ListingEntry, Metadata, RichTextNode, Table};
pub use render::{AssetConfig, CleanupOptions, RenderOptions, RenderResult, RenderStats};

use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Parse a JSON document from a string.
///
/// # Example
///
/// ```
/// let doc = uncms::parse_str(r#"{ "title": "Hello" }"#).unwrap();
/// assert_eq!(doc.title.as_deref(), Some("Hello"));
/// ```
pub fn parse_str(json: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(json)?;
    Document::from_value(&value)
}

/// Parse a JSON document from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let value: Value = serde_json::from_slice(data)?;
    Document::from_value(&value)
}

/// Parse a JSON document from a reader.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
///
/// let file = File::open("page.json").unwrap();
/// let doc = uncms::parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let value: Value = serde_json::from_reader(reader)?;
    Document::from_value(&value)
}

/// Parse a JSON document file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    log::debug!("Reading document from {}", path.display());
    let data = std::fs::read(path)?;
    parse_bytes(&data)
}

/// Convert a JSON document string to Markdown with default options.
///
/// # Example
///
/// ```
/// let markdown = uncms::to_markdown(r#"{ "title": "T" }"#).unwrap();
/// assert_eq!(markdown, "# T\n");
/// ```
pub fn to_markdown(json: &str) -> Result<String> {
    to_markdown_with_options(json, &RenderOptions::default())
}

/// Convert a JSON document string to Markdown with custom options.
///
/// # Example
///
/// ```
/// use uncms::{to_markdown_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_site_url("https://site");
/// let json = r#"{ "body": [{ "_type": "block", "markDefs": [{ "_key": "l", "_type": "link", "href": "/docs" }],
///     "children": [{ "_type": "span", "text": "Docs", "marks": ["l"] }] }] }"#;
/// let markdown = to_markdown_with_options(json, &options).unwrap();
/// assert_eq!(markdown, "[Docs](https://site/docs)\n");
/// ```
pub fn to_markdown_with_options(json: &str, options: &RenderOptions) -> Result<String> {
    options.validate()?;
    let doc = parse_str(json)?;
    Ok(render::to_markdown(&doc, options))
}

/// Builder for parsing and converting content documents.
///
/// # Example
///
/// ```no_run
/// use uncms::Uncms;
///
/// let markdown = Uncms::new()
///     .with_site_url("https://example.com")
///     .with_project("abc123", "production")
///     .parse_file("page.json")?
///     .to_markdown();
/// # Ok::<(), uncms::Error>(())
/// ```
pub struct Uncms {
    render_options: RenderOptions,
}

impl Uncms {
    /// Create a new Uncms builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
        }
    }

    /// Set the site base URL for root-relative links.
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_site_url(url);
        self
    }

    /// Set the asset project and dataset.
    pub fn with_project(mut self, project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_project(project_id, dataset);
        self
    }

    /// Set the asset CDN host.
    pub fn with_cdn_host(mut self, host: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_cdn_host(host);
        self
    }

    /// Set the generic extraction limits.
    pub fn with_limits(mut self, max_leaf_length: usize, max_depth: usize) -> Self {
        self.render_options = self
            .render_options
            .with_max_leaf_length(max_leaf_length)
            .with_max_depth(max_depth);
        self
    }

    /// Set the listing heading and link base path.
    pub fn with_listing(mut self, heading: impl Into<String>, base_path: impl Into<String>) -> Self {
        self.render_options = self
            .render_options
            .with_listing_heading(heading)
            .with_listing_base_path(base_path);
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.render_options = self.render_options.with_cleanup(cleanup);
        self
    }

    /// Replace all render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Parse a JSON string and return a result wrapper.
    pub fn parse_str(self, json: &str) -> Result<UncmsResult> {
        self.finish(parse_str(json)?)
    }

    /// Parse JSON bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UncmsResult> {
        self.finish(parse_bytes(data)?)
    }

    /// Parse a JSON file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<UncmsResult> {
        self.finish(parse_file(path)?)
    }

    /// Wrap an already parsed value.
    pub fn from_value(self, value: &Value) -> Result<UncmsResult> {
        self.finish(Document::from_value(value)?)
    }

    fn finish(self, document: Document) -> Result<UncmsResult> {
        self.render_options.validate()?;
        Ok(UncmsResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Uncms {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document together with the options to render it.
pub struct UncmsResult {
    document: Document,
    render_options: RenderOptions,
}

impl UncmsResult {
    /// Get the parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to Markdown with rendering statistics.
    pub fn to_markdown_with_stats(&self) -> RenderResult {
        render::to_markdown_with_stats(&self.document, &self.render_options)
    }

    /// Consume and return the document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_str_invalid_json() {
        let err = parse_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_parse_str_not_an_object() {
        let err = parse_str("\"just a string\"").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_parse_reader() {
        let doc = parse_reader(&br#"{ "name": "From reader" }"#[..]).unwrap();
        assert_eq!(doc.title.as_deref(), Some("From reader"));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_to_markdown_validates_options() {
        let options = RenderOptions::default().with_max_depth(0);
        let err = to_markdown_with_options("{}", &options).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_builder() {
        let result = Uncms::new()
            .with_site_url("https://site")
            .with_listing("Articles", "/blog")
            .parse_str(r#"{ "title": "Blog", "childItems": [{ "title": "A", "slug": "a" }] }"#)
            .unwrap();

        assert!(result.document().is_listing());
        assert_eq!(
            result.to_markdown(),
            "# Blog\n\n---\n\n## Articles\n\n- [A](https://site/blog/a)\n"
        );
        assert_eq!(result.to_markdown_with_stats().stats.listing_entries, 1);
    }

    #[test]
    fn test_builder_rejects_bad_site_url() {
        let result = Uncms::new().with_site_url("ftp://site").parse_str("{}");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
