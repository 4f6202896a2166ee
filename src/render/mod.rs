//! Rendering module for converting documents to Markdown.

mod asset;
mod blocks;
mod cleanup;
mod extract;
mod links;
mod markdown;
mod options;
mod result;
mod rich_text;

pub use asset::{AssetId, AssetResolver};
pub use blocks::BlockSerializer;
pub use cleanup::{CleanupOptions, CleanupPipeline};
pub use extract::TextExtractor;
pub use links::normalize_links;
pub use markdown::{format_date, to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{AssetConfig, RenderOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEAF_LENGTH};
pub use result::{RenderResult, RenderStats};
pub use rich_text::{render_code, render_table, RichTextSerializer};
