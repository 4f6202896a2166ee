//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while rendering a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of body rich text nodes
    pub body_node_count: u32,

    /// Blocks that produced output
    pub rendered_blocks: u32,

    /// Blocks without a dedicated renderer, routed to generic extraction
    pub fallback_blocks: u32,

    /// Blocks whose output was whitespace-only and therefore omitted
    pub dropped_blocks: u32,

    /// Listing entries written to the index
    pub listing_entries: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one block and whether it produced output.
    pub fn add_block(&mut self, fallback: bool, rendered: bool) {
        if fallback {
            self.fallback_blocks += 1;
        }
        if rendered {
            self.rendered_blocks += 1;
        } else {
            self.dropped_blocks += 1;
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
