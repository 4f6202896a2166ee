//! Document model types for structured content.
//!
//! The model is built once from a `serde_json::Value` at the input boundary.
//! Rich text and layout blocks are closed enums over the known kinds, each with
//! an `Unknown` variant that keeps the raw value for generic extraction.

mod block;
mod document;
mod rich_text;
mod table;
pub(crate) mod value;

pub use block::{
    Block, BlockKind, CardItem, CardsBlock, CtaBlock, FaqBlock, FaqItem, HeroBlock, ImageBlock,
    LinkItem, NewsletterBlock, QuoteBlock, RichTextBlock, SectionBlock,
};
pub use document::{Document, ListingEntry, Metadata};
pub use rich_text::{
    BlockStyle, CodeBlock, ImageNode, Inline, ListInfo, ListKind, MarkDefinition, RichTextNode,
    Span, TextBlock,
};
pub use table::{Table, TableRow};
