//! Layout block types.
//!
//! Blocks are an open set: each known `blockType` decodes into a typed
//! struct, anything else (or a known kind whose fields fail to decode) is kept
//! as [`BlockKind::Unknown`] and rendered by generic text extraction.

use super::value::first_str;
use super::CodeBlock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A layout block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block key (`key` or `_key`)
    pub key: Option<String>,

    /// Raw kind tag (`blockType`, falling back to `_type`)
    pub block_type: String,

    /// Decoded content
    pub kind: BlockKind,
}

/// Decoded block content, one variant per registered block kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Page hero
    Hero(HeroBlock),
    /// Call to action
    Cta(CtaBlock),
    /// FAQ accordion
    Faq(FaqBlock),
    /// Feature cards
    FeatureCards(CardsBlock),
    /// Link cards
    LinkCards(CardsBlock),
    /// Newsletter signup
    Newsletter(NewsletterBlock),
    /// Free rich text section
    RichText(RichTextBlock),
    /// Pull quote or testimonial
    Quote(QuoteBlock),
    /// Standalone image
    Image(ImageBlock),
    /// Standalone code listing
    Code(CodeBlock),
    /// Container of nested blocks
    Section(SectionBlock),
    /// Unregistered kind, kept raw
    Unknown(Value),
}

impl Block {
    /// Build a block from a raw value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let block_type = first_str(value, &["blockType", "_type"])
            .unwrap_or_default()
            .to_string();
        let key = first_str(value, &["key", "_key", "id"]).map(str::to_string);

        let kind = match block_type.as_str() {
            "hero" | "heroBlock" => decode(value).map(BlockKind::Hero),
            "cta" | "callToAction" => decode(value).map(BlockKind::Cta),
            "faq" | "faqAccordion" | "accordion" => decode(value).map(BlockKind::Faq),
            "featureCards" | "features" | "featureGrid" => {
                decode(value).map(BlockKind::FeatureCards)
            }
            "linkCards" | "cardGrid" => decode(value).map(BlockKind::LinkCards),
            "newsletter" | "newsletterSubscribe" => decode(value).map(BlockKind::Newsletter),
            "richText" | "content" | "textBlock" => decode(value).map(BlockKind::RichText),
            "quote" | "testimonial" => decode(value).map(BlockKind::Quote),
            "image" | "imageBlock" => decode::<ImageBlock>(value).map(|mut image| {
                image.raw = value.clone();
                BlockKind::Image(image)
            }),
            "code" | "codeBlock" => decode(value).map(BlockKind::Code),
            "section" | "columns" => decode(value).map(BlockKind::Section),
            _ => None,
        };

        Self {
            key,
            kind: kind.unwrap_or_else(|| BlockKind::Unknown(value.clone())),
            block_type,
        }
    }

    /// Whether this block has no registered renderer.
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, BlockKind::Unknown(_))
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Block::from_value(&value))
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!(
                "Block {:?} did not decode, using generic extraction: {}",
                first_str(value, &["blockType", "_type"]),
                e
            );
            None
        }
    }
}

/// A labelled link (button, action, card target).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkItem {
    /// Visible label
    #[serde(alias = "title", alias = "text")]
    pub label: Option<String>,

    /// Target URL
    #[serde(alias = "url")]
    pub href: Option<String>,

    /// Nested link object used by some schemas
    pub link: Option<Box<LinkItem>>,
}

impl LinkItem {
    /// Label, falling back to the nested link.
    pub fn label(&self) -> Option<&str> {
        non_blank(self.label.as_deref())
            .or_else(|| self.link.as_deref().and_then(LinkItem::label))
    }

    /// Target, falling back to the nested link.
    pub fn href(&self) -> Option<&str> {
        non_blank(self.href.as_deref())
            .or_else(|| self.link.as_deref().and_then(LinkItem::href))
    }
}

/// Page hero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroBlock {
    /// Headline
    #[serde(alias = "heading", alias = "headline")]
    pub title: Option<String>,

    /// Subtitle, plain or rich text
    #[serde(alias = "subheading", alias = "tagline")]
    pub subtitle: Option<Value>,

    /// Body, plain or rich text
    #[serde(alias = "text", alias = "body", alias = "richText")]
    pub description: Option<Value>,

    /// Hero image
    pub image: Option<Value>,

    /// Buttons
    #[serde(
        alias = "links",
        alias = "buttons",
        alias = "ctas",
        deserialize_with = "null_as_empty"
    )]
    pub actions: Vec<LinkItem>,
}

/// Call to action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    /// Heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Body, plain or rich text
    #[serde(alias = "text", alias = "body", alias = "richText")]
    pub description: Option<Value>,

    /// Buttons
    #[serde(alias = "links", alias = "buttons", deserialize_with = "null_as_empty")]
    pub actions: Vec<LinkItem>,

    /// Single button
    pub link: Option<LinkItem>,
}

/// FAQ accordion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FaqBlock {
    /// Heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Intro, plain or rich text
    #[serde(alias = "intro")]
    pub description: Option<Value>,

    /// Questions
    #[serde(alias = "faqs", alias = "questions", deserialize_with = "null_as_empty")]
    pub items: Vec<FaqItem>,
}

/// One FAQ entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    /// Question
    #[serde(alias = "title")]
    pub question: Option<String>,

    /// Answer, plain or rich text
    #[serde(alias = "content", alias = "body")]
    pub answer: Option<Value>,
}

/// Feature or link cards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardsBlock {
    /// Heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Intro, plain or rich text
    #[serde(alias = "intro")]
    pub description: Option<Value>,

    /// Cards
    #[serde(
        alias = "cards",
        alias = "features",
        alias = "links",
        deserialize_with = "null_as_empty"
    )]
    pub items: Vec<CardItem>,
}

/// One card.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardItem {
    /// Card title
    #[serde(alias = "heading", alias = "label")]
    pub title: Option<String>,

    /// Card body, plain or rich text
    #[serde(alias = "text", alias = "body")]
    pub description: Option<Value>,

    /// Card target
    #[serde(alias = "url")]
    pub href: Option<String>,

    /// Nested link object used by some schemas
    pub link: Option<LinkItem>,
}

impl CardItem {
    /// Card target, falling back to the nested link.
    pub fn target(&self) -> Option<&str> {
        non_blank(self.href.as_deref()).or_else(|| self.link.as_ref().and_then(LinkItem::href))
    }
}

/// Newsletter signup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsletterBlock {
    /// Heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Body, plain or rich text
    #[serde(alias = "text", alias = "body")]
    pub description: Option<Value>,
}

/// Free rich text section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RichTextBlock {
    /// Optional heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Body, plain or rich text
    #[serde(alias = "body", alias = "richText", alias = "text")]
    pub content: Option<Value>,
}

/// Pull quote or testimonial.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuoteBlock {
    /// Quoted text, plain or rich
    #[serde(alias = "text")]
    pub quote: Option<Value>,

    /// Who said it
    #[serde(alias = "author", alias = "name")]
    pub attribution: Option<String>,

    /// Attribution role or company
    #[serde(alias = "company")]
    pub role: Option<String>,
}

/// Standalone image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    /// Image reference; when absent the block itself is the reference
    pub image: Option<Value>,

    /// Alternative text
    #[serde(alias = "altText")]
    pub alt: Option<String>,

    /// Caption
    pub caption: Option<String>,

    /// The raw block
    #[serde(skip)]
    pub raw: Value,
}

impl ImageBlock {
    /// The value holding the asset reference.
    pub fn source(&self) -> &Value {
        self.image.as_ref().unwrap_or(&self.raw)
    }

    /// Alt text from the block, then from the image object.
    pub fn alt_text(&self) -> Option<&str> {
        non_blank(self.alt.as_deref())
            .or_else(|| self.image.as_ref().and_then(|i| first_str(i, &["alt", "altText"])))
    }

    /// Caption from the block, then from the image object.
    pub fn caption_text(&self) -> Option<&str> {
        non_blank(self.caption.as_deref())
            .or_else(|| self.image.as_ref().and_then(|i| first_str(i, &["caption"])))
    }
}

/// Container of nested blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SectionBlock {
    /// Heading
    #[serde(alias = "heading")]
    pub title: Option<String>,

    /// Intro, plain or rich text
    #[serde(alias = "intro")]
    pub description: Option<Value>,

    /// Nested blocks
    #[serde(alias = "columns", alias = "items", deserialize_with = "null_as_empty")]
    pub blocks: Vec<Block>,
}

/// Treat an explicit `null` list like a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
