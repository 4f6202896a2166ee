//! Markdown serialization of layout blocks.
//!
//! Each registered block kind has a dedicated renderer pulling a few
//! well-known fields. Section-style blocks end with a `---` rule. Unknown
//! kinds go to [`TextExtractor`] and its output is returned verbatim.

use super::extract::TextExtractor;
use super::rich_text::{escape_label, link_target, render_code, RichTextSerializer};
use super::RenderOptions;
use crate::model::{
    Block, BlockKind, CardsBlock, CtaBlock, FaqBlock, HeroBlock, ImageBlock, LinkItem,
    NewsletterBlock, QuoteBlock, RichTextBlock, SectionBlock,
};
use serde_json::Value;

/// Serializes layout blocks to Markdown.
#[derive(Debug, Clone, Copy)]
pub struct BlockSerializer<'a> {
    rich_text: RichTextSerializer<'a>,
    extractor: TextExtractor<'a>,
    max_depth: usize,
}

impl<'a> BlockSerializer<'a> {
    /// Create a block serializer using the given options.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            rich_text: RichTextSerializer::new(options),
            extractor: TextExtractor::new(options),
            max_depth: options.max_depth,
        }
    }

    /// Serialize one block. May return an empty or whitespace-only string.
    pub fn serialize(&self, block: &Block) -> String {
        self.serialize_at(block, 0)
    }

    fn serialize_at(&self, block: &Block, depth: usize) -> String {
        match &block.kind {
            BlockKind::Hero(hero) => section(self.render_hero(hero)),
            BlockKind::Cta(cta) => section(self.render_cta(cta)),
            BlockKind::Faq(faq) => section(self.render_faq(faq)),
            BlockKind::FeatureCards(cards) => section(self.render_feature_cards(cards)),
            BlockKind::LinkCards(cards) => section(self.render_link_cards(cards)),
            BlockKind::Newsletter(newsletter) => section(self.render_newsletter(newsletter)),
            BlockKind::Section(container) => section(self.render_section(container, depth)),
            BlockKind::RichText(rich) => self.render_rich_text(rich),
            BlockKind::Quote(quote) => self.render_quote(quote),
            BlockKind::Image(image) => self.render_image(image),
            BlockKind::Code(code) => render_code(code),
            BlockKind::Unknown(raw) => {
                log::debug!(
                    "No renderer for block {:?} ({:?}); using generic extraction",
                    block.block_type,
                    block.key
                );
                self.extractor.serialize(raw)
            }
        }
    }

    fn render_hero(&self, hero: &HeroBlock) -> Vec<String> {
        vec![
            heading(hero.title.as_deref(), 2),
            self.text(hero.subtitle.as_ref()),
            self.text(hero.description.as_ref()),
            hero.image
                .as_ref()
                .map(|image| self.rich_text.render_image(image, hero.title.as_deref(), None))
                .unwrap_or_default(),
            link_list(&hero.actions),
        ]
    }

    fn render_cta(&self, cta: &CtaBlock) -> Vec<String> {
        let actions: Vec<LinkItem> = cta
            .actions
            .iter()
            .chain(cta.link.as_ref())
            .cloned()
            .collect();
        vec![
            heading(cta.title.as_deref(), 2),
            self.text(cta.description.as_ref()),
            link_list(&actions),
        ]
    }

    fn render_faq(&self, faq: &FaqBlock) -> Vec<String> {
        let mut parts = vec![
            heading(faq.title.as_deref(), 2),
            self.text(faq.description.as_ref()),
        ];
        for item in &faq.items {
            parts.push(heading(item.question.as_deref(), 3));
            parts.push(self.text(item.answer.as_ref()));
        }
        parts
    }

    fn render_feature_cards(&self, cards: &CardsBlock) -> Vec<String> {
        let items = cards
            .items
            .iter()
            .filter_map(|card| {
                let title = card.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
                let description = inline(&self.text(card.description.as_ref()));
                let title = match (title, card.target().and_then(link_target)) {
                    (Some(title), Some(href)) => {
                        Some(format!("**[{}]({})**", escape_label(title), href))
                    }
                    (Some(title), None) => Some(format!("**{}**", title)),
                    (None, _) => None,
                };
                match (title, description.is_empty()) {
                    (Some(title), false) => Some(format!("- {}: {}", title, description)),
                    (Some(title), true) => Some(format!("- {}", title)),
                    (None, false) => Some(format!("- {}", description)),
                    (None, true) => None,
                }
            })
            .collect::<Vec<_>>();

        vec![
            heading(cards.title.as_deref(), 2),
            self.text(cards.description.as_ref()),
            items.join("\n"),
        ]
    }

    fn render_link_cards(&self, cards: &CardsBlock) -> Vec<String> {
        let items = cards
            .items
            .iter()
            .filter_map(|card| {
                let target = card.target().and_then(link_target);
                let label = card
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .or(target)?;
                let mut line = match target {
                    Some(href) => format!("- [{}]({})", escape_label(label), href),
                    None => format!("- {}", label),
                };
                let description = inline(&self.text(card.description.as_ref()));
                if !description.is_empty() {
                    line.push_str(" — ");
                    line.push_str(&description);
                }
                Some(line)
            })
            .collect::<Vec<_>>();

        vec![
            heading(cards.title.as_deref(), 2),
            self.text(cards.description.as_ref()),
            items.join("\n"),
        ]
    }

    fn render_newsletter(&self, newsletter: &NewsletterBlock) -> Vec<String> {
        vec![
            heading(newsletter.title.as_deref(), 2),
            self.text(newsletter.description.as_ref()),
        ]
    }

    fn render_section(&self, container: &SectionBlock, depth: usize) -> Vec<String> {
        let mut parts = vec![
            heading(container.title.as_deref(), 2),
            self.text(container.description.as_ref()),
        ];
        if depth < self.max_depth {
            parts.extend(
                container
                    .blocks
                    .iter()
                    .map(|child| self.serialize_at(child, depth + 1)),
            );
        } else {
            log::trace!("Nested section depth limit reached; dropping children");
        }
        parts
    }

    fn render_rich_text(&self, rich: &RichTextBlock) -> String {
        join_parts(vec![
            heading(rich.title.as_deref(), 2),
            self.text(rich.content.as_ref()),
        ])
    }

    fn render_quote(&self, quote: &QuoteBlock) -> String {
        let text = self.text(quote.quote.as_ref());
        if text.is_empty() {
            return String::new();
        }
        let mut lines: Vec<String> = text
            .lines()
            .map(|line| format!("> {}", line).trim_end().to_string())
            .collect();

        let attribution = [quote.attribution.as_deref(), quote.role.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if !attribution.is_empty() {
            lines.push(">".to_string());
            lines.push(format!("> — {}", attribution.join(", ")));
        }
        lines.join("\n")
    }

    fn render_image(&self, image: &ImageBlock) -> String {
        self.rich_text
            .render_image(image.source(), image.alt_text(), image.caption_text())
    }

    fn text(&self, value: Option<&Value>) -> String {
        value
            .map(|v| self.rich_text.serialize_value(v))
            .unwrap_or_default()
    }
}

fn heading(text: Option<&str>, level: usize) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => format!("{} {}", "#".repeat(level), text.replace('\n', " ")),
        None => String::new(),
    }
}

fn link_list(links: &[LinkItem]) -> String {
    links
        .iter()
        .filter_map(|link| match (link.label(), link.href().and_then(link_target)) {
            (Some(label), Some(href)) => Some(format!("- [{}]({})", escape_label(label), href)),
            (Some(label), None) => Some(format!("- {}", label.trim())),
            (None, Some(href)) => Some(format!("- [{}]({})", escape_label(href), href)),
            (None, None) => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten multi-line text for use inside a list item.
fn inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_parts(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Join parts and close with a horizontal rule, unless nothing rendered.
fn section(parts: Vec<String>) -> String {
    let body = join_parts(parts);
    if body.is_empty() {
        body
    } else {
        format!("{}\n\n---", body)
    }
}
