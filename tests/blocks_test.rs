//! Integration tests for layout block rendering.

use serde_json::json;
use uncms::render::{to_markdown, BlockSerializer};
use uncms::{Block, BlockKind, Document, RenderOptions};

fn render_block(value: serde_json::Value) -> String {
    let options = RenderOptions::default();
    BlockSerializer::new(&options).serialize(&Block::from_value(&value))
}

// ============================================================================
// Registry dispatch
// ============================================================================

#[test]
fn test_registry_aliases() {
    let cases = [
        (json!({ "blockType": "heroBlock" }), "hero"),
        (json!({ "blockType": "callToAction" }), "cta"),
        (json!({ "blockType": "accordion" }), "faq"),
        (json!({ "blockType": "featureGrid" }), "featureCards"),
        (json!({ "blockType": "cardGrid" }), "linkCards"),
        (json!({ "blockType": "newsletterSubscribe" }), "newsletter"),
        (json!({ "_type": "textBlock" }), "richText"),
        (json!({ "_type": "testimonial" }), "quote"),
        (json!({ "_type": "imageBlock" }), "image"),
        (json!({ "_type": "codeBlock", "code": "x" }), "code"),
        (json!({ "_type": "columns" }), "section"),
    ];

    for (value, expected) in cases {
        let block = Block::from_value(&value);
        let kind = match &block.kind {
            BlockKind::Hero(_) => "hero",
            BlockKind::Cta(_) => "cta",
            BlockKind::Faq(_) => "faq",
            BlockKind::FeatureCards(_) => "featureCards",
            BlockKind::LinkCards(_) => "linkCards",
            BlockKind::Newsletter(_) => "newsletter",
            BlockKind::RichText(_) => "richText",
            BlockKind::Quote(_) => "quote",
            BlockKind::Image(_) => "image",
            BlockKind::Code(_) => "code",
            BlockKind::Section(_) => "section",
            BlockKind::Unknown(_) => "unknown",
        };
        assert_eq!(kind, expected, "for {}", value);
    }
}

#[test]
fn test_block_type_prefers_block_type_field() {
    let block = Block::from_value(&json!({ "blockType": "faq", "_type": "layoutBlock" }));
    assert_eq!(block.block_type, "faq");
    assert!(matches!(block.kind, BlockKind::Faq(_)));
}

#[test]
fn test_undecodable_fields_fall_back_to_generic() {
    // `items` must be an array for a FAQ; a string cannot decode
    let block = Block::from_value(&json!({
        "blockType": "faq",
        "title": "Questions",
        "items": "not a list"
    }));
    assert!(block.is_unknown());
    assert_eq!(
        render_block(json!({ "blockType": "faq", "title": "Questions", "items": "not a list" })),
        "Questions\n\nnot a list"
    );
}

#[test]
fn test_null_lists_render_like_missing_ones() {
    assert_eq!(
        render_block(json!({ "blockType": "hero", "title": "Welcome", "buttons": null })),
        "## Welcome\n\n---"
    );
    assert_eq!(
        render_block(json!({ "blockType": "faq", "title": "Questions", "faqs": null })),
        "## Questions\n\n---"
    );
    assert_eq!(
        render_block(json!({ "blockType": "section", "title": "Empty", "blocks": null })),
        "## Empty\n\n---"
    );
}

#[test]
fn test_placeholder_card_links_render_as_text() {
    let out = render_block(json!({
        "blockType": "linkCards",
        "items": [
            { "title": "Coming soon", "href": "javascript:void(0)", "description": "Later" },
            { "title": "Live", "link": { "url": "/live" } },
            { "href": "#" }
        ]
    }));
    assert_eq!(out, "- Coming soon — Later\n- [Live](/live)\n\n---");
}

#[test]
fn test_card_labels_with_brackets_stay_links() {
    let options = RenderOptions::default().with_site_url("https://example.com");
    let doc = Document::from_value(&json!({
        "blocks": [{
            "blockType": "linkCards",
            "items": [{ "title": "Changelog [2024]", "href": "/changes" }]
        }]
    }))
    .unwrap();
    assert_eq!(
        to_markdown(&doc, &options),
        "- [Changelog \\[2024\\]](https://example.com/changes)\n\n---\n"
    );
}

// ============================================================================
// Whole pages
// ============================================================================

#[test]
fn test_landing_page() {
    let options = RenderOptions::default()
        .with_site_url("https://example.com")
        .with_project("proj", "production");
    let doc = Document::from_value(&json!({
        "_type": "page",
        "title": "Acme",
        "pageBuilder": [
            {
                "blockType": "hero",
                "_key": "h",
                "heading": "Ship it",
                "tagline": [{
                    "_type": "block",
                    "children": [{ "_type": "span", "text": "Faster than ever", "marks": ["em"] }]
                }],
                "image": { "asset": { "_ref": "image-hero1-1200x630-webp" } },
                "buttons": [{ "text": "Start", "link": { "url": "/start" } }]
            },
            {
                "blockType": "linkCards",
                "_key": "l",
                "title": "Docs",
                "items": [{ "title": "API", "href": "/docs/api", "description": "Reference" }]
            },
            {
                "blockType": "pricing",
                "_key": "p",
                "heading": "Plans",
                "tiers": [{ "name": "Free", "icon": "star", "url": "https://example.com/free" }]
            },
            { "blockType": "newsletter", "_key": "n" }
        ]
    }))
    .unwrap();

    assert_eq!(
        to_markdown(&doc, &options),
        "# Acme\n\n---\n\n\
         ## Ship it\n\n\
         _Faster than ever_\n\n\
         ![Ship it](https://cdn.sanity.io/images/proj/production/hero1.webp)\n\n\
         - [Start](https://example.com/start)\n\n\
         ---\n\n\
         ## Docs\n\n\
         - [API](https://example.com/docs/api) — Reference\n\n\
         ---\n\n\
         Plans\n\n\
         Free\n"
    );
}

#[test]
fn test_nested_sections() {
    let out = render_block(json!({
        "blockType": "section",
        "title": "Outer",
        "blocks": [
            {
                "blockType": "columns",
                "columns": [
                    { "blockType": "quote", "text": "Nested quote", "name": "Lin" },
                    { "blockType": "code", "code": "let x = 1;", "lang": "rust" }
                ]
            }
        ]
    }));

    assert_eq!(
        out,
        "## Outer\n\n> Nested quote\n>\n> — Lin\n\n```rust\nlet x = 1;\n```\n\n---\n\n---"
    );
}

#[test]
fn test_code_block_with_fence_inside() {
    let out = render_block(json!({
        "blockType": "code",
        "code": "```\ninner\n```",
        "language": "markdown"
    }));
    assert_eq!(out, "````markdown\n```\ninner\n```\n````");
}

#[test]
fn test_faq_with_rich_answers_and_lists() {
    let out = render_block(json!({
        "blockType": "faq",
        "faqs": [{
            "question": "What ships?",
            "answer": [
                { "_type": "block", "listItem": "number", "children": [{ "_type": "span", "text": "Binaries" }] },
                { "_type": "block", "listItem": "number", "children": [{ "_type": "span", "text": "Docs" }] },
                { "_type": "block", "listItem": "bullet", "level": 2, "children": [{ "_type": "span", "text": "HTML" }] }
            ]
        }]
    }));
    assert_eq!(
        out,
        "### What ships?\n\n1. Binaries\n2. Docs\n  - HTML\n\n---"
    );
}
