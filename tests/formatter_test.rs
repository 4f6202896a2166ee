//! Integration tests for document formatting.

use serde_json::json;
use std::io::Write;
use uncms::render::{
    to_markdown, to_markdown_with_stats, AssetResolver, RichTextSerializer, TextExtractor,
};
use uncms::{AssetConfig, Document, RenderOptions};

fn format(value: serde_json::Value) -> String {
    format_with(value, &RenderOptions::default())
}

fn format_with(value: serde_json::Value, options: &RenderOptions) -> String {
    let doc = Document::from_value(&value).unwrap();
    to_markdown(&doc, options)
}

fn block(style: &str, text: &str) -> serde_json::Value {
    json!({
        "_type": "block",
        "style": style,
        "markDefs": [],
        "children": [{ "_type": "span", "text": text, "marks": [] }]
    })
}

// ============================================================================
// Document assembly
// ============================================================================

#[test]
fn test_title_only_document_is_minimal() {
    assert_eq!(format(json!({ "title": "T" })), "# T\n");
}

#[test]
fn test_name_is_title_fallback() {
    assert_eq!(format(json!({ "name": "Named" })), "# Named\n");
}

#[test]
fn test_full_assembly_order() {
    let out = format(json!({
        "_type": "post",
        "title": "Hello",
        "seoDescription": "Short intro",
        "author": { "name": "Ada" },
        "publishedAt": "2024-02-29T08:00:00Z",
        "topics": ["Rust", { "title": "Markdown" }],
        "body": [block("h2", "Section"), block("normal", "Paragraph.")],
        "blocks": [{ "blockType": "cta", "title": "Subscribe" }]
    }));

    assert_eq!(
        out,
        "# Hello\n\n\
         > Short intro\n\n\
         **Author:** Ada  \n\
         **Published:** February 29, 2024  \n\
         **Topics:** Rust, Markdown\n\n\
         ---\n\n\
         ## Section\n\n\
         Paragraph.\n\n\
         ## Subscribe\n\n\
         ---\n"
    );
}

#[test]
fn test_output_has_single_trailing_newline() {
    let out = format(json!({
        "title": "T",
        "body": [block("normal", "Text\n\n\n\n")]
    }));
    assert!(out.ends_with("Text\n"));
    assert!(!out.ends_with("\n\n"));
}

#[test]
fn test_blank_line_runs_collapse() {
    let out = format(json!({
        "body": [
            { "_type": "code", "code": "a\n\n\n\nb" },
            block("normal", "after")
        ]
    }));
    assert!(!out.contains("\n\n\n"));
}

#[test]
fn test_unparseable_date_passes_through() {
    let out = format(json!({ "title": "T", "date": "sometime in spring" }));
    assert_eq!(out, "# T\n\n**Published:** sometime in spring\n");
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_round_trip() {
    let out = format(json!({
        "body": [{ "_type": "table", "rows": [["a", "b"], ["1", "2"]] }]
    }));
    assert_eq!(out, "| a | b |\n| --- | --- |\n| 1 | 2 |\n");
}

#[test]
fn test_table_pipe_escaping() {
    let out = format(json!({
        "body": [{ "_type": "table", "rows": [{ "cells": ["key", "value"] }, { "cells": ["x|y", "z"] }] }]
    }));
    assert!(out.contains("| x\\|y | z |"));
}

#[test]
fn test_empty_table_renders_nothing() {
    let out = format(json!({
        "title": "T",
        "body": [{ "_type": "table", "rows": [] }]
    }));
    assert_eq!(out, "# T\n");
}

#[test]
fn test_embedded_code_starts_its_own_block() {
    let out = format(json!({
        "body": [{
            "_type": "block",
            "children": [
                { "_type": "span", "text": "Run this:" },
                { "_type": "code", "code": "cargo build", "language": "sh" }
            ]
        }]
    }));
    assert_eq!(out, "Run this:\n\n```sh\ncargo build\n```\n");
}

#[test]
fn test_embedded_table_starts_its_own_block() {
    let out = format(json!({
        "body": [{
            "_type": "block",
            "children": [
                { "_type": "span", "text": "Prices:" },
                { "_type": "table", "rows": [["a", "b"], ["1", "2"]] },
                { "_type": "span", "text": "Taxes included." }
            ]
        }]
    }));
    assert_eq!(
        out,
        "Prices:\n\n| a | b |\n| --- | --- |\n| 1 | 2 |\n\nTaxes included.\n"
    );
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_asset_id_parsing() {
    let config = AssetConfig::new("proj", "production");
    let resolver = AssetResolver::new(&config);

    assert_eq!(
        resolver.parse_asset_id("image-abc123-800x600-jpg").as_deref(),
        Some("https://cdn.sanity.io/images/proj/production/abc123.jpg")
    );
    assert_eq!(resolver.parse_asset_id("image-abc123"), None);
    assert_eq!(resolver.parse_asset_id("image-abc123-800xABC-jpg"), None);
    assert_eq!(resolver.parse_asset_id("file-abc123-800x600-pdf"), None);
}

#[test]
fn test_inline_image_resolution() {
    let options = RenderOptions::default().with_project("proj", "staging");
    let out = format_with(
        json!({
            "body": [
                { "_type": "image", "alt": "Diagram", "caption": "Figure 1",
                  "asset": { "_ref": "image-f00d-640x480-png" } },
                { "_type": "image", "alt": "Broken", "asset": { "_ref": "image-f00d" } }
            ]
        }),
        &options,
    );
    assert_eq!(
        out,
        "![Diagram](https://cdn.sanity.io/images/proj/staging/f00d.png)\n_Figure 1_\n"
    );
}

#[test]
fn test_resolved_url_takes_priority() {
    let config = AssetConfig::new("proj", "production");
    let resolver = AssetResolver::new(&config);
    let value = json!({
        "asset": { "url": "https://img.example.com/a.png", "_ref": "image-abc-1x1-png" },
        "url": "https://img.example.com/b.png"
    });
    assert_eq!(
        resolver.resolve_image_url(&value).as_deref(),
        Some("https://img.example.com/a.png")
    );
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_links_are_normalized_after_assembly() {
    let options = RenderOptions::default().with_site_url("https://site");
    let out = format_with(
        json!({
            "body": [{
                "_type": "block",
                "markDefs": [
                    { "_key": "a", "_type": "link", "href": "/wiki/Foo_(bar)" },
                    { "_key": "b", "_type": "internalLink", "slug": { "current": "about" } },
                    { "_key": "c", "_type": "link", "href": "#" }
                ],
                "children": [
                    { "_type": "span", "text": "Foo", "marks": ["a"] },
                    { "_type": "span", "text": " and ", "marks": [] },
                    { "_type": "span", "text": "about", "marks": ["b"] },
                    { "_type": "span", "text": " and ", "marks": [] },
                    { "_type": "span", "text": "nowhere", "marks": ["c"] }
                ]
            }]
        }),
        &options,
    );
    assert_eq!(
        out,
        "[Foo](https://site/wiki/Foo_(bar)) and [about](https://site/about) and nowhere\n"
    );
}

#[test]
fn test_links_inside_nested_fences_are_kept() {
    let options = RenderOptions::default().with_site_url("https://site");
    let out = format_with(
        json!({
            "body": [
                { "_type": "code", "code": "```\n[a](/inside)\n```" },
                block("normal", "[b](/outside)")
            ]
        }),
        &options,
    );
    assert_eq!(
        out,
        "````\n```\n[a](/inside)\n```\n````\n\n[b](https://site/outside)\n"
    );
}

// ============================================================================
// Generic extraction
// ============================================================================

#[test]
fn test_bounded_recursion() {
    let mut value = json!({ "label": "depth 10" });
    for depth in (0..10).rev() {
        value = json!({ "label": format!("depth {}", depth), "next": value.clone(), "again": value });
    }

    let options = RenderOptions::default().with_max_depth(5);
    let extractor = TextExtractor::new(&options);
    let out = extractor.serialize(&value);

    assert!(out.contains("depth 4"));
    for depth in 5..=10 {
        assert!(!out.contains(&format!("depth {}", depth)));
    }
}

#[test]
fn test_fallback_delegation_matches_direct_serialization() {
    let node = json!({
        "_type": "block",
        "style": "h3",
        "markDefs": [{ "_key": "l", "_type": "link", "href": "https://example.com" }],
        "children": [
            { "_type": "span", "text": "Read ", "marks": [] },
            { "_type": "span", "text": "this", "marks": ["l", "em"] }
        ]
    });
    let wrapped = json!({ "blockType": "notRegistered", "_key": "k1", "content": [node.clone()] });

    let options = RenderOptions::default();
    let direct = RichTextSerializer::new(&options).serialize_value(&node);
    let via_block = uncms::render::BlockSerializer::new(&options)
        .serialize(&uncms::Block::from_value(&wrapped));

    assert_eq!(direct, "### Read [_this_](https://example.com)");
    assert_eq!(via_block, direct);
}

#[test]
fn test_long_leaves_are_dropped() {
    let long = "x".repeat(600);
    let out = format(json!({
        "title": "T",
        "blocks": [{ "blockType": "unknown", "heading": "Kept", "blob": long }]
    }));
    assert_eq!(out, "# T\n\n---\n\nKept\n");
}

// ============================================================================
// Listings and statistics
// ============================================================================

#[test]
fn test_listing_document() {
    let options = RenderOptions::default()
        .with_site_url("https://site")
        .with_listing_base_path("/blog");
    let out = format_with(
        json!({
            "_type": "blogIndex",
            "title": "Blog",
            "childItems": [
                { "title": "First", "slug": { "current": "first" }, "publishedAt": "2024-01-15" },
                { "title": "Draft without slug" },
                { "title": "Second", "slug": "second", "description": "More" }
            ]
        }),
        &options,
    );
    assert_eq!(
        out,
        "# Blog\n\n---\n\n## Contents\n\n\
         - [First](https://site/blog/first) (January 15, 2024)\n\
         - [Second](https://site/blog/second) — More\n"
    );
}

#[test]
fn test_stats() {
    let doc = Document::from_value(&json!({
        "title": "Stats",
        "body": [block("normal", "one two three")],
        "blocks": [
            { "blockType": "richText", "content": "four" },
            { "blockType": "mystery", "text": "five" },
            { "blockType": "hero" }
        ],
        "childItems": [{ "title": "A", "slug": "a" }]
    }))
    .unwrap();

    let result = to_markdown_with_stats(&doc, &RenderOptions::default());
    let stats = result.stats;

    assert_eq!(stats.body_node_count, 1);
    assert_eq!(stats.rendered_blocks, 2);
    assert_eq!(stats.fallback_blocks, 1);
    assert_eq!(stats.dropped_blocks, 1);
    assert_eq!(stats.listing_entries, 1);
    assert!(stats.word_count > 0);
}

// ============================================================================
// Input boundary
// ============================================================================

#[test]
fn test_parse_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "title": "From disk", "body": "Text" }}"#).unwrap();

    let doc = uncms::parse_file(file.path()).unwrap();
    assert_eq!(
        to_markdown(&doc, &RenderOptions::default()),
        "# From disk\n\n---\n\nText\n"
    );
}

#[test]
fn test_crlf_input_is_normalized() {
    let out = uncms::to_markdown("{ \"title\": \"T\", \"body\": \"a\\r\\nb\" }").unwrap();
    assert_eq!(out, "# T\n\n---\n\na\nb\n");
}

#[test]
fn test_escaping_option() {
    let options = RenderOptions::default().with_escaping(true);
    let out = format_with(json!({ "body": [block("normal", "2 * 3 = _six_")] }), &options);
    assert_eq!(out, "2 \\* 3 = \\_six\\_\n");
}
