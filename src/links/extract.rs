// src/links/extract.rs
// =============================================================================
// This module extracts link targets from HTML pages.
//
// We do not build a DOM. A page is scanned for the literal attribute syntax
// href="..." and every match is returned in document order. Broken markup,
// single-quoted or unquoted attributes are simply not matched, so this never
// fails on malformed input.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).expect("href pattern is valid"));

// Extracts all href values from HTML content
//
// Parameters:
//   html: the page body
//
// Returns: raw href strings in first-occurrence order, with character
// references such as &amp; decoded. Duplicates are kept; deduplication
// happens later on the resolved URL.
//
// Example:
//   html = r#"<a href="/docs">Docs</a><link href="style.css">"#
//   result = ["/docs", "style.css"]
pub fn extract_links(html: &str) -> Vec<String> {
    HREF.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
        .collect()
}
