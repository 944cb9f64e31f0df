//! HTML to text extraction heuristics

use crate::config::ExtractorKind;
use scraper::{ElementRef, Html, Node, Selector};

/// Subtrees that never carry article text
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "aside", "header", "form", "button", "noscript",
    "iframe", "svg", "canvas", "template",
];

/// Elements that start a new line of text
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5",
    "h6", "br", "tr", "td", "th", "table", "blockquote", "pre", "dd", "dt", "figcaption",
];

/// Content regions tried before falling back to the whole body
const REGION_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]"];

/// A region shorter than this is assumed to be a teaser, not the content
const MIN_REGION_CHARS: usize = 100;

/// An HTML to plain-text heuristic
pub trait Extractor: Send + Sync {
    /// Extractor name for logging
    fn name(&self) -> &str;

    /// Raw text of the page; may contain redundant whitespace
    fn extract(&self, html: &str) -> String;
}

/// Prefers `<article>`/`<main>` regions and falls back to the cleaned body
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityExtractor;

impl Extractor for ReadabilityExtractor {
    fn name(&self) -> &str {
        "readability"
    }

    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);

        for css in REGION_SELECTORS {
            let Ok(sel) = Selector::parse(css) else {
                continue;
            };
            if let Some(region) = doc.select(&sel).next() {
                let text = element_text(&region);
                if text.trim().chars().count() >= MIN_REGION_CHARS {
                    return text;
                }
            }
        }

        if let Ok(body) = Selector::parse("body") {
            if let Some(body) = doc.select(&body).next() {
                return element_text(&body);
            }
        }

        element_text(&doc.root_element())
    }
}

/// Strips noisy tags from the whole document
#[derive(Debug, Default, Clone, Copy)]
pub struct TagStripExtractor;

impl Extractor for TagStripExtractor {
    fn name(&self) -> &str {
        "tag_strip"
    }

    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        element_text(&doc.root_element())
    }
}

/// Build the extractor selected in configuration
pub fn extractor_for(kind: ExtractorKind) -> Box<dyn Extractor> {
    match kind {
        ExtractorKind::Readability => Box::new(ReadabilityExtractor),
        ExtractorKind::TagStrip => Box::new(TagStripExtractor),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    let mut buf = String::new();
    collect_text(el, &mut buf);
    buf
}

fn collect_text(node: &ElementRef<'_>, buf: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if NOISE_TAGS.contains(&tag) || tag == "head" {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
                if block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Normalize whitespace: trim lines, squeeze inner spaces and collapse runs
/// of blank lines into a single paragraph break
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_break = false;

    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_break = true;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        pending_break = false;
    }

    out
}

/// Truncate to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
