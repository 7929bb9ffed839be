//! Parsed page wrapper shared by every extractor in one analysis pass
//!
//! `PageDocument` owns the parsed DOM together with the pass-scoped JSON-LD
//! parse cache. Dropping the document drops the cache, so nothing parsed for
//! one page can leak into the next.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value as JsonValue;

use crate::error::CoreError;
use crate::text::collapse_whitespace;

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("invalid script selector"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("invalid meta selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel]").expect("invalid link selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("invalid title selector"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("invalid body selector"));

/// Elements whose text never counts as page text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Elements that start a new line in the computed page text
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "br", "tr", "td", "th",
    "section", "article", "header", "footer", "main", "nav", "aside", "dt", "dd", "table",
    "details", "summary", "blockquote", "figcaption",
];

/// Parsed JSON-LD blocks for one pass
#[derive(Debug, Default)]
pub struct JsonLdCache {
    /// Successfully parsed blocks, in document order
    pub blocks: Vec<JsonValue>,
    /// Total `<script type="application/ld+json">` blocks seen
    pub block_count: usize,
    /// One message per block that failed to parse
    pub errors: Vec<String>,
}

/// A parsed product page plus its pass metadata
pub struct PageDocument {
    html: Html,
    url: String,
    timestamp: DateTime<Utc>,
    json_ld: OnceCell<JsonLdCache>,
    text: OnceCell<String>,
}

impl PageDocument {
    pub fn parse(html: &str, url: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.to_string(),
            timestamp,
            json_ld: OnceCell::new(),
            text: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// All elements matching a CSS selector. Invalid selectors match nothing.
    pub fn select(&self, selector_str: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector_str) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    pub fn first(&self, selector_str: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(selector_str)?;
        self.html.select(&selector).next()
    }

    pub fn exists(&self, selector_str: &str) -> bool {
        self.first(selector_str).is_some()
    }

    pub fn count(&self, selector_str: &str) -> usize {
        match parse_selector(selector_str) {
            Some(selector) => self.html.select(&selector).count(),
            None => 0,
        }
    }

    /// `<meta name="...">` content, matched case-insensitively
    pub fn meta_name(&self, name: &str) -> Option<String> {
        self.meta_by("name", name)
    }

    /// `<meta property="...">` content, matched case-insensitively
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.meta_by("property", property)
            .or_else(|| self.meta_by("name", property))
    }

    fn meta_by(&self, attr: &str, key: &str) -> Option<String> {
        self.html
            .select(&META_SELECTOR)
            .filter(|el| {
                el.value()
                    .attr(attr)
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
            .filter_map(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
    }

    /// First `<link rel="...">` href, where `rel` may hold several tokens
    pub fn link_href(&self, rel: &str) -> Option<String> {
        self.html
            .select(&LINK_SELECTOR)
            .filter(|el| {
                el.value()
                    .attr("rel")
                    .is_some_and(|r| r.split_whitespace().any(|t| t.eq_ignore_ascii_case(rel)))
            })
            .filter_map(|el| el.value().attr("href"))
            .map(|h| h.trim().to_string())
            .find(|h| !h.is_empty())
    }

    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
    }

    pub fn lang(&self) -> Option<String> {
        self.html
            .root_element()
            .value()
            .attr("lang")
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
    }

    /// Visible text of the body, one line per block element
    pub fn page_text(&self) -> &str {
        self.text.get_or_init(|| {
            let root = self
                .html
                .select(&BODY_SELECTOR)
                .next()
                .unwrap_or_else(|| self.html.root_element());
            block_text(&root)
        })
    }

    /// JSON-LD blocks, parsed once per pass
    pub fn json_ld(&self) -> &JsonLdCache {
        self.json_ld.get_or_init(|| parse_json_ld_blocks(&self.html))
    }
}

/// Parse a selector, logging instead of failing on bad input
pub fn parse_selector(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::debug!("invalid CSS selector '{selector_str}': {e:?}");
            None
        }
    }
}

/// Descendants of `element` matching a CSS selector
pub fn select_in<'a>(element: &ElementRef<'a>, selector_str: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector_str) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Whitespace-collapsed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&block_text(element))
}

/// Text content with a newline at every block boundary and script/style removed
pub fn block_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);

    out.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(element: &ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_text(&child_el, out);
                }
                if is_block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Whether any ancestor of `element` matches one of the tag names or ARIA roles
pub fn has_ancestor(element: &ElementRef<'_>, tags: &[&str], roles: &[&str]) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
        let value = ancestor.value();
        tags.contains(&value.name())
            || value
                .attr("role")
                .is_some_and(|r| roles.iter().any(|role| r.eq_ignore_ascii_case(role)))
    })
}

/// Extract JSON-LD script blocks from a parsed document
pub fn extract_json_ld_blocks(document: &Html) -> Vec<String> {
    document
        .select(&SCRIPT_SELECTOR)
        .filter_map(|element| {
            let script_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_default();

            // Use contains() to catch variations like "application/ld+json; charset=utf-8"
            if script_type.contains("ld+json") {
                let text = element.text().collect::<String>().trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            } else {
                None
            }
        })
        .collect()
}

fn parse_json_ld_blocks(document: &Html) -> JsonLdCache {
    let raw_blocks = extract_json_ld_blocks(document);
    let mut cache = JsonLdCache {
        block_count: raw_blocks.len(),
        ..Default::default()
    };

    for (index, raw) in raw_blocks.iter().enumerate() {
        let error = match serde_json::from_str::<JsonValue>(raw) {
            Ok(value @ (JsonValue::Object(_) | JsonValue::Array(_))) => {
                cache.blocks.push(value);
                continue;
            }
            Ok(other) => CoreError::InvalidTopLevel {
                index,
                kind: json_kind(&other),
            },
            Err(source) => CoreError::JsonLdParse { index, source },
        };
        log::warn!("skipping JSON-LD block: {error}");
        cache.errors.push(error.to_string());
    }

    cache
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
