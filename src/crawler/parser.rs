//! HTML parser for extracting visible text and anchors
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Visible body text (scripts, styles and templates excluded)
//! - Anchors with their text, `aria-label` and `title` attributes

use crate::url::resolve_against;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never reaches the reader
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// One anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// The `href` attribute as written in the document
    pub href: String,

    /// The href resolved against the page URL, when it leads to a fetchable page
    pub url: Option<Url>,

    /// Whitespace-collapsed anchor text
    pub text: String,

    pub aria_label: Option<String>,

    pub title: Option<String>,
}

impl PageLink {
    /// Link target in the form shown to the classifier
    pub fn target(&self) -> &str {
        self.url.as_ref().map(Url::as_str).unwrap_or(&self.href)
    }
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible text, one line per text node
    pub text: String,

    /// Anchors in document order
    pub links: Vec<PageLink>,
}

/// Parses HTML content and extracts text and anchors
///
/// # Link Extraction Rules
///
/// Every `<a href>` is reported in document order, including ones that cannot
/// be fetched (`mailto:`, fragments); those carry `url: None` so keyword
/// matching can still see their text.
///
/// # Example
///
/// ```
/// use career_scout::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Acme</title></head>
///     <body><a href="/careers" aria-label="Careers">Join us</a></body></html>"#;
/// let base_url = Url::parse("https://acme.example/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title.as_deref(), Some("Acme"));
/// assert_eq!(parsed.links[0].url.as_ref().unwrap().as_str(), "https://acme.example/careers");
/// assert_eq!(parsed.links[0].aria_label.as_deref(), Some("Careers"));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Collects visible text nodes, one per line
fn extract_text(document: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_TAGS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let line = collapse_whitespace(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Extracts every anchor from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<PageLink> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim().to_string();
            Some(PageLink {
                url: resolve_against(base_url, &href),
                text: anchor_text(&element),
                aria_label: non_empty_attr(&element, "aria-label"),
                title: non_empty_attr(&element, "title"),
                href,
            })
        })
        .collect()
}

fn anchor_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn non_empty_attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(collapse_whitespace)
        .filter(|value| !value.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
