//! Prompt preparation for the remote classifier

use crate::crawler::PageLink;
use serde_json::{json, Value};

/// Truncates to `max_chars` characters, appending `...` when anything was cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Formats the first `max_links` links as `- "text": url` lines
pub fn format_links(links: &[PageLink], max_links: usize) -> String {
    links
        .iter()
        .take(max_links)
        .map(|link| format!("- \"{}\": {}", link.text.trim(), link.target()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the page excerpt substituted for `{text}` in the user template
pub fn page_excerpt(
    page_url: &str,
    text: &str,
    links: &[PageLink],
    max_text_length: usize,
    max_links: usize,
) -> String {
    format!(
        "Analyze this web page from {url} to determine if it's a valid career/jobs page with actual job listings.\n\
         \n\
         PAGE TEXT EXCERPT:\n\
         {text}\n\
         \n\
         IMPORTANT LINKS ON THE PAGE:\n\
         {links}\n\
         \n\
         Determine whether this is a page listing multiple job postings. If it's not, suggest \
         alternative URLs from the links that might contain job listings.",
        url = page_url,
        text = truncate_text(text, max_text_length),
        links = format_links(links, max_links),
    )
}

/// Substitutes the excerpt into the configured user template
pub fn render_user_message(template: &str, excerpt: &str) -> String {
    template.replace("{text}", excerpt)
}

/// JSON schema the model's answer must follow
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "is_target": { "type": "boolean" },
            "confidence": { "type": "integer" },
            "reasoning": { "type": "string" },
            "suggested_urls": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "url": { "type": "string" },
                        "text": { "type": "string" }
                    },
                    "required": ["url", "text"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["is_target", "confidence", "reasoning", "suggested_urls"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn link(text: &str, href: &str) -> PageLink {
        PageLink {
            href: href.to_string(),
            url: Url::parse(href).ok(),
            text: text.to_string(),
            aria_label: None,
            title: None,
        }
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_text("opportunità", 10), "opportunit...");
        assert_eq!(truncate_text("àèìòù", 2), "àè...");
    }

    #[test]
    fn test_format_links_limit() {
        let links: Vec<PageLink> = (0..20)
            .map(|i| link(&format!(" Job {} ", i), &format!("https://acme.example/jobs/{}", i)))
            .collect();
        let formatted = format_links(&links, 15);
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "- \"Job 0\": https://acme.example/jobs/0");
    }

    #[test]
    fn test_format_links_falls_back_to_href() {
        let links = vec![link("Mail us", "mailto:hr@acme.example")];
        assert_eq!(
            format_links(&links, 15),
            "- \"Mail us\": mailto:hr@acme.example"
        );
    }

    #[test]
    fn test_render_user_message() {
        let excerpt = page_excerpt("https://acme.example/careers", "Open roles", &[], 6000, 15);
        let message = render_user_message("Page:\n{text}\nEnd", &excerpt);
        assert!(message.starts_with("Page:\nAnalyze this web page from https://acme.example/careers"));
        assert!(message.contains("PAGE TEXT EXCERPT:\nOpen roles\n"));
        assert!(message.ends_with("\nEnd"));
    }

    #[test]
    fn test_schema_requires_verdict() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "is_target"));
        assert!(required.iter().any(|v| v == "suggested_urls"));
    }
}
