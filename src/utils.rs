// src/utils.rs
use scraper::Html;

/// Collapse every run of whitespace (including newlines) into a single space
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup from an HTML fragment, keeping its text content
pub fn html_to_text(html: &str) -> String {
    if !html.contains('<') {
        return clean_text(html);
    }
    let fragment = Html::parse_fragment(html);
    clean_text(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
}

/// Take at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// First `max` characters followed by an ellipsis, used in list previews
pub fn preview(text: &str, max: usize) -> String {
    format!("{}...", truncate_chars(text, max))
}

/// Number of space-separated words; empty text has none
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
