use crate::parser::{lines, re_heading, re_ordered_item, re_unordered_item};

pub const UNTITLED: &str = "Untitled";

/// Derive a display title from the first non-blank line.
pub fn extract_title(markdown: &str) -> String {
    extract_title_or(markdown, UNTITLED)
}

/// Like [`extract_title`], returning `fallback` for a blank document.
pub fn extract_title_or(markdown: &str, fallback: &str) -> String {
    let Some(first) = lines(markdown)
        .into_iter()
        .map(|line| line.trim().to_string())
        .find(|line| !line.is_empty())
    else {
        return fallback.to_string();
    };

    if let Some(caps) = re_heading().captures(&first) {
        if &caps[1] == "#" {
            return caps[2].trim().to_string();
        }
    }

    // Not an H1: strip one layer of block markers
    let mut text = first.as_str();
    if let Some(caps) = re_heading().captures(text) {
        text = caps.get(2).map_or(text, |m| m.as_str());
    }
    if let Some(caps) = re_unordered_item().captures(text) {
        text = caps.get(1).map_or(text, |m| m.as_str());
    }
    if let Some(caps) = re_ordered_item().captures(text) {
        text = caps.get(1).map_or(text, |m| m.as_str());
    }
    text.trim().to_string()
}
