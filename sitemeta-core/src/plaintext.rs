//! Plain-text projection of markdown bodies.

use regex::Regex;
use std::sync::OnceLock;

static FENCED_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static INLINE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

fn fenced_code_regex() -> &'static Regex {
    FENCED_CODE_REGEX.get_or_init(|| Regex::new(r"(?s)```.*?```").unwrap())
}

fn inline_code_regex() -> &'static Regex {
    INLINE_CODE_REGEX.get_or_init(|| Regex::new(r"`[^`]+`").unwrap())
}

fn image_regex() -> &'static Regex {
    IMAGE_REGEX.get_or_init(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap())
}

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap())
}

fn markup_regex() -> &'static Regex {
    MARKUP_REGEX.get_or_init(|| Regex::new(r"[#*_~]").unwrap())
}

/// Strip markdown syntax down to plain text.
///
/// Stripping happens in a fixed order: fenced code blocks, inline code
/// spans, images, links (kept as their display text), remaining
/// emphasis/heading markup characters, and finally all whitespace and
/// newlines collapsed to single spaces.
pub fn extract_plain_text(body: &str) -> String {
    let text = fenced_code_regex().replace_all(body, "");
    let text = inline_code_regex().replace_all(&text, "");
    let text = image_regex().replace_all(&text, "");
    let text = link_regex().replace_all(&text, "$1");
    let text = markup_regex().replace_all(&text, "");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
