//! Conversion between model output and presentation markup
//!
//! Model output uses `**bold**` emphasis. Stored assistant turns carry
//! `<strong>` markup for display, and that markup is stripped again before
//! the turn is replayed into a prompt. Stripping is lossy for literal angle
//! brackets in the original text.

use regex::Regex;
use std::sync::OnceLock;

fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<.*?>").expect("tag pattern is valid"))
}

/// Replace every `**X**` span with `<strong>X</strong>`
///
/// Matching is non-greedy and does not cross line breaks; unpaired markers
/// are left as they are.
///
/// # Examples
///
/// ```
/// use tutorchat::chat::formatter::to_display;
///
/// assert_eq!(to_display("**bold**"), "<strong>bold</strong>");
/// assert_eq!(to_display("no markers here"), "no markers here");
/// ```
pub fn to_display(raw: &str) -> String {
    emphasis_pattern()
        .replace_all(raw, "<strong>$1</strong>")
        .into_owned()
}

/// Strip every `<...>` tag, leaving the text between them
///
/// # Examples
///
/// ```
/// use tutorchat::chat::formatter::to_plain;
///
/// assert_eq!(to_plain("<strong>bold</strong> text"), "bold text");
/// ```
pub fn to_plain(display: &str) -> String {
    tag_pattern().replace_all(display, "").into_owned()
}

/// Escape text for embedding inside display markup
///
/// # Examples
///
/// ```
/// use tutorchat::chat::formatter::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
pub fn escape_html(text: &str) -> String {
    minijinja::HtmlEscape(text).to_string()
}
