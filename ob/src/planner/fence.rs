//! Markdown code fence stripping
//!
//! Models often wrap JSON in a fenced block. This removes one leading fence
//! (with an optional language tag) and one trailing fence. It is a textual
//! repair, not a markdown parser.

const FENCE: &str = "```";

/// Strip surrounding whitespace and a wrapping code fence
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix(FENCE) {
        let tag_len = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
        s = &rest[tag_len..];
    }

    if let Some(rest) = s.strip_suffix(FENCE) {
        s = rest;
    }

    s.trim()
}
