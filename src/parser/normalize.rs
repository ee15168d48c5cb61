//! Markup normalization pipeline.
//!
//! Adapters for markup formats (docx, html) hand their content over as a
//! small HTML-like dialect. This module lowers that dialect to plain text
//! in two flavors: a full strip for `raw_text`, and a structured lowering
//! that keeps emphasis markers, list markers, and paragraph breaks for
//! section content.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Markup-to-text normalizer.
///
/// All patterns are compiled once at construction; the normalizer is
/// cheap to reuse across documents.
pub struct MarkupNormalizer {
    strong: Regex,
    bold: Regex,
    em: Regex,
    italic: Regex,
    list_item: Regex,
    list_wrapper: Regex,
    paragraph: Regex,
    line_break: Regex,
    tag: Regex,
    blank_lines: Regex,
}

impl MarkupNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self {
            strong: Regex::new(r"(?is)<strong[^>]*>(.*?)</strong>").unwrap(),
            bold: Regex::new(r"(?is)<b[^>]*>(.*?)</b>").unwrap(),
            em: Regex::new(r"(?is)<em[^>]*>(.*?)</em>").unwrap(),
            italic: Regex::new(r"(?is)<i[^>]*>(.*?)</i>").unwrap(),
            list_item: Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap(),
            list_wrapper: Regex::new(r"(?i)</?[ou]l[^>]*>").unwrap(),
            paragraph: Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap(),
            line_break: Regex::new(r"(?i)<br\s*/?>").unwrap(),
            tag: Regex::new(r"<[^>]+>").unwrap(),
            blank_lines: Regex::new(r"\n{3,}").unwrap(),
        }
    }

    /// Strip all markup and decode entities, yielding bare text.
    pub fn strip(&self, markup: &str) -> String {
        let text = self.tag.replace_all(markup, "");
        let text = decode_entities(&text);
        text.nfc().collect::<String>().trim().to_string()
    }

    /// Lower markup to plain text, keeping structure the segmenters
    /// understand: `**bold**`, `*italic*`, `- ` list entries, blank
    /// lines between paragraphs.
    pub fn normalize(&self, markup: &str) -> String {
        let text = self.strong.replace_all(markup, "**$1**");
        let text = self.bold.replace_all(&text, "**$1**");
        let text = self.em.replace_all(&text, "*$1*");
        let text = self.italic.replace_all(&text, "*$1*");
        let text = self.list_item.replace_all(&text, "- $1\n");
        let text = self.list_wrapper.replace_all(&text, "\n");
        let text = self.paragraph.replace_all(&text, "$1\n\n");
        let text = self.line_break.replace_all(&text, "\n");
        let text = self.tag.replace_all(&text, "");
        let text = decode_entities(&text);
        let text = self.blank_lines.replace_all(&text, "\n\n");
        text.nfc().collect::<String>().trim().to_string()
    }
}

impl Default for MarkupNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the entity set the adapters emit.
///
/// Replacements run in order, so a double-encoded `&amp;lt;` decodes all
/// the way to `<`.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
