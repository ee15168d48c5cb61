//! Paragraph and list segmentation within section content.
//!
//! Runs per section over its content lines. At most one of two buffers
//! is open at a time: a paragraph buffer (soft-wrapped prose, joined
//! with spaces) or a list buffer (one entry per marker line, indented
//! lines merged into the previous entry). A blank line closes whichever
//! block is open.

use regex::Regex;

use crate::model::ContentItem;

/// Scanner state while walking content lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegState {
    Idle,
    InParagraph,
    InList,
}

/// Splits section content into paragraph and list items.
pub struct ContentSegmenter {
    bullet_marker: Regex,
    number_marker: Regex,
}

impl ContentSegmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self {
            bullet_marker: Regex::new(r"^[-•*]\s").unwrap(),
            number_marker: Regex::new(r"^\d+[.)]\s").unwrap(),
        }
    }

    /// Segment content into paragraph and list items, in order.
    pub fn segment(&self, content: &str) -> Vec<ContentItem> {
        let mut items = Vec::new();
        let mut state = SegState::Idle;
        let mut paragraph: Vec<String> = Vec::new();
        let mut list: Vec<String> = Vec::new();

        for line in content.split('\n') {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush_paragraph(&mut paragraph, &mut items);
                flush_list(&mut list, &mut items);
                state = SegState::Idle;
                continue;
            }

            if self.is_list_marker(trimmed) {
                flush_paragraph(&mut paragraph, &mut items);
                list.push(trimmed.to_string());
                state = SegState::InList;
            } else if state == SegState::InList && line.starts_with(char::is_whitespace) {
                // Indented soft-wrap: merge into the previous entry.
                if let Some(last) = list.last_mut() {
                    last.push(' ');
                    last.push_str(trimmed);
                }
            } else {
                flush_list(&mut list, &mut items);
                paragraph.push(trimmed.to_string());
                state = SegState::InParagraph;
            }
        }

        flush_paragraph(&mut paragraph, &mut items);
        flush_list(&mut list, &mut items);
        items
    }

    /// Check for a list marker: `-`, `•`, `*`, `1.`, or `1)` followed by
    /// whitespace.
    fn is_list_marker(&self, trimmed: &str) -> bool {
        self.bullet_marker.is_match(trimmed) || self.number_marker.is_match(trimmed)
    }
}

impl Default for ContentSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn flush_paragraph(buffer: &mut Vec<String>, items: &mut Vec<ContentItem>) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer).join(" ").trim().to_string();
    if !text.is_empty() {
        items.push(ContentItem::paragraph(text));
    }
}

fn flush_list(buffer: &mut Vec<String>, items: &mut Vec<ContentItem>) {
    if buffer.is_empty() {
        return;
    }
    items.push(ContentItem::list(std::mem::take(buffer).join("\n")));
}
