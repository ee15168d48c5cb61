//! Section types.

use serde::{Deserialize, Serialize};

use super::content::fresh_id;

/// A document section: one heading plus the text under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique opaque id
    pub id: String,

    /// Heading level, 1 (top) through 6
    pub level: u8,

    /// Heading text, trimmed, numbering prefix retained
    pub title: String,

    /// Body text between this heading and the next
    pub content: String,

    /// Nested subsections. Reserved; segmentation currently emits a
    /// flat list and leaves this empty.
    pub children: Vec<Section>,
}

impl Section {
    /// Create a section with no children.
    pub fn new(level: u8, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: fresh_id("section"),
            level,
            title: title.into(),
            content: content.into(),
            children: Vec::new(),
        }
    }

    /// Check if the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_new() {
        let section = Section::new(2, "1.2 Scope", "The work covers migration.");
        assert!(section.id.starts_with("section-"));
        assert_eq!(section.level, 2);
        assert_eq!(section.title, "1.2 Scope");
        assert!(!section.is_empty());
        assert!(section.children.is_empty());
    }

    #[test]
    fn test_empty_section() {
        let section = Section::new(1, "DELIVERABLES", "   ");
        assert!(section.is_empty());
    }
}
