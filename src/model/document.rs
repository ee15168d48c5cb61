//! Document-level types.

use super::content::fresh_id;
use super::{Section, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed document.
///
/// Produced by a single parse invocation and not mutated afterwards;
/// downstream views (content items, JSON) are derived, never written
/// back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique opaque id for this parse
    pub id: String,

    /// Original file name, extension included
    pub file_name: String,

    /// Source format the bytes were decoded from
    pub format: DocumentFormat,

    /// Full plain text, markup stripped
    pub raw_text: String,

    /// Sections in document order
    pub sections: Vec<Section>,

    /// Tables in discovery order
    pub tables: Vec<Table>,

    /// Source metadata (title, author, dates), when the format carries any
    pub metadata: Option<Metadata>,

    /// Non-fatal warnings emitted while decoding
    pub parse_warnings: Option<Vec<String>>,
}

impl Document {
    /// Create a document with no sections or tables yet.
    pub fn new(
        file_name: impl Into<String>,
        format: DocumentFormat,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: fresh_id("doc"),
            file_name: file_name.into(),
            format,
            raw_text: raw_text.into(),
            sections: Vec::new(),
            tables: Vec::new(),
            metadata: None,
            parse_warnings: None,
        }
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Get the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Check if the document has no structure at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.tables.is_empty()
    }
}

/// Source format of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Office Open XML (.docx)
    Docx,
    /// PDF
    Pdf,
    /// HTML
    Html,
    /// Plain text or Markdown
    Text,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Docx => write!(f, "docx"),
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Html => write!(f, "html"),
            DocumentFormat::Text => write!(f, "text"),
        }
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Check if no field is populated.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.created.is_none()
            && self.modified.is_none()
    }
}
