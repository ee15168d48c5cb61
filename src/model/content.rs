//! Flattened content items.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique id with the given prefix.
///
/// Shape is `{prefix}-{seq}-{millis}`. Ids are opaque; ordering comes
/// from item position, never from the id.
pub(crate) fn fresh_id(prefix: &str) -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{}-{}-{}", prefix, seq, millis)
}

/// Kind of a flattened content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Section heading
    Header,
    /// Body paragraph
    Paragraph,
    /// List block (one entry per line, markers retained)
    List,
    /// Table rendered as pipe-separated rows
    Table,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Header => write!(f, "header"),
            ContentType::Paragraph => write!(f, "paragraph"),
            ContentType::List => write!(f, "list"),
            ContentType::Table => write!(f, "table"),
        }
    }
}

/// A single item in the flattened view of a document.
///
/// Items carry a selection flag so review tooling can toggle them
/// without re-parsing; it is always `false` when produced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique opaque id
    pub id: String,

    /// Item kind
    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Heading level, set for headers only
    pub level: Option<u8>,

    /// Text content
    pub text: String,

    /// Whether the item is selected for downstream processing
    pub is_selected: bool,
}

impl ContentItem {
    /// Create a header item.
    pub fn header(level: u8, text: impl Into<String>) -> Self {
        Self {
            id: fresh_id("content"),
            content_type: ContentType::Header,
            level: Some(level),
            text: text.into(),
            is_selected: false,
        }
    }

    /// Create a paragraph item.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::untyped(ContentType::Paragraph, text)
    }

    /// Create a list item.
    pub fn list(text: impl Into<String>) -> Self {
        Self::untyped(ContentType::List, text)
    }

    /// Create a table item.
    pub fn table(text: impl Into<String>) -> Self {
        Self::untyped(ContentType::Table, text)
    }

    fn untyped(content_type: ContentType, text: impl Into<String>) -> Self {
        Self {
            id: fresh_id("content"),
            content_type,
            level: None,
            text: text.into(),
            is_selected: false,
        }
    }
}
