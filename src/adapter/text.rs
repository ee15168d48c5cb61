//! Plain-text adapter.
//!
//! Decodes txt/md bytes straight into a text body. No markup is
//! produced, so these documents always go through the heuristic
//! text path of the parser.

use super::{Decoded, FormatAdapter};
use crate::error::Result;
use crate::model::DocumentFormat;

/// Adapter for plain-text and Markdown files.
pub struct TextAdapter;

impl TextAdapter {
    /// Create a new text adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FormatAdapter for TextAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        let (text, lossy) = match std::str::from_utf8(bytes) {
            Ok(text) => (text.to_string(), false),
            Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
        };
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();

        let mut decoded = Decoded::new(DocumentFormat::Text, text);
        if lossy {
            log::warn!("{}: invalid UTF-8 sequences replaced", file_name);
            decoded = decoded.with_warnings(vec![
                "Invalid UTF-8 sequences were replaced with U+FFFD".to_string(),
            ]);
        }
        Ok(decoded)
    }
}

impl Default for TextAdapter {
    fn default() -> Self {
        Self::new()
    }
}
