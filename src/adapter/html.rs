//! HTML adapter.
//!
//! Decodes html/htm bytes into a markup body for the structural parser.
//! Script and style regions are removed up front so their text never
//! leaks into the extracted content, and the `<body>` element is used
//! when present.

use regex::Regex;

use super::{Decoded, FormatAdapter};
use crate::error::Result;
use crate::model::{DocumentFormat, Metadata};
use crate::parser::MarkupNormalizer;

/// Adapter for HTML files.
pub struct HtmlAdapter {
    body: Regex,
    script: Regex,
    style: Regex,
    title: Regex,
    heading: Regex,
    row_end: Regex,
    cell_end: Regex,
    normalizer: MarkupNormalizer,
}

impl HtmlAdapter {
    /// Create a new HTML adapter.
    pub fn new() -> Self {
        Self {
            body: Regex::new(r"(?is)<body[^>]*>(.*?)</body>").unwrap(),
            script: Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap(),
            style: Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap(),
            title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap(),
            heading: Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>").unwrap(),
            row_end: Regex::new(r"(?i)</tr>").unwrap(),
            cell_end: Regex::new(r"(?i)</t[dh]>").unwrap(),
            normalizer: MarkupNormalizer::new(),
        }
    }

    /// Flatten markup to plain text, keeping headings and table rows on
    /// their own lines.
    fn textify(&self, markup: &str) -> String {
        let text = self.heading.replace_all(markup, "\n\n$1\n\n");
        let text = self.row_end.replace_all(&text, "\n");
        let text = self.cell_end.replace_all(&text, "\t");
        self.normalizer.normalize(&text)
    }
}

impl FormatAdapter for HtmlAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn name(&self) -> &str {
        "html"
    }

    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        let (html, lossy) = match std::str::from_utf8(bytes) {
            Ok(html) => (html.to_string(), false),
            Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
        };

        let cleaned = self.script.replace_all(&html, "");
        let cleaned = self.style.replace_all(&cleaned, "");

        let markup = match self.body.captures(&cleaned) {
            Some(caps) => caps[1].trim().to_string(),
            None => cleaned.trim().to_string(),
        };
        let raw_text = self.textify(&markup);

        let mut decoded = Decoded::new(DocumentFormat::Html, raw_text).with_markup(markup);

        if let Some(caps) = self.title.captures(&cleaned) {
            let title = self.normalizer.strip(&caps[1]);
            if !title.is_empty() {
                decoded = decoded.with_metadata(Metadata {
                    title: Some(title),
                    ..Default::default()
                });
            }
        }
        if lossy {
            log::warn!("{}: invalid UTF-8 sequences replaced", file_name);
            decoded = decoded.with_warnings(vec![
                "Invalid UTF-8 sequences were replaced with U+FFFD".to_string(),
            ]);
        }
        Ok(decoded)
    }
}

impl Default for HtmlAdapter {
    fn default() -> Self {
        Self::new()
    }
}
