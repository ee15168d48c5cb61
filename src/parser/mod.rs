//! Structural parsing pipeline.
//!
//! The pipeline turns decoded content into a [`Document`]: the section
//! segmenter splits the body on headings (explicit elements for markup,
//! heuristics for plain text), the table extractor pulls rows out along
//! the way, and decoder metadata and warnings are carried through
//! untouched.

mod heading;
mod normalize;
pub mod options;
mod section;
mod segment;
mod table;

pub use heading::HeadingDetector;
pub use normalize::MarkupNormalizer;
pub use options::{HeadingConfig, ParseOptions, TableConfig};
pub use section::SectionSegmenter;
pub use segment::ContentSegmenter;
pub use table::TableExtractor;

use crate::adapter::Decoded;
use crate::model::Document;

/// Parses decoded document content into structured form.
pub struct DocumentParser {
    segmenter: SectionSegmenter,
}

impl DocumentParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(&ParseOptions::default())
    }

    /// Create a parser with the given options.
    pub fn with_options(options: &ParseOptions) -> Self {
        Self {
            segmenter: SectionSegmenter::with_options(options),
        }
    }

    /// Build a structured document from adapter output.
    ///
    /// Markup bodies are segmented on their heading elements; plain-text
    /// bodies go through the heuristic line scanner. Either way the
    /// decoder's raw text, metadata and warnings land on the document
    /// unchanged.
    pub fn parse(&self, decoded: Decoded, file_name: &str) -> Document {
        let Decoded {
            format,
            raw_text,
            body_markup,
            metadata,
            warnings,
        } = decoded;

        let (sections, tables) = match body_markup.as_deref() {
            Some(markup) => self.segmenter.segment_markup(markup),
            None => self.segmenter.segment_text(&raw_text),
        };

        log::debug!(
            "{}: {} sections, {} tables, {} warnings",
            file_name,
            sections.len(),
            tables.len(),
            warnings.len()
        );

        let mut document = Document::new(file_name, format, raw_text);
        document.sections = sections;
        document.tables = tables;
        document.metadata = metadata;
        if !warnings.is_empty() {
            document.parse_warnings = Some(warnings);
        }
        document
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}
