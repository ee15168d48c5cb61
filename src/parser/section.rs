//! Heading/section segmentation.
//!
//! Markup documents are split on explicit `<h1>`..`<h6>` elements; the
//! heuristics never run there, since the markup already disambiguates
//! headings. Plain text goes through a line scanner that combines the
//! heading detector with table-run tracking, so a table row never leaks
//! into section content and a heading closes both the open section and
//! any open run.

use regex::Regex;

use super::heading::HeadingDetector;
use super::normalize::MarkupNormalizer;
use super::options::ParseOptions;
use super::table::TableExtractor;
use crate::model::{Section, Table};

/// Title of the section synthesized when no headings are detected.
const FALLBACK_TITLE: &str = "Document Content";

/// A heading element located in markup.
struct MarkupHeading {
    level: u8,
    title: String,
    start: usize,
    end: usize,
}

/// Splits a document body into sections and tables.
pub struct SectionSegmenter {
    detector: HeadingDetector,
    extractor: TableExtractor,
    normalizer: MarkupNormalizer,
    heading_tag: Regex,
}

impl SectionSegmenter {
    /// Create a segmenter with default thresholds.
    pub fn new() -> Self {
        Self::with_options(&ParseOptions::default())
    }

    /// Create a segmenter with the given thresholds.
    pub fn with_options(options: &ParseOptions) -> Self {
        Self {
            detector: HeadingDetector::with_config(options.heading.clone()),
            extractor: TableExtractor::with_config(options.table.clone()),
            normalizer: MarkupNormalizer::new(),
            heading_tag: Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").unwrap(),
        }
    }

    /// Segment a markup body.
    ///
    /// Tables are pulled out first so their rows never count as section
    /// content; the remaining markup is split at heading elements, and
    /// each section's slice is lowered to plain text.
    pub fn segment_markup(&self, markup: &str) -> (Vec<Section>, Vec<Table>) {
        let (tables, remaining) = self.extractor.extract_markup_tables(markup);

        let headings: Vec<MarkupHeading> = self
            .heading_tag
            .captures_iter(&remaining)
            .map(|caps| {
                let whole = caps.get(0).unwrap();
                MarkupHeading {
                    level: caps[1].parse().unwrap_or(1),
                    title: self.normalizer.strip(&caps[2]),
                    start: whole.start(),
                    end: whole.end(),
                }
            })
            .collect();

        let mut sections = Vec::new();
        for (i, heading) in headings.iter().enumerate() {
            let content_end = headings
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(remaining.len());
            let content = self.normalizer.normalize(&remaining[heading.end..content_end]);
            sections.push(Section::new(heading.level, heading.title.clone(), content));
        }

        if sections.is_empty() && !remaining.trim().is_empty() {
            sections.push(Section::new(
                1,
                FALLBACK_TITLE,
                self.normalizer.normalize(&remaining),
            ));
        }

        log::debug!(
            "markup body: {} sections, {} tables",
            sections.len(),
            tables.len()
        );
        (sections, tables)
    }

    /// Segment a plain-text body with the heuristic detectors.
    ///
    /// Scans line by line. Blank lines close any open table run and are
    /// never part of section content. Text before the first detected
    /// heading is dropped; if nothing is detected at all, the whole body
    /// becomes a single fallback section.
    pub fn segment_text(&self, text: &str) -> (Vec<Section>, Vec<Table>) {
        let mut sections: Vec<Section> = Vec::new();
        let mut tables: Vec<Table> = Vec::new();
        let mut current: Option<(u8, String)> = None;
        let mut content: Vec<String> = Vec::new();
        let mut run: Vec<Vec<String>> = Vec::new();

        for line in text.split('\n') {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let Some(table) = self.extractor.close_run(&mut run) {
                    tables.push(table);
                }
                continue;
            }

            if let Some(level) = self.detector.detect(trimmed) {
                if let Some((prev_level, prev_title)) = current.take() {
                    let body = content.join("\n");
                    sections.push(Section::new(prev_level, prev_title, body.trim()));
                }
                if let Some(table) = self.extractor.close_run(&mut run) {
                    tables.push(table);
                }
                current = Some((level, trimmed.to_string()));
                content.clear();
            } else if let Some(cells) = self.extractor.detect_row(trimmed) {
                run.push(cells);
            } else {
                if let Some(table) = self.extractor.close_run(&mut run) {
                    tables.push(table);
                }
                content.push(trimmed.to_string());
            }
        }

        if let Some((level, title)) = current.take() {
            let body = content.join("\n");
            sections.push(Section::new(level, title, body.trim()));
        }
        if let Some(table) = self.extractor.close_run(&mut run) {
            tables.push(table);
        }

        if sections.is_empty() && !text.trim().is_empty() {
            sections.push(Section::new(1, FALLBACK_TITLE, text.trim()));
        }

        log::debug!(
            "text body: {} sections, {} tables",
            sections.len(),
            tables.len()
        );
        (sections, tables)
    }
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
