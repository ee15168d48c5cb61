//! Flattened content-item view of a parsed document.
//!
//! Linearizes the section tree into a single ordered list: each section
//! contributes a header item followed by its paragraph and list blocks,
//! and every table follows at the end in discovery order. The flat list
//! is what selection UIs and exporters consume.

use crate::model::{ContentItem, Document};
use crate::parser::ContentSegmenter;

/// Flatten a document into ordered content items.
pub fn to_content_items(document: &Document) -> Vec<ContentItem> {
    let segmenter = ContentSegmenter::new();
    let mut items = Vec::new();

    for section in &document.sections {
        items.push(ContentItem::header(section.level, section.title.clone()));
        items.extend(segmenter.segment(&section.content));
    }

    for table in &document.tables {
        items.push(ContentItem::table(table.plain_text()));
    }

    log::debug!(
        "{}: flattened into {} content items",
        document.file_name,
        items.len()
    );
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, DocumentFormat, Section, Table};

    fn sample_document() -> Document {
        let mut doc = Document::new("sow.txt", DocumentFormat::Text, "raw");
        doc.sections.push(Section::new(
            1,
            "OVERVIEW",
            "The project has two phases.\n- discovery and design\n- build and rollout",
        ));
        doc.sections.push(Section::new(2, "Payment Terms", ""));
        doc.tables.push(Table::from_text_rows(vec![
            vec!["Phase", "Cost"],
            vec!["One", "$5,000"],
        ]));
        doc
    }

    #[test]
    fn test_linearizes_sections_then_tables() {
        let items = to_content_items(&sample_document());

        let kinds: Vec<ContentType> = items.iter().map(|i| i.content_type).collect();
        assert_eq!(
            kinds,
            vec![
                ContentType::Header,
                ContentType::Paragraph,
                ContentType::List,
                ContentType::Header,
                ContentType::Table,
            ]
        );
    }

    #[test]
    fn test_headers_keep_section_levels() {
        let items = to_content_items(&sample_document());
        assert_eq!(items[0].level, Some(1));
        assert_eq!(items[0].text, "OVERVIEW");
        assert_eq!(items[3].level, Some(2));
        assert_eq!(items[3].text, "Payment Terms");
    }

    #[test]
    fn test_section_content_is_segmented() {
        let items = to_content_items(&sample_document());
        assert_eq!(items[1].text, "The project has two phases.");
        assert_eq!(items[2].text, "- discovery and design\n- build and rollout");
    }

    #[test]
    fn test_table_items_carry_plain_text() {
        let items = to_content_items(&sample_document());
        let table = items.last().unwrap();
        assert_eq!(table.content_type, ContentType::Table);
        assert_eq!(table.text, "Phase | Cost\nOne | $5,000");
    }

    #[test]
    fn test_empty_section_yields_header_only() {
        let mut doc = Document::new("x.txt", DocumentFormat::Text, "");
        doc.sections.push(Section::new(1, "Scope", ""));
        let items = to_content_items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content_type, ContentType::Header);
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let doc = Document::new("x.txt", DocumentFormat::Text, "");
        assert!(to_content_items(&doc).is_empty());
    }
}
