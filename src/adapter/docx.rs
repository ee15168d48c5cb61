//! Office Open XML (.docx) adapter.
//!
//! Reads `word/document.xml` out of the OPC container and lowers
//! WordprocessingML to the parser's markup dialect: heading paragraph
//! styles become `<h1>`..`<h6>`, tables become `<table>/<tr>/<td>`,
//! bold and italic runs become `<strong>/<em>`, numbered paragraphs
//! become `<li>`. Core properties from `docProps/core.xml` map to
//! document metadata, and paragraph styles with no mapping are
//! surfaced as parse warnings.

use chrono::{DateTime, Utc};
use regex::Regex;

use super::opc::OpcArchive;
use super::{Decoded, FormatAdapter};
use crate::error::Result;
use crate::model::{DocumentFormat, Metadata};

/// Adapter for .docx files.
pub struct DocxAdapter {
    body: Regex,
    block: Regex,
    p_style: Regex,
    num_pr: Regex,
    run: Regex,
    run_props: Regex,
    bold: Regex,
    bold_off: Regex,
    italic: Regex,
    italic_off: Regex,
    run_piece: Regex,
    row: Regex,
    cell: Regex,
    cell_para: Regex,
    grid_span: Regex,
    dc_title: Regex,
    dc_creator: Regex,
    dcterms_created: Regex,
    dcterms_modified: Regex,
}

/// A run lowered to text, in both escaped-markup and plain form.
struct LoweredText {
    markup: String,
    plain: String,
}

impl DocxAdapter {
    /// Create a new docx adapter.
    pub fn new() -> Self {
        Self {
            body: Regex::new(r"(?is)<w:body[^>]*>(.*?)</w:body>").unwrap(),
            // Top-level blocks in order: tables swallow their inner
            // paragraphs, empty paragraphs are consumed and dropped.
            block: Regex::new(
                r"(?is)(?P<tbl><w:tbl(?:\s[^>]*)?>.*?</w:tbl>)|<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>(?P<para>.*?)</w:p>",
            )
            .unwrap(),
            p_style: Regex::new(r#"(?is)<w:pStyle[^>]*w:val\s*=\s*"([^"]*)""#).unwrap(),
            num_pr: Regex::new(r"<w:numPr\b").unwrap(),
            run: Regex::new(r"(?is)<w:r(?:\s[^>]*)?>(.*?)</w:r>").unwrap(),
            run_props: Regex::new(r"(?is)<w:rPr[^>]*>(.*?)</w:rPr>").unwrap(),
            bold: Regex::new(r"(?i)<w:b\b[^>]*>").unwrap(),
            bold_off: Regex::new(r#"(?i)<w:b\b[^>]*w:val\s*=\s*"(?:false|0|none)""#).unwrap(),
            italic: Regex::new(r"(?i)<w:i\b[^>]*>").unwrap(),
            italic_off: Regex::new(r#"(?i)<w:i\b[^>]*w:val\s*=\s*"(?:false|0|none)""#).unwrap(),
            run_piece: Regex::new(r"(?is)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\b[^>]*/>|<w:br\b[^>]*/>")
                .unwrap(),
            row: Regex::new(r"(?is)<w:tr(?:\s[^>]*)?>(.*?)</w:tr>").unwrap(),
            cell: Regex::new(r"(?is)<w:tc(?:\s[^>]*)?>(.*?)</w:tc>").unwrap(),
            cell_para: Regex::new(r"(?is)<w:p(?:\s[^>]*)?>(.*?)</w:p>").unwrap(),
            grid_span: Regex::new(r#"(?is)<w:gridSpan[^>]*w:val\s*=\s*"(\d+)""#).unwrap(),
            dc_title: Regex::new(r"(?is)<dc:title[^>]*>(.*?)</dc:title>").unwrap(),
            dc_creator: Regex::new(r"(?is)<dc:creator[^>]*>(.*?)</dc:creator>").unwrap(),
            dcterms_created: Regex::new(r"(?is)<dcterms:created[^>]*>(.*?)</dcterms:created>")
                .unwrap(),
            dcterms_modified: Regex::new(r"(?is)<dcterms:modified[^>]*>(.*?)</dcterms:modified>")
                .unwrap(),
        }
    }

    /// Lower the document body to markup, collecting the plain text and
    /// any style warnings along the way.
    fn lower_body(&self, body: &str) -> (String, String, Vec<String>) {
        let mut markup_blocks: Vec<String> = Vec::new();
        let mut raw_blocks: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        for caps in self.block.captures_iter(body) {
            if let Some(table) = caps.name("tbl") {
                self.lower_table(table.as_str(), &mut markup_blocks, &mut raw_blocks);
            } else if let Some(para) = caps.name("para") {
                self.lower_paragraph(para.as_str(), &mut markup_blocks, &mut raw_blocks, &mut warnings);
            }
        }

        (markup_blocks.join("\n"), raw_blocks.join("\n\n"), warnings)
    }

    fn lower_paragraph(
        &self,
        inner: &str,
        markup_blocks: &mut Vec<String>,
        raw_blocks: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) {
        let text = self.lower_runs(inner);
        if text.plain.trim().is_empty() {
            return;
        }

        let style = self
            .p_style
            .captures(inner)
            .map(|caps| caps[1].to_string());
        let level = style.as_deref().and_then(heading_level);

        if let Some(style) = &style {
            if level.is_none() && !is_mapped_style(style) {
                let warning = format!("Unrecognised paragraph style: {}", style);
                if !warnings.contains(&warning) {
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        let block = if let Some(level) = level {
            format!("<h{}>{}</h{}>", level, text.markup, level)
        } else if self.num_pr.is_match(inner) {
            format!("<li>{}</li>", text.markup)
        } else {
            format!("<p>{}</p>", text.markup)
        };
        markup_blocks.push(block);
        raw_blocks.push(text.plain.trim().to_string());
    }

    fn lower_table(
        &self,
        table: &str,
        markup_blocks: &mut Vec<String>,
        raw_blocks: &mut Vec<String>,
    ) {
        let mut markup = String::from("<table>");
        for row_caps in self.row.captures_iter(table) {
            let mut plain_cells: Vec<String> = Vec::new();
            markup.push_str("<tr>");
            for cell_caps in self.cell.captures_iter(&row_caps[1]) {
                let cell_inner = &cell_caps[1];
                let text = self.lower_cell_text(cell_inner);
                let span = self
                    .grid_span
                    .captures(cell_inner)
                    .and_then(|caps| caps[1].parse::<u8>().ok())
                    .filter(|span| *span > 1);
                match span {
                    Some(span) => {
                        markup.push_str(&format!("<td colspan=\"{}\">{}</td>", span, text.markup))
                    }
                    None => markup.push_str(&format!("<td>{}</td>", text.markup)),
                }
                plain_cells.push(text.plain);
            }
            markup.push_str("</tr>");
            raw_blocks.push(plain_cells.join("\t"));
        }
        markup.push_str("</table>");
        markup_blocks.push(markup);
    }

    /// Concatenate the cell's paragraphs into one cell text.
    fn lower_cell_text(&self, cell_inner: &str) -> LoweredText {
        let mut markup_parts: Vec<String> = Vec::new();
        let mut plain_parts: Vec<String> = Vec::new();
        for para in self.cell_para.captures_iter(cell_inner) {
            let text = self.lower_runs(&para[1]);
            if text.plain.trim().is_empty() {
                continue;
            }
            markup_parts.push(text.markup.trim().to_string());
            plain_parts.push(text.plain.trim().to_string());
        }
        LoweredText {
            markup: markup_parts.join(" "),
            plain: plain_parts.join(" "),
        }
    }

    /// Lower every run in the given scope, applying bold/italic wraps.
    fn lower_runs(&self, scope: &str) -> LoweredText {
        let mut markup = String::new();
        let mut plain = String::new();

        for run_caps in self.run.captures_iter(scope) {
            let run_inner = &run_caps[1];
            let props = self
                .run_props
                .captures(run_inner)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();
            let bold = self.bold.is_match(&props) && !self.bold_off.is_match(&props);
            let italic = self.italic.is_match(&props) && !self.italic_off.is_match(&props);

            let mut run_markup = String::new();
            let mut run_plain = String::new();
            for piece in self.run_piece.captures_iter(run_inner) {
                if let Some(text) = piece.get(1) {
                    run_markup.push_str(&markup_safe(text.as_str()));
                    run_plain.push_str(&decode_xml_entities(text.as_str()));
                } else if piece.get(0).map_or(false, |m| m.as_str().starts_with("<w:tab")) {
                    run_markup.push('\t');
                    run_plain.push('\t');
                } else {
                    run_markup.push_str("<br/>");
                    run_plain.push('\n');
                }
            }
            if run_plain.is_empty() {
                continue;
            }

            if italic {
                run_markup = format!("<em>{}</em>", run_markup);
            }
            if bold {
                run_markup = format!("<strong>{}</strong>", run_markup);
            }
            markup.push_str(&run_markup);
            plain.push_str(&run_plain);
        }

        LoweredText { markup, plain }
    }

    /// Map `docProps/core.xml` onto document metadata.
    fn parse_core(&self, xml: &str) -> Option<Metadata> {
        let field = |re: &Regex| {
            re.captures(xml)
                .map(|caps| decode_xml_entities(caps[1].trim()))
                .filter(|value| !value.is_empty())
        };
        let date = |re: &Regex| {
            field(re).and_then(|value| {
                DateTime::parse_from_rfc3339(&value)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            })
        };

        let metadata = Metadata {
            title: field(&self.dc_title),
            author: field(&self.dc_creator),
            created: date(&self.dcterms_created),
            modified: date(&self.dcterms_modified),
        };
        if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        }
    }
}

impl FormatAdapter for DocxAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        let archive = OpcArchive::open(bytes)?;
        let document_xml = archive.read_string("word/document.xml")?;

        let body = match self.body.captures(&document_xml) {
            Some(caps) => caps[1].to_string(),
            None => document_xml,
        };
        let (markup, raw_text, warnings) = self.lower_body(&body);
        log::debug!(
            "{}: lowered docx body to {} markup bytes",
            file_name,
            markup.len()
        );

        let mut decoded = Decoded::new(DocumentFormat::Docx, raw_text)
            .with_markup(markup)
            .with_warnings(warnings);
        if let Some(metadata) = archive
            .read_string("docProps/core.xml")
            .ok()
            .and_then(|xml| self.parse_core(&xml))
        {
            decoded = decoded.with_metadata(metadata);
        }
        Ok(decoded)
    }
}

impl Default for DocxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a paragraph style id like `Heading2` (or `heading 2`) to a level.
fn heading_level(style: &str) -> Option<u8> {
    let normalized = style.to_lowercase().replace(' ', "");
    let level: u8 = normalized.strip_prefix("heading")?.parse().ok()?;
    if (1..=6).contains(&level) {
        Some(level)
    } else {
        None
    }
}

/// Styles lowered without a dedicated element.
fn is_mapped_style(style: &str) -> bool {
    let normalized = style.to_lowercase().replace(' ', "");
    matches!(normalized.as_str(), "normal" | "listparagraph" | "bodytext")
}

/// Rewrite the one XML entity the markup pipeline does not know.
fn markup_safe(text: &str) -> String {
    text.replace("&apos;", "&#39;")
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::super::opc::stored_zip;
    use super::*;

    fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    fn styled_paragraph(style: &str, text: &str) -> String {
        format!(
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
            style, text
        )
    }

    fn document_zip(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document><w:body>{}</w:body></w:document>",
            body
        );
        stored_zip(&[("word/document.xml", xml.as_bytes())])
    }

    #[test]
    fn test_decode_headings_and_paragraphs() {
        let body = format!(
            "{}{}{}",
            styled_paragraph("Heading1", "Overview"),
            paragraph("Intro text."),
            styled_paragraph("Heading2", "Scope"),
        );
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(&body), "sow.docx").unwrap();

        assert_eq!(decoded.format, DocumentFormat::Docx);
        let markup = decoded.body_markup.unwrap();
        assert!(markup.contains("<h1>Overview</h1>"));
        assert!(markup.contains("<p>Intro text.</p>"));
        assert!(markup.contains("<h2>Scope</h2>"));
        assert_eq!(decoded.raw_text, "Overview\n\nIntro text.\n\nScope");
    }

    #[test]
    fn test_decode_bold_italic_runs() {
        let body = "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Deadline</w:t></w:r>\
                    <w:r><w:t> is firm, </w:t></w:r>\
                    <w:r><w:rPr><w:i/></w:rPr><w:t>really</w:t></w:r></w:p>";
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(body), "x.docx").unwrap();

        let markup = decoded.body_markup.unwrap();
        assert!(markup.contains("<strong>Deadline</strong>"));
        assert!(markup.contains("<em>really</em>"));
        assert_eq!(decoded.raw_text, "Deadline is firm, really");
    }

    #[test]
    fn test_decode_bold_val_false_is_plain() {
        let body = "<w:p><w:r><w:rPr><w:b w:val=\"false\"/></w:rPr><w:t>plain</w:t></w:r></w:p>";
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(body), "x.docx").unwrap();
        assert!(!decoded.body_markup.unwrap().contains("<strong>"));
    }

    #[test]
    fn test_decode_numbered_paragraphs_as_list_items() {
        let body = "<w:p><w:pPr><w:numPr><w:ilvl w:val=\"0\"/></w:numPr></w:pPr>\
                    <w:r><w:t>first deliverable</w:t></w:r></w:p>";
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(body), "x.docx").unwrap();
        assert!(decoded
            .body_markup
            .unwrap()
            .contains("<li>first deliverable</li>"));
    }

    #[test]
    fn test_decode_table_with_grid_span() {
        let body = "<w:tbl><w:tr>\
                    <w:tc><w:p><w:r><w:t>Phase</w:t></w:r></w:p></w:tc>\
                    <w:tc><w:p><w:r><w:t>Cost</w:t></w:r></w:p></w:tc></w:tr>\
                    <w:tr><w:tc><w:tcPr><w:gridSpan w:val=\"2\"/></w:tcPr>\
                    <w:p><w:r><w:t>Total</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(body), "x.docx").unwrap();

        let markup = decoded.body_markup.unwrap();
        assert!(markup.contains("<table><tr><td>Phase</td><td>Cost</td></tr>"));
        assert!(markup.contains("<td colspan=\"2\">Total</td>"));
        assert_eq!(decoded.raw_text, "Phase\tCost\n\nTotal");
    }

    #[test]
    fn test_decode_table_paragraphs_not_duplicated() {
        let body = format!(
            "{}<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            paragraph("before table")
        );
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(&body), "x.docx").unwrap();

        let markup = decoded.body_markup.unwrap();
        assert_eq!(markup.matches("cell").count(), 1);
        assert!(!markup.contains("<p>cell</p>"));
    }

    #[test]
    fn test_decode_unmapped_style_warns_once() {
        let body = format!(
            "{}{}",
            styled_paragraph("Quote", "first"),
            styled_paragraph("Quote", "second")
        );
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(&body), "x.docx").unwrap();
        assert_eq!(
            decoded.warnings,
            vec!["Unrecognised paragraph style: Quote".to_string()]
        );
    }

    #[test]
    fn test_decode_xml_entities_in_text() {
        let body = paragraph("Fees &amp; Terms &lt;net 30&gt;");
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&document_zip(&body), "x.docx").unwrap();
        assert_eq!(decoded.raw_text, "Fees & Terms <net 30>");
    }

    #[test]
    fn test_decode_core_properties() {
        let document = "<w:document><w:body><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body></w:document>";
        let core = "<cp:coreProperties><dc:title>Project SOW</dc:title>\
                    <dc:creator>Jordan Lee</dc:creator>\
                    <dcterms:created>2024-01-15T09:30:00Z</dcterms:created>\
                    <dcterms:modified>2024-02-01T16:45:00Z</dcterms:modified></cp:coreProperties>";
        let zip = stored_zip(&[
            ("word/document.xml", document.as_bytes()),
            ("docProps/core.xml", core.as_bytes()),
        ]);
        let adapter = DocxAdapter::new();
        let decoded = adapter.decode(&zip, "x.docx").unwrap();

        let metadata = decoded.metadata.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Project SOW"));
        assert_eq!(metadata.author.as_deref(), Some("Jordan Lee"));
        assert_eq!(
            metadata.created.unwrap().to_rfc3339(),
            "2024-01-15T09:30:00+00:00"
        );
    }

    #[test]
    fn test_decode_missing_document_part() {
        let zip = stored_zip(&[("word/styles.xml", b"<w:styles/>".as_slice())]);
        let adapter = DocxAdapter::new();
        assert!(adapter.decode(&zip, "x.docx").is_err());
    }

    #[test]
    fn test_heading_level_forms() {
        assert_eq!(heading_level("Heading1"), Some(1));
        assert_eq!(heading_level("heading 3"), Some(3));
        assert_eq!(heading_level("Heading7"), None);
        assert_eq!(heading_level("Quote"), None);
    }
}
