//! Table extraction for markup and plain-text documents.
//!
//! Markup documents declare their tables; extraction there is a matter of
//! walking `<table>` regions and stripping cell contents. Plain text has
//! no such markers, so rows are recognized per line by separator shape
//! (tabs, pipes, or wide space gaps) and a contiguous run of row-like
//! lines becomes a table once it is long enough.

use regex::Regex;

use super::normalize::MarkupNormalizer;
use super::options::TableConfig;
use crate::model::{Table, TableCell};

/// Extracts tables from both input flavors.
pub struct TableExtractor {
    config: TableConfig,
    table_region: Regex,
    row_tag: Regex,
    cell_tag: Regex,
    col_span_attr: Regex,
    row_span_attr: Regex,
    column_gap: Regex,
    normalizer: MarkupNormalizer,
}

impl TableExtractor {
    /// Create a new table extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a new table extractor with custom configuration.
    pub fn with_config(config: TableConfig) -> Self {
        let gap_pattern = format!(r"\s{{{},}}", config.column_gap);
        Self {
            table_region: Regex::new(r"(?is)<table[^>]*>(.*?)</table>").unwrap(),
            row_tag: Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap(),
            cell_tag: Regex::new(r"(?is)<t[dh]([^>]*)>(.*?)</t[dh]>").unwrap(),
            col_span_attr: Regex::new(r#"(?i)colspan\s*=\s*"?(\d+)"?"#).unwrap(),
            row_span_attr: Regex::new(r#"(?i)rowspan\s*=\s*"?(\d+)"?"#).unwrap(),
            column_gap: Regex::new(&gap_pattern).unwrap(),
            normalizer: MarkupNormalizer::new(),
            config,
        }
    }

    /// Extract all `<table>` regions from markup.
    ///
    /// Returns the tables plus the markup with those regions removed, so
    /// the section segmenter never sees table rows as body text.
    pub fn extract_markup_tables(&self, markup: &str) -> (Vec<Table>, String) {
        let mut tables = Vec::new();
        for caps in self.table_region.captures_iter(markup) {
            if let Some(table) = self.parse_markup_table(&caps[1]) {
                tables.push(table);
            }
        }
        let remaining = self.table_region.replace_all(markup, "").to_string();
        log::debug!("extracted {} markup tables", tables.len());
        (tables, remaining)
    }

    fn parse_markup_table(&self, inner: &str) -> Option<Table> {
        let mut rows: Vec<Vec<TableCell>> = Vec::new();
        for row_caps in self.row_tag.captures_iter(inner) {
            let mut cells = Vec::new();
            for cell_caps in self.cell_tag.captures_iter(&row_caps[1]) {
                let mut cell = TableCell::text(self.normalizer.strip(&cell_caps[2]));
                if let Some(span) = parse_span(&self.col_span_attr, &cell_caps[1]) {
                    cell = cell.col_span(span);
                }
                if let Some(span) = parse_span(&self.row_span_attr, &cell_caps[1]) {
                    cell = cell.row_span(span);
                }
                cells.push(cell);
            }
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        if rows.is_empty() {
            None
        } else {
            Some(Table::from_rows(rows))
        }
    }

    /// Classify a plain-text line as a table row.
    ///
    /// Separators are tried in order: tabs (empty cells kept), pipes
    /// (empty cells dropped), then runs of spaces at least `column_gap`
    /// wide (empty cells dropped, bounded column count).
    pub fn detect_row(&self, line: &str) -> Option<Vec<String>> {
        if line.contains('\t') {
            let cells: Vec<String> = line.split('\t').map(|c| c.trim().to_string()).collect();
            if cells.len() >= self.config.min_columns {
                return Some(cells);
            }
        }

        if line.contains('|') {
            let cells: Vec<String> = line
                .split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if cells.len() >= self.config.min_columns {
                return Some(cells);
            }
        }

        if self.column_gap.is_match(line) {
            let cells: Vec<String> = self
                .column_gap
                .split(line)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if cells.len() >= self.config.min_columns && cells.len() <= self.config.max_columns {
                return Some(cells);
            }
        }

        None
    }

    /// Close a run of candidate rows.
    ///
    /// A run shorter than `min_rows` is discarded as a false positive;
    /// its lines do not reappear as body text.
    pub fn close_run(&self, run: &mut Vec<Vec<String>>) -> Option<Table> {
        let rows = std::mem::take(run);
        if rows.len() >= self.config.min_rows {
            Some(Table::from_text_rows(rows))
        } else {
            if !rows.is_empty() {
                log::debug!("discarding {}-row table candidate", rows.len());
            }
            None
        }
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_span(attr: &Regex, attrs: &str) -> Option<u8> {
    attr.captures(attrs)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|&span| span > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_separated_rows() {
        let extractor = TableExtractor::new();
        assert_eq!(
            extractor.detect_row("Name\tRole"),
            Some(vec!["Name".to_string(), "Role".to_string()])
        );
        // Tabs keep empty cells so sparse grid columns stay aligned
        assert_eq!(
            extractor.detect_row("Kickoff\t\t2024-02-01"),
            Some(vec![
                "Kickoff".to_string(),
                "".to_string(),
                "2024-02-01".to_string()
            ])
        );
    }

    #[test]
    fn test_pipe_separated_rows() {
        let extractor = TableExtractor::new();
        assert_eq!(
            extractor.detect_row("| Milestone | Date |"),
            Some(vec!["Milestone".to_string(), "Date".to_string()])
        );
        // A trailing pipe leaves a single cell, which is not a row
        assert_eq!(extractor.detect_row("50% due on signing |"), None);
    }

    #[test]
    fn test_space_aligned_rows() {
        let extractor = TableExtractor::new();
        assert_eq!(
            extractor.detect_row("a   b   c"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        // Two spaces is normal prose spacing
        assert_eq!(extractor.detect_row("a  b"), None);
    }

    #[test]
    fn test_space_aligned_rows_bound_column_count() {
        let extractor = TableExtractor::new();
        let line = (0..11).map(|i| i.to_string()).collect::<Vec<_>>().join("    ");
        assert_eq!(extractor.detect_row(&line), None);
    }

    #[test]
    fn test_prose_is_not_a_row() {
        let extractor = TableExtractor::new();
        assert_eq!(
            extractor.detect_row("The vendor will invoice monthly."),
            None
        );
    }

    #[test]
    fn test_close_run_threshold() {
        let extractor = TableExtractor::new();

        let mut short = vec![vec!["a".to_string(), "b".to_string()]];
        assert!(extractor.close_run(&mut short).is_none());
        assert!(short.is_empty());

        let mut run = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string(), "f".to_string()],
        ];
        let table = extractor.close_run(&mut run).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert!(run.is_empty());
    }

    #[test]
    fn test_markup_table_extraction() {
        let extractor = TableExtractor::new();
        let markup = "<p>Before</p>\
                      <table><tr><th>Item</th><th>Cost</th></tr>\
                      <tr><td>Design</td><td>$5,000</td></tr></table>\
                      <p>After</p>";
        let (tables, remaining) = extractor.extract_markup_tables(markup);

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.headers,
            Some(vec!["Item".to_string(), "Cost".to_string()])
        );
        assert_eq!(table.rows[1].cells[1].text, "$5,000");

        assert!(!remaining.contains("<table>"));
        assert!(remaining.contains("<p>Before</p>"));
        assert!(remaining.contains("<p>After</p>"));
    }

    #[test]
    fn test_markup_cells_are_stripped_and_decoded() {
        let extractor = TableExtractor::new();
        let markup = "<table><tr><td><b>Fees</b> &amp; costs</td><td>x</td></tr>\
                      <tr><td>y</td><td>z</td></tr></table>";
        let (tables, _) = extractor.extract_markup_tables(markup);
        assert_eq!(tables[0].rows[0].cells[0].text, "Fees & costs");
    }

    #[test]
    fn test_markup_ragged_rows_are_padded() {
        let extractor = TableExtractor::new();
        let markup = "<table>\
                      <tr><td>a</td><td>b</td><td>c</td></tr>\
                      <tr><td>d</td></tr>\
                      </table>";
        let (tables, _) = extractor.extract_markup_tables(markup);
        for row in &tables[0].rows {
            assert_eq!(row.cells.len(), 3);
        }
    }

    #[test]
    fn test_markup_span_attributes() {
        let extractor = TableExtractor::new();
        let markup = "<table><tr><td colspan=\"2\">Total</td><td>x</td></tr></table>";
        let (tables, _) = extractor.extract_markup_tables(markup);
        assert_eq!(tables[0].rows[0].cells[0].col_span, Some(2));
        assert_eq!(tables[0].rows[0].cells[1].col_span, None);
    }

    #[test]
    fn test_empty_markup_table_is_dropped() {
        let extractor = TableExtractor::new();
        let (tables, remaining) = extractor.extract_markup_tables("<table></table><p>text</p>");
        assert!(tables.is_empty());
        assert!(remaining.contains("<p>text</p>"));
    }
}
