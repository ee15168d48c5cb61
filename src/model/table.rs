//! Table types.

use serde::{Deserialize, Serialize};

use super::content::fresh_id;

/// A table extracted from a document.
///
/// Rows are rectangular: every row is padded with empty trailing cells
/// up to the widest row's column count, on both the markup and the
/// plain-text extraction path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Unique opaque id
    pub id: String,

    /// Rows in the table, header row included
    pub rows: Vec<TableRow>,

    /// Texts of the first row, kept as a header convenience view
    pub headers: Option<Vec<String>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            id: fresh_id("table"),
            rows: Vec::new(),
            headers: None,
        }
    }

    /// Build a table from raw cell rows.
    ///
    /// Pads every row to the widest row's width and takes the first
    /// row's texts as the header view.
    pub fn from_rows(rows: Vec<Vec<TableCell>>) -> Self {
        let max_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows: Vec<TableRow> = rows
            .into_iter()
            .map(|mut cells| {
                while cells.len() < max_cols {
                    cells.push(TableCell::empty());
                }
                TableRow::new(cells)
            })
            .collect();
        let headers = rows
            .first()
            .map(|row| row.cells.iter().map(|c| c.text.clone()).collect());
        Self {
            id: fresh_id("table"),
            rows,
            headers,
        }
    }

    /// Build a table from plain string rows.
    pub fn from_text_rows<S: Into<String>>(rows: Vec<Vec<S>>) -> Self {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(TableCell::text).collect())
                .collect(),
        )
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation: one line per row, cells joined
    /// with " | ".
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// A table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text, markup stripped and trimmed
    pub text: String,

    /// Rows this cell spans, when the source markup declares one
    pub row_span: Option<u8>,

    /// Columns this cell spans, when the source markup declares one
    pub col_span: Option<u8>,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            row_span: None,
            col_span: None,
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Set the row span and return self.
    pub fn row_span(mut self, span: u8) -> Self {
        self.row_span = Some(span);
        self
    }

    /// Set the column span and return self.
    pub fn col_span(mut self, span: u8) -> Self {
        self.col_span = Some(span);
        self
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.headers, None);
    }

    #[test]
    fn test_from_text_rows_sets_headers() {
        let table = Table::from_text_rows(vec![
            vec!["Milestone", "Date"],
            vec!["Kickoff", "2024-01-15"],
        ]);
        assert!(table.id.starts_with("table-"));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(
            table.headers,
            Some(vec!["Milestone".to_string(), "Date".to_string()])
        );
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = Table::from_text_rows(vec![
            vec!["Phase", "Start", "End"],
            vec!["Discovery"],
            vec!["Build", "Q2"],
        ]);
        for row in &table.rows {
            assert_eq!(row.cells.len(), 3);
        }
        assert_eq!(table.rows[1].cells[1].text, "");
        assert_eq!(table.rows[2].cells[2].text, "");
    }

    #[test]
    fn test_plain_text_joins_with_pipes() {
        let table = Table::from_text_rows(vec![vec!["a", "b"], vec!["c", "d"]]);
        assert_eq!(table.plain_text(), "a | b\nc | d");
    }

    #[test]
    fn test_cell_spans() {
        let cell = TableCell::text("Merged").col_span(2);
        assert_eq!(cell.col_span, Some(2));
        assert_eq!(cell.row_span, None);
        assert!(!cell.is_empty());
        assert!(TableCell::empty().is_empty());
    }
}
