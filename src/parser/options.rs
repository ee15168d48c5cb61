//! Parsing options and configuration.

/// Options for parsing documents.
///
/// The defaults match the thresholds the heuristics were tuned with;
/// override them only for unusual corpora (very long headings, wide
/// column gaps).
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Heading detection thresholds
    pub heading: HeadingConfig,

    /// Table detection thresholds
    pub table: TableConfig,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heading detection thresholds.
    pub fn with_heading(mut self, config: HeadingConfig) -> Self {
        self.heading = config;
        self
    }

    /// Set table detection thresholds.
    pub fn with_table(mut self, config: TableConfig) -> Self {
        self.table = config;
        self
    }
}

/// Heading detector configuration.
#[derive(Debug, Clone)]
pub struct HeadingConfig {
    /// Maximum line length to consider as heading
    pub max_line_len: usize,

    /// Lines ending with "." and more than this many words are prose
    pub sentence_word_limit: usize,

    /// Minimum length for the all-uppercase rule (exclusive)
    pub uppercase_min_len: usize,

    /// Maximum length for the all-uppercase rule (exclusive)
    pub uppercase_max_len: usize,

    /// Maximum length for the title-case rule (exclusive)
    pub title_case_max_len: usize,

    /// Maximum word count for the title-case rule (inclusive)
    pub title_case_max_words: usize,

    /// Fraction of words that must be capitalized for the title-case rule
    pub title_case_min_ratio: f32,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            max_line_len: 100,
            sentence_word_limit: 10,
            uppercase_min_len: 3,
            uppercase_max_len: 80,
            title_case_max_len: 60,
            title_case_max_words: 8,
            title_case_min_ratio: 0.5,
        }
    }
}

/// Table detector configuration for the plain-text path.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Minimum consecutive row-like lines to accept as a table
    pub min_rows: usize,

    /// Minimum number of cells for a line to count as a row
    pub min_columns: usize,

    /// Maximum cells for the space-separated heuristic (above this,
    /// likely word-level splitting)
    pub max_columns: usize,

    /// Consecutive spaces that separate columns
    pub column_gap: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 10,
            column_gap: 3,
        }
    }
}
