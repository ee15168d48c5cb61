//! # undoc
//!
//! Structural document parsing for contract and statement-of-work files.
//!
//! This library decodes DOCX, PDF, HTML and plain-text documents and
//! recovers their structure: sections split at headings, tables, source
//! metadata, and a flattened list of content items for review tooling.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undoc::{parse_file, to_content_items};
//!
//! fn main() -> undoc::Result<()> {
//!     // Parse a document file
//!     let doc = parse_file("statement-of-work.docx")?;
//!     println!("{} sections, {} tables", doc.section_count(), doc.table_count());
//!
//!     // Flatten into ordered content items
//!     for item in to_content_items(&doc) {
//!         println!("[{}] {}", item.content_type, item.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple input formats**: DOCX, PDF, HTML, plain text, Markdown
//! - **Structure recovery**: headings, sections, paragraphs, lists, tables
//! - **Heuristic heading detection**: formats without explicit markup still segment
//! - **Metadata extraction**: title, author and dates where the source carries them
//! - **Parallel processing**: Uses Rayon for multi-file batches

pub mod adapter;
pub mod detect;
pub mod error;
mod items;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use adapter::{AdapterRegistry, Decoded, FormatAdapter};
pub use error::{Error, Result};
pub use items::to_content_items;
pub use model::{
    ContentItem, ContentType, Document, DocumentFormat, Metadata, Section, Table, TableCell,
    TableRow,
};
pub use parser::{DocumentParser, HeadingConfig, ParseOptions, TableConfig};

use std::path::Path;

/// Parse a document file and return its structure.
///
/// The adapter is chosen by file extension; the bytes are decoded and
/// segmented into sections and tables.
///
/// # Arguments
///
/// * `path` - Path to the document file
///
/// # Example
///
/// ```no_run
/// use undoc::parse_file;
///
/// let doc = parse_file("contract.pdf").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a document file with custom options.
///
/// # Example
///
/// ```no_run
/// use undoc::{parse_file_with_options, HeadingConfig, ParseOptions};
///
/// let options = ParseOptions::new().with_heading(HeadingConfig {
///     max_line_len: 120,
///     ..Default::default()
/// });
/// let doc = parse_file_with_options("notes.txt", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let decoded = AdapterRegistry::with_defaults().decode_file(path)?;
    Ok(DocumentParser::with_options(&options).parse(decoded, file_name_of(path)))
}

/// Parse a document from bytes.
///
/// The file name supplies the extension that picks the adapter.
///
/// # Arguments
///
/// * `bytes` - Document file content
/// * `file_name` - Original file name, extension included
///
/// # Example
///
/// ```no_run
/// use undoc::parse_bytes;
///
/// let data = std::fs::read("contract.docx").unwrap();
/// let doc = parse_bytes(&data, "contract.docx").unwrap();
/// ```
pub fn parse_bytes(bytes: &[u8], file_name: &str) -> Result<Document> {
    parse_bytes_with_options(bytes, file_name, ParseOptions::default())
}

/// Parse a document from bytes with custom options.
pub fn parse_bytes_with_options(
    bytes: &[u8],
    file_name: &str,
    options: ParseOptions,
) -> Result<Document> {
    let decoded = AdapterRegistry::with_defaults().decode_bytes(bytes, file_name)?;
    Ok(DocumentParser::with_options(&options).parse(decoded, file_name))
}

/// Parse many document files in parallel.
///
/// Results come back in input order; a failed file yields its error
/// without affecting the others.
///
/// # Example
///
/// ```no_run
/// use undoc::parse_files;
///
/// let paths = ["a.docx", "b.pdf", "c.txt"];
/// for result in parse_files(&paths) {
///     match result {
///         Ok(doc) => println!("{}: {} sections", doc.file_name, doc.section_count()),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
pub fn parse_files<P: AsRef<Path> + Sync>(paths: &[P]) -> Vec<Result<Document>> {
    use rayon::prelude::*;

    let registry = AdapterRegistry::with_defaults();
    let parser = DocumentParser::new();
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let decoded = registry.decode_file(path)?;
            Ok(parser.parse(decoded, file_name_of(path)))
        })
        .collect()
}

/// Serialize a document to pretty-printed JSON.
///
/// # Example
///
/// ```no_run
/// use undoc::{parse_file, to_json};
///
/// let doc = parse_file("contract.docx").unwrap();
/// std::fs::write("contract.json", to_json(&doc).unwrap()).unwrap();
/// ```
pub fn to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a document file without blocking the async runtime.
///
/// Reads the file with `tokio::fs` and runs the parse on the blocking
/// pool.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await?;
    let file_name = file_name_of(&path).to_string();
    tokio::task::spawn_blocking(move || parse_bytes(&bytes, &file_name))
        .await
        .map_err(|e| Error::Other(format!("parse task failed: {}", e)))?
}

fn file_name_of(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
}
