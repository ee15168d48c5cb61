//! Format adapters providing a plugin architecture for multiple formats.
//!
//! This module defines the decode layer: each adapter turns the raw bytes
//! of one file format into a [`Decoded`] body (plain text, optional
//! markup, metadata, warnings) for the structural parser. Adapters are
//! registered by file extension and dispatched through a registry.
//!
//! # Example
//!
//! ```no_run
//! use undoc::adapter::{AdapterRegistry, TextAdapter};
//! use std::sync::Arc;
//!
//! fn main() -> undoc::Result<()> {
//!     let mut registry = AdapterRegistry::new();
//!     registry.register(Arc::new(TextAdapter::new()));
//!
//!     let decoded = registry.decode_bytes(b"hello world", "notes.txt")?;
//!     println!("{}", decoded.raw_text);
//!     Ok(())
//! }
//! ```

mod doc;
mod docx;
mod html;
mod opc;
mod pdf;
mod text;

pub use doc::DocAdapter;
pub use docx::DocxAdapter;
pub use html::HtmlAdapter;
pub use opc::OpcArchive;
pub use pdf::PdfAdapter;
pub use text::TextAdapter;

use crate::detect::file_extension;
use crate::error::{Error, Result};
use crate::model::{DocumentFormat, Metadata};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Decoded document body, ready for structural parsing.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Format the bytes were decoded as
    pub format: DocumentFormat,

    /// Full plain text of the document
    pub raw_text: String,

    /// Normalized markup body, when the format carries structural markup
    pub body_markup: Option<String>,

    /// Source document metadata, when the format carries any
    pub metadata: Option<Metadata>,

    /// Non-fatal problems encountered while decoding
    pub warnings: Vec<String>,
}

impl Decoded {
    /// Create a decoded body with plain text only.
    pub fn new(format: DocumentFormat, raw_text: impl Into<String>) -> Self {
        Self {
            format,
            raw_text: raw_text.into(),
            body_markup: None,
            metadata: None,
            warnings: Vec::new(),
        }
    }

    /// Set the markup body.
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.body_markup = Some(markup.into());
        self
    }

    /// Set document metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Append decode warnings.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Whether the body carries structural markup.
    pub fn has_markup(&self) -> bool {
        self.body_markup.is_some()
    }
}

/// Trait for format adapters.
///
/// Implement this trait to add support for a new document format.
pub trait FormatAdapter: Send + Sync {
    /// Get the supported file extensions for this adapter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this adapter.
    fn name(&self) -> &str;

    /// Decode document bytes into a parseable body.
    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded>;

    /// Decode a file at the given path.
    fn decode_file(&self, path: &Path) -> Result<Decoded> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        self.decode(&bytes, file_name)
    }

    /// Check if this adapter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for format adapters.
///
/// The registry maps file extensions to adapters and provides
/// convenient methods for decoding documents.
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn FormatAdapter>>,
    by_name: HashMap<String, Arc<dyn FormatAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the default adapters (docx, doc, pdf, html, text).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxAdapter::new()));
        registry.register(Arc::new(DocAdapter::new()));
        registry.register(Arc::new(PdfAdapter::new()));
        registry.register(Arc::new(HtmlAdapter::new()));
        registry.register(Arc::new(TextAdapter::new()));
        registry
    }

    /// Register an adapter.
    ///
    /// The adapter will be registered for all its supported extensions.
    pub fn register(&mut self, adapter: Arc<dyn FormatAdapter>) {
        for ext in adapter.supported_extensions() {
            self.adapters.insert(ext.to_lowercase(), adapter.clone());
        }
        self.by_name.insert(adapter.name().to_lowercase(), adapter);
    }

    /// Get an adapter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn FormatAdapter>> {
        self.adapters.get(&ext.to_lowercase()).cloned()
    }

    /// Get an adapter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn FormatAdapter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.adapters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.adapters.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Render the supported formats as an "A, B, or C" list for error messages.
    pub fn supported_summary(&self) -> String {
        let extensions: Vec<String> = self
            .supported_extensions()
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect();
        match extensions.len() {
            0 => String::from("supported"),
            1 => extensions[0].clone(),
            _ => format!(
                "{}, or {}",
                extensions[..extensions.len() - 1].join(", "),
                extensions[extensions.len() - 1]
            ),
        }
    }

    /// Decode a file using the adapter registered for its extension.
    pub fn decode_file(&self, path: &Path) -> Result<Decoded> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        self.decode_bytes(&bytes, file_name)
    }

    /// Decode bytes using the file name's extension to pick the adapter.
    pub fn decode_bytes(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        let adapter = file_extension(file_name)
            .and_then(|ext| self.get_by_extension(&ext))
            .ok_or_else(|| self.unsupported(file_name))?;

        log::debug!(
            "decoding {} ({} bytes) with the {} adapter",
            file_name,
            bytes.len(),
            adapter.name()
        );
        adapter.decode(bytes, file_name)
    }

    fn unsupported(&self, file_name: &str) -> Error {
        Error::UnsupportedFormat {
            file_name: file_name.to_string(),
            supported: self.supported_summary(),
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
