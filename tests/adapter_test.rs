//! Integration tests for the adapter module.

use std::sync::Arc;
use undoc::adapter::{AdapterRegistry, Decoded, FormatAdapter};
use undoc::error::{Error, Result};
use undoc::model::DocumentFormat;

/// Mock adapter for testing.
struct MockAdapter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockAdapter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl FormatAdapter for MockAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, _bytes: &[u8], _file_name: &str) -> Result<Decoded> {
        Ok(Decoded::new(
            DocumentFormat::Text,
            format!("Decoded by {}", self.name),
        ))
    }
}

#[test]
fn test_adapter_registry_new() {
    let registry = AdapterRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("docx"));
    assert!(!registry.supports("pdf"));
}

#[test]
fn test_adapter_registry_with_defaults() {
    let registry = AdapterRegistry::with_defaults();

    assert!(registry.supports("docx"));
    assert!(registry.supports("doc"));
    assert!(registry.supports("pdf"));
    assert!(registry.supports("html"));
    assert!(registry.supports("txt"));
    assert!(registry.supports("md"));
    assert!(registry.supports("DOCX")); // Case insensitive
    assert!(!registry.supports("xlsx"));
}

#[test]
fn test_adapter_registry_register() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(MockAdapter::new(vec!["rtf", "wpd"], "legacy")));

    assert!(registry.supports("rtf"));
    assert!(registry.supports("wpd"));
    assert!(registry.supports("RTF")); // Case insensitive
}

#[test]
fn test_adapter_registry_get_by_extension() {
    let registry = AdapterRegistry::with_defaults();

    let adapter = registry.get_by_extension("docx");
    assert!(adapter.is_some());
    assert_eq!(adapter.unwrap().name(), "docx");

    let adapter = registry.get_by_extension("xlsx");
    assert!(adapter.is_none());
}

#[test]
fn test_adapter_registry_get_by_name() {
    let registry = AdapterRegistry::with_defaults();

    assert!(registry.get_by_name("pdf").is_some());
    assert!(registry.get_by_name("PDF").is_some()); // Case insensitive
    assert!(registry.get_by_name("unknown").is_none());
}

#[test]
fn test_supported_extensions_are_sorted() {
    let registry = AdapterRegistry::with_defaults();
    let extensions = registry.supported_extensions();

    assert!(extensions.contains(&"docx"));
    assert!(extensions.contains(&"pdf"));
    let mut sorted = extensions.clone();
    sorted.sort_unstable();
    assert_eq!(extensions, sorted);
}

#[test]
fn test_supported_summary_lists_extensions() {
    let registry = AdapterRegistry::with_defaults();
    let summary = registry.supported_summary();

    assert!(summary.contains("DOCX"));
    assert!(summary.contains("PDF"));
    assert!(summary.contains(", or "));
}

#[test]
fn test_decode_bytes_dispatches_on_extension() {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(MockAdapter::new(vec!["mock"], "mock-adapter")));

    let decoded = registry.decode_bytes(b"payload", "notes.mock").unwrap();
    assert_eq!(decoded.raw_text, "Decoded by mock-adapter");
    assert_eq!(decoded.format, DocumentFormat::Text);
}

#[test]
fn test_decode_bytes_unsupported_extension() {
    let registry = AdapterRegistry::with_defaults();

    let err = registry.decode_bytes(b"data", "budget.xlsx").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));

    let message = err.to_string();
    assert!(message.starts_with("Unsupported file type: budget.xlsx."));
    assert!(message.contains("Please upload a"));
    assert!(message.ends_with("file."));
}

#[test]
fn test_decode_bytes_no_extension() {
    let registry = AdapterRegistry::with_defaults();
    assert!(registry.decode_bytes(b"data", "README").is_err());
}

#[test]
fn test_legacy_doc_error_message() {
    let registry = AdapterRegistry::with_defaults();
    let ole2 = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    let err = registry.decode_bytes(&ole2, "contract.doc").unwrap_err();
    assert!(matches!(err, Error::LegacyDoc { .. }));

    let message = err.to_string();
    assert!(message.contains("Legacy .doc format is not directly supported"));
    assert!(message.contains("\"contract.doc\""));
    assert!(message.contains("Save As"));
}

#[test]
fn test_encrypted_pdf_is_rejected() {
    let registry = AdapterRegistry::with_defaults();
    let bytes = b"%PDF-1.7\ntrailer << /Encrypt 9 0 R >>\n%%EOF";

    let err = registry.decode_bytes(bytes, "locked.pdf").unwrap_err();
    assert!(matches!(err, Error::Encrypted));
    assert_eq!(err.to_string(), "Document is encrypted");
}

#[test]
fn test_text_adapter_passthrough() {
    let registry = AdapterRegistry::with_defaults();

    let decoded = registry
        .decode_bytes("OVERVIEW\nplain body".as_bytes(), "sow.txt")
        .unwrap();
    assert_eq!(decoded.format, DocumentFormat::Text);
    assert_eq!(decoded.raw_text, "OVERVIEW\nplain body");
    assert!(decoded.body_markup.is_none());
}

#[test]
fn test_html_adapter_produces_markup() {
    let registry = AdapterRegistry::with_defaults();
    let html = b"<html><head><title>Plan</title></head><body><h1>Scope</h1></body></html>";

    let decoded = registry.decode_bytes(html, "plan.html").unwrap();
    assert_eq!(decoded.format, DocumentFormat::Html);
    assert!(decoded.has_markup());
    assert_eq!(
        decoded.metadata.and_then(|m| m.title),
        Some("Plan".to_string())
    );
}

#[test]
fn test_mock_adapter() {
    let adapter = MockAdapter::new(vec!["mock"], "mock-adapter");

    assert_eq!(adapter.name(), "mock-adapter");
    assert!(adapter.supports_extension("mock"));
    assert!(adapter.supports_extension("MOCK"));
    assert!(!adapter.supports_extension("docx"));

    let decoded = adapter.decode(b"ignored", "test.mock").unwrap();
    assert!(decoded.raw_text.contains("mock-adapter"));
}
