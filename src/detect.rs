//! Container format detection from file signatures.
//!
//! Extensions decide which adapter handles a file; byte signatures settle
//! the cases where the extension lies (a renamed docx, a text file saved
//! as .pdf). Detection never reads more than the first few bytes.

use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Container format identified from a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// ZIP archive. Office Open XML documents (.docx) are ZIP packages.
    Zip,
    /// PDF document.
    Pdf,
    /// OLE2 compound file, the container of legacy binary .doc files.
    Ole2,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Zip => write!(f, "ZIP archive"),
            ContainerFormat::Pdf => write!(f, "PDF"),
            ContainerFormat::Ole2 => write!(f, "OLE2 compound file"),
        }
    }
}

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// OLE2 compound file header magic.
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Longest signature we need to inspect.
const HEADER_LEN: usize = 8;

/// Detect the container format from leading bytes.
///
/// # Arguments
/// * `data` - Byte slice starting at offset 0 of the file
///
/// # Returns
/// * `Some(ContainerFormat)` if a known signature matches
/// * `None` for anything else (including plain text)
pub fn detect_container(data: &[u8]) -> Option<ContainerFormat> {
    if data.starts_with(ZIP_MAGIC) {
        Some(ContainerFormat::Zip)
    } else if data.starts_with(PDF_MAGIC) {
        Some(ContainerFormat::Pdf)
    } else if data.starts_with(OLE2_MAGIC) {
        Some(ContainerFormat::Ole2)
    } else {
        None
    }
}

/// Detect the container format of a file on disk.
///
/// Reads at most the first [`HEADER_LEN`] bytes. Files shorter than any
/// signature simply detect as `None`.
///
/// # Example
/// ```no_run
/// use undoc::detect::detect_container_from_path;
///
/// if let Some(format) = detect_container_from_path("contract.docx").unwrap() {
///     println!("Container: {}", format);
/// }
/// ```
pub fn detect_container_from_path<P: AsRef<Path>>(path: P) -> Result<Option<ContainerFormat>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(detect_container(&header[..filled]))
}

/// Check if bytes start with the ZIP signature.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    detect_container(data) == Some(ContainerFormat::Zip)
}

/// Check if bytes start with the PDF signature.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_container(data) == Some(ContainerFormat::Pdf)
}

/// Check if bytes start with the OLE2 compound file signature.
pub fn is_ole2_bytes(data: &[u8]) -> bool {
    detect_container(data) == Some(ContainerFormat::Ole2)
}

/// Lowercased extension of a file name, without the leading dot.
///
/// Returns `None` when the name has no extension; dispatch then falls
/// through to the unsupported-format error.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zip() {
        let data = b"PK\x03\x04\x14\x00\x00\x00";
        assert_eq!(detect_container(data), Some(ContainerFormat::Zip));
        assert!(is_zip_bytes(data));
    }

    #[test]
    fn test_detect_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_container(data), Some(ContainerFormat::Pdf));
        assert!(is_pdf_bytes(data));
    }

    #[test]
    fn test_detect_ole2() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
        assert_eq!(detect_container(&data), Some(ContainerFormat::Ole2));
        assert!(is_ole2_bytes(&data));
    }

    #[test]
    fn test_detect_plain_text() {
        assert_eq!(detect_container(b"STATEMENT OF WORK\n"), None);
    }

    #[test]
    fn test_detect_too_short() {
        assert_eq!(detect_container(b"PK"), None);
        assert_eq!(detect_container(b""), None);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("contract.docx"), Some("docx".to_string()));
        assert_eq!(file_extension("REPORT.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ContainerFormat::Zip.to_string(), "ZIP archive");
        assert_eq!(ContainerFormat::Pdf.to_string(), "PDF");
    }
}
