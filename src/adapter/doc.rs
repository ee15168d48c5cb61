//! Legacy .doc adapter.
//!
//! Real Word 97 binaries (OLE2 compound files) are not decoded; users
//! get a deterministic error telling them to re-save as .docx. Files
//! named .doc that actually carry the ZIP signature are modern docx
//! files with the wrong extension and are decoded as such.

use super::docx::DocxAdapter;
use super::{Decoded, FormatAdapter};
use crate::detect::is_zip_bytes;
use crate::error::{Error, Result};

/// Adapter for .doc files.
pub struct DocAdapter {
    docx: DocxAdapter,
}

impl DocAdapter {
    /// Create a new doc adapter.
    pub fn new() -> Self {
        Self {
            docx: DocxAdapter::new(),
        }
    }
}

impl FormatAdapter for DocAdapter {
    fn supported_extensions(&self) -> &[&str] {
        &["doc"]
    }

    fn name(&self) -> &str {
        "doc"
    }

    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<Decoded> {
        if is_zip_bytes(bytes) {
            log::info!(
                "{}: bytes carry the ZIP signature, decoding as docx",
                file_name
            );
            return self.docx.decode(bytes, file_name);
        }
        Err(Error::LegacyDoc {
            file_name: file_name.to_string(),
        })
    }
}

impl Default for DocAdapter {
    fn default() -> Self {
        Self::new()
    }
}
