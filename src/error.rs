//! Error types for undoc library.

use std::io;
use thiserror::Error;

/// Result type alias for undoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document parsing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No registered adapter handles the file's extension.
    ///
    /// `supported` is rendered from the adapter registry, so the message
    /// stays accurate as adapters are added or removed.
    #[error("Unsupported file type: {file_name}. Please upload a {supported} file.")]
    UnsupportedFormat {
        /// Name of the rejected file.
        file_name: String,
        /// Human-readable list of supported extensions.
        supported: String,
    },

    /// An adapter recognized the format but failed to decode the bytes.
    #[error("Failed to decode {adapter} content: {reason}")]
    Decode {
        /// Name of the adapter that failed.
        adapter: String,
        /// What went wrong.
        reason: String,
    },

    /// Legacy binary `.doc` input, which has no decoder.
    ///
    /// The message tells the user exactly how to convert the file, and is
    /// stable so calling UIs can surface it verbatim.
    #[error("Legacy .doc format is not directly supported. Please save \"{file_name}\" as .docx format in Microsoft Word and upload again.\n\nTo convert: Open in Word → File → Save As → Choose \".docx\" format.")]
    LegacyDoc {
        /// Name of the rejected file.
        file_name: String,
    },

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// JSON serialization failure.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_display() {
        let err = Error::UnsupportedFormat {
            file_name: "report.xlsx".to_string(),
            supported: ".docx, .doc, or .pdf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type: report.xlsx. Please upload a .docx, .doc, or .pdf file."
        );
    }

    #[test]
    fn test_legacy_doc_display() {
        let err = Error::LegacyDoc {
            file_name: "old-sow.doc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Legacy .doc format is not directly supported."));
        assert!(msg.contains("\"old-sow.doc\""));
        assert!(msg.contains("File → Save As"));
    }

    #[test]
    fn test_decode_display() {
        let err = Error::Decode {
            adapter: "docx".to_string(),
            reason: "missing word/document.xml".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode docx content: missing word/document.xml"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
