//! Document model types for parsed SOW content.
//!
//! This module defines the intermediate representation (IR) that bridges
//! format adapters and the content-item linearizer. The model is
//! format-agnostic: a docx, pdf, html, or plain text source all produce
//! the same `Document` shape.

mod content;
mod document;
mod section;
mod table;

pub use content::{ContentItem, ContentType};
pub use document::{Document, DocumentFormat, Metadata};
pub use section::Section;
pub use table::{Table, TableCell, TableRow};
