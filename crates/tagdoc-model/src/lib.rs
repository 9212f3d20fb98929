//! # tagdoc-model
//!
//! The normalized document model shared by every tagdoc crate.
//!
//! Conversion produces a [`DocumentModel`], an ordered sequence of [`Block`]s
//! (headings, paragraphs, lists, tables, page breaks and nested sections).
//! Rendering consumes it. The template composer additionally tracks
//! [`TocEntry`] items alongside the model.
//!
//! # Example
//!
//! ```
//! use tagdoc_model::{Block, DocumentModel, Heading, Paragraph};
//!
//! let mut doc = DocumentModel::new();
//! doc.push(Block::Heading(Heading::new(1, "Guide")));
//! doc.push(Block::Paragraph(Paragraph::new("Hello")));
//!
//! assert_eq!(doc.len(), 2);
//! assert_eq!(doc.headings().next().map(|h| h.text.as_str()), Some("Guide"));
//! ```

pub mod block;
pub mod document;
pub mod toc;

pub use block::{
    clamp_heading_level, Alignment, Block, Heading, List, Paragraph, Section, Table,
    MAX_HEADING_LEVEL, MIN_HEADING_LEVEL,
};
pub use document::DocumentModel;
pub use toc::TocEntry;
