//! # tagdoc-ooxml
//!
//! Word (.docx) output for tagdoc.
//!
//! This crate provides:
//! - A [`DocxBackend`] implementing the tagdoc render adapter
//! - [`Template`] loading for .dotx/.docx files, with built-in styles as fallback
//! - [`DocxWriter`] to package a rendered model as a .docx
//!
//! ## Example
//!
//! ```no_run
//! use tagdoc_core::{convert_markup, TagMapping};
//! use tagdoc_ooxml::{DocxWriter, Template};
//!
//! let model = convert_markup("<h1>Report</h1><p>Done.</p>", &TagMapping::default()).unwrap();
//! let template = Template::load("corporate.dotx")?;
//! DocxWriter::new()
//!     .with_template(template)
//!     .write_to_file(&model, "report.docx")?;
//! # Ok::<(), tagdoc_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod backend;
pub mod error;
pub mod package;
pub mod styles;
pub mod template;
pub mod writer;

#[cfg(test)]
mod test_utils;

pub use archive::OoxmlArchive;
pub use backend::DocxBackend;
pub use error::{OoxmlError, Result};
pub use styles::{ElementType, Style, StyleMap, StyleSheet, StyleType};
pub use template::Template;
pub use writer::DocxWriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
