//! tagdoc-core - Markup in, structured documents out
//!
//! Core library for tagdoc: classifies markup tags by their semantic role,
//! builds a [`DocumentModel`] from a parsed node tree, renders models
//! through a [`Backend`] and composes templated documents.
//!
//! # Example
//!
//! ```
//! use tagdoc_core::{convert_markup, TagMapping};
//! use tagdoc_model::{Block, Heading, List, Paragraph};
//!
//! let markup = r#"<document>
//!     <title>Guide</title>
//!     <heading level="2">Intro</heading>
//!     <paragraph>Hello</paragraph>
//!     <list type="unordered"><item>a</item><item>b</item></list>
//! </document>"#;
//!
//! let model = convert_markup(markup, &TagMapping::default()).unwrap();
//! assert_eq!(
//!     model.blocks,
//!     vec![
//!         Block::Heading(Heading::new(1, "Guide")),
//!         Block::Heading(Heading::new(2, "Intro")),
//!         Block::Paragraph(Paragraph::new("Hello")),
//!         Block::List(List::unordered(["a", "b"])),
//!     ]
//! );
//! ```

pub mod builder;
pub mod classifier;
pub mod composer;
pub mod error;
pub mod markup;
pub mod node;
pub mod render;
pub mod settings;
pub mod text;

// Re-export main types and functions
pub use builder::{build, convert_markup, Builder};
pub use classifier::{analyze_tag, Classifier, SemanticRole, TagMapping, TagMappingConfig};
pub use composer::{
    ActionItem, Chapter, Composer, Composition, MeetingMinutes, Report, TechnicalDocument,
    TemplateConfig,
};
pub use error::{ConversionError, Result};
pub use markup::parse_markup;
pub use node::{Element, Node};
pub use render::{render, Backend, ListMarker};
pub use settings::{PageSetup, Settings};
pub use text::{to_text, TextBackend};

pub use tagdoc_model::DocumentModel;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
