//! tagdoc CLI - Command-line interface library
//!
//! This library provides the CLI functionality for tagdoc:
//! - Convert: HTML/XML markup to DOCX, text or JSON
//! - Compose: reports, technical documents and meeting minutes from TOML/JSON
//! - Classify: show how tags map to semantic roles
//!
//! # Binary Usage
//!
//! ```bash
//! # Convert a web page to Word
//! tagdoc convert page.html --output page.docx --template corporate.dotx
//!
//! # Preview the document model as text
//! tagdoc convert page.html --format text
//!
//! # Compose meeting minutes
//! tagdoc compose minutes minutes.toml -o minutes.docx
//!
//! # Debug tag classification
//! tagdoc classify h2 blurb tr
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{classify_command, classify_tags, compose_command, convert_command, load_settings};
pub use app::{run_cli, ComposeKind, OutputFormat, OutputOptions};
