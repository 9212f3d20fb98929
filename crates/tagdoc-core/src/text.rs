//! AsciiDoc-flavoured plain text backend
//!
//! Renders a [`DocumentModel`] as lightweight AsciiDoc: `=` heading
//! prefixes, `*`/`.` list markers, `|===` tables and `<<<` page breaks.
//! Back-to-back lists are split by a `//-` comment line.
//!
//! # Example
//!
//! ```
//! use tagdoc_core::text::to_text;
//! use tagdoc_model::{Block, DocumentModel};
//!
//! let mut doc = DocumentModel::new();
//! doc.push(Block::heading(1, "My Title"));
//! doc.push(Block::paragraph("Body"));
//!
//! assert_eq!(to_text(&doc), "= My Title\n\nBody\n");
//! ```

use std::fmt::Write;

use tagdoc_model::{Alignment, DocumentModel};

use crate::render::{render, Backend, ListMarker};

/// Render a document model to AsciiDoc-flavoured text
pub fn to_text(model: &DocumentModel) -> String {
    let mut backend = TextBackend::new();
    render(model, &mut backend);
    backend.finish()
}

/// Text backend accumulating output in memory
#[derive(Debug, Default)]
pub struct TextBackend {
    output: String,
    after_list: bool,
    table: Option<Vec<Vec<String>>>,
}

impl TextBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish rendering and return the text with a single trailing newline
    pub fn finish(self) -> String {
        let trimmed = self.output.trim_end();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}\n", trimmed)
        }
    }

    /// Separate the next block from the previous one by a blank line
    fn start_block(&mut self) {
        self.after_list = false;
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }
}

impl Backend for TextBackend {
    fn paragraph(&mut self, text: &str, bold: bool, alignment: Alignment) {
        self.start_block();
        if alignment != Alignment::Left {
            writeln!(self.output, "[.text-{}]", alignment.as_str()).unwrap();
        }
        if bold {
            writeln!(self.output, "*{}*", text).unwrap();
        } else {
            writeln!(self.output, "{}", text).unwrap();
        }
    }

    fn heading(&mut self, text: &str, level: u8) {
        self.start_block();
        let prefix = "=".repeat(usize::from(level));
        writeln!(self.output, "{} {}", prefix, text).unwrap();
    }

    fn begin_list(&mut self, _ordered: bool) {
        let after_list = self.after_list;
        self.start_block();
        if after_list {
            // Adjacent lists would otherwise merge into one
            self.output.push_str("//-\n\n");
        }
    }

    fn list_item(&mut self, text: &str, marker: ListMarker) {
        let symbol = match marker {
            ListMarker::Bullet => "*",
            ListMarker::Number(_) => ".",
        };
        writeln!(self.output, "{} {}", symbol, text).unwrap();
    }

    fn end_list(&mut self) {
        self.after_list = true;
    }

    fn begin_table(&mut self, rows: usize, cols: usize) {
        self.start_block();
        self.table = Some(vec![vec![String::new(); cols]; rows]);
    }

    fn set_cell_text(&mut self, row: usize, col: usize, text: &str) {
        if let Some(cell) = self
            .table
            .as_mut()
            .and_then(|grid| grid.get_mut(row))
            .and_then(|cells| cells.get_mut(col))
        {
            *cell = text.to_string();
        }
    }

    fn end_table(&mut self) {
        let Some(grid) = self.table.take() else {
            return;
        };
        writeln!(self.output, "|===").unwrap();
        for row in grid {
            let line: Vec<String> = row.iter().map(|cell| format!("| {}", cell)).collect();
            writeln!(self.output, "{}", line.join(" ").trim_end()).unwrap();
        }
        writeln!(self.output, "|===").unwrap();
    }

    fn page_break(&mut self) {
        self.start_block();
        writeln!(self.output, "<<<").unwrap();
    }
}
