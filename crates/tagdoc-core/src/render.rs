//! Render adapter
//!
//! A single forward pass over a [`DocumentModel`] that appends each block to
//! a [`Backend`]. Dispatch is an exhaustive match over [`Block`], so every
//! variant has a handler. The adapter itself keeps no state between calls.

use tagdoc_model::{
    clamp_heading_level, Alignment, Block, DocumentModel, Heading, List, Paragraph, Table,
    MAX_HEADING_LEVEL,
};

/// Marker placed in front of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// Unordered item
    Bullet,
    /// Ordered item with its 1-based number
    Number(usize),
}

impl ListMarker {
    /// Literal text prefix for the item (`• ` or `n. `)
    pub fn prefix(&self) -> String {
        match self {
            ListMarker::Bullet => "\u{2022} ".to_string(),
            ListMarker::Number(n) => format!("{}. ", n),
        }
    }
}

/// Output document handle the adapter writes into
///
/// Implementations turn these calls into a concrete format. Tables are
/// announced with their final dimensions, filled cell by cell, then closed.
pub trait Backend {
    /// Append a paragraph
    fn paragraph(&mut self, text: &str, bold: bool, alignment: Alignment);

    /// Append a heading; `level` is within `1..=max_heading_level()`
    fn heading(&mut self, text: &str, level: u8);

    /// Start a list; every list is opened once before its items
    fn begin_list(&mut self, _ordered: bool) {}

    /// Append one list item
    fn list_item(&mut self, text: &str, marker: ListMarker);

    /// Close the list opened by the last `begin_list`
    fn end_list(&mut self) {}

    /// Start a table of `rows` x `cols` empty cells
    fn begin_table(&mut self, rows: usize, cols: usize);

    /// Set the text of one cell of the current table
    fn set_cell_text(&mut self, row: usize, col: usize, text: &str);

    /// Finish the current table
    fn end_table(&mut self);

    /// Append a hard page break
    fn page_break(&mut self);

    /// Deepest heading level this backend can represent
    fn max_heading_level(&self) -> u8 {
        MAX_HEADING_LEVEL
    }
}

/// Render a whole document into a backend
pub fn render<B: Backend + ?Sized>(model: &DocumentModel, backend: &mut B) {
    for block in model {
        render_block(block, backend);
    }
}

/// Render a single block
pub fn render_block<B: Backend + ?Sized>(block: &Block, backend: &mut B) {
    match block {
        Block::Heading(heading) => render_heading(heading, backend),
        Block::Paragraph(para) => render_paragraph(para, backend),
        Block::List(list) => render_list(list, backend),
        Block::Table(table) => render_table(table, backend),
        Block::PageBreak => backend.page_break(),
        Block::Section(section) => {
            for child in &section.children {
                render_block(child, backend);
            }
        }
    }
}

fn render_heading<B: Backend + ?Sized>(heading: &Heading, backend: &mut B) {
    let max = clamp_heading_level(backend.max_heading_level());
    let level = clamp_heading_level(heading.level);
    let level = if level > max {
        log::warn!(
            "Heading level {} not supported by backend, using level {} for {:?}",
            level,
            max,
            heading.text
        );
        max
    } else {
        level
    };
    backend.heading(&heading.text, level);
}

fn render_paragraph<B: Backend + ?Sized>(para: &Paragraph, backend: &mut B) {
    backend.paragraph(&para.text, para.bold, para.alignment());
}

fn render_list<B: Backend + ?Sized>(list: &List, backend: &mut B) {
    if list.items.is_empty() {
        return;
    }
    backend.begin_list(list.ordered);
    for (index, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            ListMarker::Number(index + 1)
        } else {
            ListMarker::Bullet
        };
        backend.list_item(item, marker);
    }
    backend.end_list();
}

fn render_table<B: Backend + ?Sized>(table: &Table, backend: &mut B) {
    if let Some(caption) = &table.caption {
        backend.paragraph(caption, true, Alignment::Left);
    }

    let rows: Vec<&Vec<String>> = table.rows.iter().filter(|row| !row.is_empty()).collect();
    let cols = table.column_count();
    if rows.is_empty() || cols == 0 {
        log::debug!("Skipping table without cells");
        return;
    }

    backend.begin_table(rows.len(), cols);
    for (r, row) in rows.iter().enumerate() {
        // Short rows are padded with empty cells up to the widest row
        for c in 0..cols {
            let text = row.get(c).map(String::as_str).unwrap_or("");
            backend.set_cell_text(r, c, text);
        }
    }
    backend.end_table();
}
