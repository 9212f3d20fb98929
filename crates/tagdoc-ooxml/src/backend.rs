//! WordprocessingML backend
//!
//! [`DocxBackend`] receives render adapter calls and accumulates the body
//! XML of `word/document.xml`. Tables are buffered between
//! [`Backend::begin_table`] and [`Backend::end_table`] so cells can be set
//! in any order.

use quick_xml::escape::escape;
use tagdoc_core::render::{Backend, ListMarker};
use tagdoc_model::{clamp_heading_level, Alignment, MAX_HEADING_LEVEL};

use crate::styles::StyleMap;

/// Usable text width of an A4 page with one inch margins, in twips
const TABLE_WIDTH: usize = 9026;

/// Backend producing `w:body` content
#[derive(Debug, Clone)]
pub struct DocxBackend {
    body: String,
    style_map: StyleMap,
    max_heading_level: u8,
    table: Option<Vec<Vec<String>>>,
}

impl Default for DocxBackend {
    fn default() -> Self {
        Self::new(StyleMap::default(), MAX_HEADING_LEVEL)
    }
}

impl DocxBackend {
    /// Create a backend resolving styles through `style_map`
    ///
    /// `max_heading_level` is clamped to 1-6.
    pub fn new(style_map: StyleMap, max_heading_level: u8) -> Self {
        Self {
            body: String::new(),
            style_map,
            max_heading_level: clamp_heading_level(max_heading_level),
            table: None,
        }
    }

    /// Body XML produced so far
    pub fn body_xml(&self) -> &str {
        &self.body
    }

    /// Consume the backend and return the body XML
    pub fn into_body(mut self) -> String {
        // A table left open still belongs in the output
        self.end_table();
        self.body
    }

    fn push_paragraph(&mut self, style: &str, alignment: Alignment, text: &str, bold: bool) {
        self.body.push_str("<w:p><w:pPr>");
        self.body
            .push_str(&format!("<w:pStyle w:val=\"{}\"/>", escape(style)));
        if let Some(jc) = justification(alignment) {
            self.body.push_str(&format!("<w:jc w:val=\"{}\"/>", jc));
        }
        self.body.push_str("</w:pPr>");
        push_run(&mut self.body, text, bold);
        self.body.push_str("</w:p>\n");
    }
}

impl Backend for DocxBackend {
    fn paragraph(&mut self, text: &str, bold: bool, alignment: Alignment) {
        let style = self.style_map.paragraph().to_string();
        self.push_paragraph(&style, alignment, text, bold);
    }

    fn heading(&mut self, text: &str, level: u8) {
        let style = self.style_map.heading(level).to_string();
        self.push_paragraph(&style, Alignment::Left, text, false);
    }

    fn list_item(&mut self, text: &str, marker: ListMarker) {
        let ordered = matches!(marker, ListMarker::Number(_));
        let style = self.style_map.list(ordered).to_string();
        let text = format!("{}{}", marker.prefix(), text);
        self.push_paragraph(&style, Alignment::Left, &text, false);
    }

    fn begin_table(&mut self, rows: usize, cols: usize) {
        if self.table.is_some() {
            log::warn!("Table started before the previous one ended");
            self.end_table();
        }
        self.table = Some(vec![vec![String::new(); cols]; rows]);
    }

    fn set_cell_text(&mut self, row: usize, col: usize, text: &str) {
        match self
            .table
            .as_mut()
            .and_then(|grid| grid.get_mut(row))
            .and_then(|cells| cells.get_mut(col))
        {
            Some(cell) => *cell = text.to_string(),
            None => log::warn!("Cell ({}, {}) is outside the current table", row, col),
        }
    }

    fn end_table(&mut self) {
        let Some(grid) = self.table.take() else {
            return;
        };
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return;
        }
        let col_width = TABLE_WIDTH / cols;

        let out = &mut self.body;
        out.push_str("<w:tbl><w:tblPr>");
        out.push_str(&format!(
            "<w:tblStyle w:val=\"{}\"/>",
            escape(self.style_map.table())
        ));
        out.push_str("<w:tblW w:w=\"5000\" w:type=\"pct\"/></w:tblPr><w:tblGrid>");
        for _ in 0..cols {
            out.push_str(&format!("<w:gridCol w:w=\"{}\"/>", col_width));
        }
        out.push_str("</w:tblGrid>\n");

        for row in &grid {
            out.push_str("<w:tr>");
            for cell in row {
                out.push_str(&format!(
                    "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>",
                    col_width
                ));
                if cell.is_empty() {
                    // A cell must hold at least one paragraph
                    out.push_str("<w:p/>");
                } else {
                    out.push_str("<w:p>");
                    push_run(out, cell, false);
                    out.push_str("</w:p>");
                }
                out.push_str("</w:tc>");
            }
            out.push_str("</w:tr>\n");
        }
        out.push_str("</w:tbl>\n");
    }

    fn page_break(&mut self) {
        self.body
            .push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>\n");
    }

    fn max_heading_level(&self) -> u8 {
        self.max_heading_level
    }
}

fn push_run(out: &mut String, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    out.push_str("<w:r>");
    if bold {
        out.push_str("<w:rPr><w:b/></w:rPr>");
    }
    out.push_str(&format!(
        "<w:t xml:space=\"preserve\">{}</w:t>",
        escape(text)
    ));
    out.push_str("</w:r>");
}

fn justification(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::Left => None,
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
        Alignment::Justify => Some("both"),
    }
}
