//! Document model builder
//!
//! Walks a parsed [`Node`] tree depth-first, left to right, classifying each
//! element and emitting [`Block`]s in the order their nodes are first met.
//!
//! # Example
//!
//! ```
//! use tagdoc_core::builder::build;
//! use tagdoc_core::classifier::TagMapping;
//! use tagdoc_core::markup::parse_markup;
//! use tagdoc_model::{Block, Heading};
//!
//! let tree = parse_markup("<doc><title>Guide</title><p>Hello</p></doc>").unwrap();
//! let model = build(&tree, &TagMapping::default());
//!
//! assert_eq!(model.blocks[0], Block::Heading(Heading::new(1, "Guide")));
//! assert_eq!(model.title.as_deref(), Some("Guide"));
//! ```

use tagdoc_model::{
    clamp_heading_level, Alignment, Block, DocumentModel, Heading, List, Paragraph, Section, Table,
    MAX_HEADING_LEVEL, MIN_HEADING_LEVEL,
};

use crate::classifier::{
    is_bold_tag, is_caption_tag, is_cell_tag, is_list_item_tag, is_row_tag, Classifier,
    SemanticRole, TagMapping,
};
use crate::error::Result;
use crate::markup::parse_markup;
use crate::node::{normalize_whitespace, Element, Node};

/// Values of `type`/`ordered` attributes that mean a numbered list
const ORDERED_MARKERS: &[&str] = &[
    "ordered", "numbered", "number", "decimal", "1", "a", "i", "true",
];

/// Values of `type`/`ordered` attributes that mean a bulleted list
const UNORDERED_MARKERS: &[&str] = &[
    "unordered", "bullet", "bulleted", "disc", "circle", "square", "false",
];

/// Build a document model from a node tree
pub fn build(root: &Node, mapping: &TagMapping) -> DocumentModel {
    Builder::new(mapping).build(root)
}

/// Parse markup and build its document model in one step
pub fn convert_markup(input: &str, mapping: &TagMapping) -> Result<DocumentModel> {
    let tree = parse_markup(input)?;
    Ok(build(&tree, mapping))
}

/// Recursive tree-to-block transformer
///
/// One builder corresponds to one traversal; its classifier cache is
/// dropped with it.
#[derive(Debug)]
pub struct Builder<'m> {
    classifier: Classifier<'m>,
}

/// Pending inline text waiting to become a paragraph
#[derive(Debug, Default)]
struct InlineRun {
    text: String,
    bold: bool,
}

impl InlineRun {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Emit the run as a paragraph if it holds any visible text
    fn flush(&mut self, out: &mut Vec<Block>) {
        let text = normalize_whitespace(&self.text);
        if !text.is_empty() {
            out.push(Block::Paragraph(Paragraph {
                text,
                bold: self.bold,
                ..Default::default()
            }));
        }
        self.text.clear();
        self.bold = false;
    }
}

impl<'m> Builder<'m> {
    /// Create a builder with a fresh classification session
    pub fn new(mapping: &'m TagMapping) -> Self {
        Self {
            classifier: mapping.classifier(),
        }
    }

    /// Build the document model, consuming the builder
    pub fn build(mut self, root: &Node) -> DocumentModel {
        let mut blocks = Vec::new();
        let mut run = InlineRun::default();
        self.visit(root, &mut blocks, &mut run);
        run.flush(&mut blocks);

        let mut model = DocumentModel::new();
        model.blocks = blocks;
        let title = model
            .headings()
            .find(|h| h.level == MIN_HEADING_LEVEL)
            .map(|h| h.text.clone());
        model.title = title;

        log::debug!(
            "Built {} blocks ({} tags classified heuristically)",
            model.len(),
            self.classifier.cached_len()
        );
        model
    }

    fn visit(&mut self, node: &Node, out: &mut Vec<Block>, run: &mut InlineRun) {
        let el = match node {
            Node::Text(text) => {
                run.push_text(text);
                return;
            }
            Node::Element(el) => el,
        };

        let role = self.classifier.classify(&el.name);
        match role {
            SemanticRole::Inline => self.collect_inline(el, run),
            SemanticRole::Ignore => {
                log::trace!("Skipping <{}> and its subtree", el.name);
            }
            SemanticRole::Heading(level) => {
                run.flush(out);
                out.push(Block::Heading(self.extract_heading(el, level)));
            }
            SemanticRole::Paragraph => {
                run.flush(out);
                self.emit_paragraph(el, out);
            }
            SemanticRole::List => {
                run.flush(out);
                out.push(Block::List(self.extract_list(el)));
            }
            SemanticRole::Table => {
                run.flush(out);
                out.push(Block::Table(self.extract_table(el)));
            }
            SemanticRole::PageBreak => {
                run.flush(out);
                out.push(Block::PageBreak);
            }
            SemanticRole::Section => {
                run.flush(out);
                let mut children = Vec::new();
                self.walk_children(el, &mut children);
                if !children.is_empty() {
                    out.push(Block::Section(Section { children }));
                }
            }
            SemanticRole::Container => {
                run.flush(out);
                self.walk_children(el, out);
            }
        }
    }

    /// Visit children in order with their own inline run
    fn walk_children(&mut self, el: &Element, out: &mut Vec<Block>) {
        let mut run = InlineRun::default();
        for child in &el.children {
            self.visit(child, out, &mut run);
        }
        run.flush(out);
    }

    /// Merge an inline element's text into the current run
    fn collect_inline(&mut self, el: &Element, run: &mut InlineRun) {
        if is_bold_tag(&el.name) {
            run.bold = true;
        }
        if el.name.eq_ignore_ascii_case("br") {
            run.push_text(" ");
        }
        for child in &el.children {
            match child {
                Node::Text(text) => run.push_text(text),
                Node::Element(inner) => match self.classifier.classify(&inner.name) {
                    SemanticRole::Ignore => {}
                    SemanticRole::Inline => self.collect_inline(inner, run),
                    _ => {
                        let text = self.visible_text(inner);
                        run.push_text(&text);
                    }
                },
            }
        }
    }

    fn extract_heading(&mut self, el: &Element, default_level: u8) -> Heading {
        let level = el
            .get_attr("level")
            .and_then(|value| value.trim().parse::<u8>().ok())
            .filter(|level| (MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL).contains(level))
            .unwrap_or(default_level);

        let mut text = normalize_whitespace(&el.direct_text());
        if text.is_empty() {
            text = normalize_whitespace(&self.visible_text(el));
        }

        Heading {
            level: clamp_heading_level(level),
            text,
        }
    }

    fn emit_paragraph(&mut self, el: &Element, out: &mut Vec<Block>) {
        if self.has_block_children(el) {
            // Mixed content: text runs between blocks become their own paragraphs
            self.walk_children(el, out);
            return;
        }

        let mut run = InlineRun::default();
        self.collect_inline(el, &mut run);
        let text = normalize_whitespace(&run.text);
        if text.is_empty() {
            return;
        }

        let mut paragraph = Paragraph {
            text,
            bold: run.bold,
            attributes: el.attributes.iter().cloned().collect(),
        };
        if let Some(alignment) = element_alignment(el) {
            paragraph
                .attributes
                .insert("align".to_string(), alignment.as_str().to_string());
        }
        out.push(Block::Paragraph(paragraph));
    }

    fn has_block_children(&mut self, el: &Element) -> bool {
        let mut found = false;
        for child in el.element_children() {
            match self.classifier.classify(&child.name) {
                SemanticRole::Inline | SemanticRole::Ignore => {}
                _ => found = true,
            }
        }
        found
    }

    /// Items in document order
    ///
    /// Item leaves (`li`, `*item*`) and any other child or loose text with
    /// visible content each become one entry.
    fn extract_list(&mut self, el: &Element) -> List {
        let ordered = is_ordered_list(el);
        let mut items = Vec::new();

        for child in &el.children {
            let text = match child {
                Node::Text(text) => normalize_whitespace(text),
                Node::Element(child) => {
                    if self.classifier.classify(&child.name) == SemanticRole::Ignore {
                        continue;
                    }
                    if !is_list_item_tag(&child.name) {
                        log::trace!("Taking <{}> in <{}> as a list item", child.name, el.name);
                    }
                    normalize_whitespace(&self.visible_text(child))
                }
            };
            if !text.is_empty() {
                items.push(text);
            }
        }

        List { ordered, items }
    }

    fn extract_table(&mut self, el: &Element) -> Table {
        let mut table = Table::default();
        self.collect_rows(el, &mut table);

        if table.rows.is_empty() && is_row_tag(&el.name) {
            // A lone row-like element: its children are the cells
            let row = self.row_cells(el);
            if !row.is_empty() {
                table.rows.push(row);
            }
        }
        table
    }

    /// Gather rows below a table element
    ///
    /// Loose text is kept as a cell, so text-only tables come out as 1x1., descending through row groups
    fn collect_rows(&mut self, el: &Element, table: &mut Table) {
        let mut loose_cells: Vec<String> = Vec::new();

        for node in &el.children {
            let child = match node {
                Node::Text(text) => {
                    let text = normalize_whitespace(text);
                    if !text.is_empty() {
                        loose_cells.push(text);
                    }
                    continue;
                }
                Node::Element(child) => child,
            };
            if self.classifier.classify(&child.name) == SemanticRole::Ignore {
                continue;
            }
            if is_caption_tag(&child.name) {
                let caption = normalize_whitespace(&self.visible_text(child));
                if !caption.is_empty() {
                    table.caption = Some(caption);
                }
            } else if is_row_tag(&child.name) {
                flush_loose_cells(&mut loose_cells, table);
                let row = self.row_cells(child);
                table.rows.push(row);
            } else if is_cell_tag(&child.name) {
                loose_cells.push(normalize_whitespace(&self.visible_text(child)));
            } else {
                flush_loose_cells(&mut loose_cells, table);
                // thead/tbody/tfoot and other wrappers
                self.collect_rows(child, table);
            }
        }

        flush_loose_cells(&mut loose_cells, table);
    }

    fn row_cells(&mut self, row: &Element) -> Vec<String> {
        let mut cells = Vec::new();
        for node in &row.children {
            match node {
                Node::Text(text) => {
                    let text = normalize_whitespace(text);
                    if !text.is_empty() {
                        cells.push(text);
                    }
                }
                Node::Element(cell) => {
                    if self.classifier.classify(&cell.name) == SemanticRole::Ignore {
                        continue;
                    }
                    cells.push(normalize_whitespace(&self.visible_text(cell)));
                }
            }
        }
        cells
    }

    /// Text content of an element, leaving out ignored subtrees
    fn visible_text(&mut self, el: &Element) -> String {
        let mut out = String::new();
        for child in &el.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(inner) => {
                    let role = self.classifier.classify(&inner.name);
                    if role == SemanticRole::Ignore {
                        continue;
                    }
                    if inner.name.eq_ignore_ascii_case("br") {
                        out.push(' ');
                    }
                    let text = self.visible_text(inner);
                    out.push_str(&text);
                    // Adjacent block elements must not glue their words together
                    if role != SemanticRole::Inline {
                        out.push(' ');
                    }
                }
            }
        }
        out
    }
}

fn flush_loose_cells(cells: &mut Vec<String>, table: &mut Table) {
    if !cells.is_empty() {
        table.rows.push(std::mem::take(cells));
    }
}

/// Whether a list element asks for numbering, via attributes or its tag
fn is_ordered_list(el: &Element) -> bool {
    for key in ["type", "ordered", "list-type"] {
        if let Some(value) = el.get_attr(key) {
            let value = value.trim();
            if ORDERED_MARKERS
                .iter()
                .any(|marker| marker.eq_ignore_ascii_case(value))
            {
                return true;
            }
            if UNORDERED_MARKERS
                .iter()
                .any(|marker| marker.eq_ignore_ascii_case(value))
            {
                return false;
            }
        }
    }

    let tag = el.tag();
    tag == "ol" || tag.contains("numbered") || (tag.contains("ordered") && !tag.contains("unordered"))
}

/// Alignment from an `align` attribute or a `text-align` style declaration
fn element_alignment(el: &Element) -> Option<Alignment> {
    if let Some(align) = el.get_attr("align").and_then(Alignment::parse) {
        return Some(align);
    }
    let style = el.get_attr("style")?;
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        if property.trim().eq_ignore_ascii_case("text-align") {
            Alignment::parse(value)
        } else {
            None
        }
    })
}
