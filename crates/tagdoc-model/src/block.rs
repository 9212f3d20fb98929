//! Block-level elements for document structure
//!
//! This module defines the structural units a document is made of:
//! headings, paragraphs, lists, tables, page breaks and nested sections.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest heading level (the most prominent heading)
pub const MIN_HEADING_LEVEL: u8 = 1;

/// Highest heading level
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Clamp a heading level into `MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL`
pub fn clamp_heading_level(level: u8) -> u8 {
    level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL)
}

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A section heading
    Heading(Heading),
    /// A paragraph of text
    Paragraph(Paragraph),
    /// An ordered or unordered list of plain-text items
    List(List),
    /// A table of plain-text cells
    Table(Table),
    /// A hard page break
    PageBreak,
    /// A structural wrapper around nested blocks
    Section(Section),
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6, where 1 is the highest)
    #[serde(deserialize_with = "deserialize_level")]
    pub level: u8,
    /// Heading text
    pub text: String,
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text with whitespace already normalized
    pub text: String,
    /// Source attributes carried over from the markup element
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    /// Whether any part of the paragraph was marked bold
    #[serde(default)]
    pub bold: bool,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct List {
    /// Numbered list when true, bulleted otherwise
    pub ordered: bool,
    /// List items in document order
    pub items: Vec<String>,
}

/// A table
///
/// Rows may have different cell counts; padding happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table rows, each an ordered sequence of cell texts
    pub rows: Vec<Vec<String>>,
    /// Optional caption rendered above the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A nested group of blocks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    /// Blocks contained in the section
    pub children: Vec<Block>,
}

/// Horizontal paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parse an alignment keyword (`left`, `center`, `right`, `justify`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" | "centre" | "middle" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" | "both" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// Keyword used when storing the alignment as an attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl Heading {
    /// Create a heading, clamping the level into 1-6
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level: clamp_heading_level(level),
            text: text.into(),
        }
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self {
            level: MIN_HEADING_LEVEL,
            text: String::new(),
        }
    }
}

impl Paragraph {
    /// Create a plain paragraph
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a paragraph marked bold
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Alignment requested through the `align` attribute (left if absent or unknown)
    pub fn alignment(&self) -> Alignment {
        self.attributes
            .get("align")
            .and_then(|v| Alignment::parse(v))
            .unwrap_or_default()
    }
}

impl List {
    /// Create a bulleted list
    pub fn unordered<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ordered: false,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a numbered list
    pub fn ordered<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ordered: true,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl Table {
    /// Create a table from rows of cell texts
    pub fn new<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            caption: None,
        }
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of rows that carry at least one cell
    pub fn non_empty_row_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_empty()).count()
    }
}

impl Block {
    /// Shorthand for a heading block
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading(Heading::new(level, text))
    }

    /// Shorthand for a plain paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(Paragraph::new(text))
    }

    /// Short name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::PageBreak => "page_break",
            Block::Section(_) => "section",
        }
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(MIN_HEADING_LEVEL as i64, MAX_HEADING_LEVEL as i64);
    Ok(clamped as u8)
}
