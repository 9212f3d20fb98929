//! Document root
//!
//! A [`DocumentModel`] is the ordered block sequence produced by one
//! conversion or composition session.

use serde::{Deserialize, Serialize};

use crate::block::{Block, Heading};

/// A complete document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Document title, used for package metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document author, used for package metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Content blocks in document order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl DocumentModel {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Append several blocks, keeping their order
    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate over top-level blocks
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// All headings in depth-first order, including those nested in sections
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        let mut found = Vec::new();
        collect_headings(&self.blocks, &mut found);
        found.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentModel {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

fn collect_headings<'a>(blocks: &'a [Block], out: &mut Vec<&'a Heading>) {
    for block in blocks {
        match block {
            Block::Heading(heading) => out.push(heading),
            Block::Section(section) => collect_headings(&section.children, out),
            _ => {}
        }
    }
}
