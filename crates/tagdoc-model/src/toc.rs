//! Table-of-contents entries

use serde::{Deserialize, Serialize};

use crate::block::clamp_heading_level;

/// One line item of a generated table of contents
///
/// `ordinal` is the 1-based registration sequence number, not a rendered
/// page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Chapter title
    pub title: String,
    /// Heading level of the chapter (1-6)
    pub level: u8,
    /// Registration sequence number, starting at 1
    pub ordinal: usize,
}

impl TocEntry {
    /// Create an entry, clamping the level into 1-6
    pub fn new(title: impl Into<String>, level: u8, ordinal: usize) -> Self {
        Self {
            title: title.into(),
            level: clamp_heading_level(level),
            ordinal,
        }
    }

    /// Render the entry as `<indent><title> .... <ordinal>`
    ///
    /// Each level below 1 adds four spaces of indentation.
    pub fn line(&self) -> String {
        let indent = "    ".repeat(usize::from(self.level.saturating_sub(1)));
        format!("{}{} .... {}", indent, self.title, self.ordinal)
    }
}
