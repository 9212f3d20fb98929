//! Tag semantic classification
//!
//! Maps markup tag names to a [`SemanticRole`]. Known tags come from the
//! static table held by a [`TagMapping`]; anything else goes through a
//! substring heuristic whose answer is memoized by a [`Classifier`] for the
//! rest of one traversal.
//!
//! # Example
//!
//! ```
//! use tagdoc_core::classifier::{SemanticRole, TagMapping};
//!
//! let mapping = TagMapping::default();
//! let mut classifier = mapping.classifier();
//!
//! assert_eq!(classifier.classify("h3"), SemanticRole::Heading(3));
//! assert_eq!(classifier.classify("chapterTitle"), SemanticRole::Heading(1));
//! assert_eq!(classifier.classify("widget"), SemanticRole::Paragraph);
//! assert!(classifier.is_cached("widget"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tagdoc_model::clamp_heading_level;

/// Semantic role assigned to a markup tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    /// Heading with a level in 1-6
    Heading(u8),
    /// Paragraph of text
    Paragraph,
    /// List whose children are items
    List,
    /// Table whose descendants are rows and cells
    Table,
    /// Skipped together with all descendants
    Ignore,
    /// Children wrapped into a nested section block
    Section,
    /// Children walked in place, no block of its own
    Container,
    /// Inline formatting merged into the surrounding paragraph
    Inline,
    /// Hard page break
    PageBreak,
}

impl SemanticRole {
    /// Heading role with the level clamped into 1-6
    pub fn heading(level: u8) -> Self {
        SemanticRole::Heading(clamp_heading_level(level))
    }

    /// Short name used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            SemanticRole::Heading(_) => "heading",
            SemanticRole::Paragraph => "paragraph",
            SemanticRole::List => "list",
            SemanticRole::Table => "table",
            SemanticRole::Ignore => "ignore",
            SemanticRole::Section => "section",
            SemanticRole::Container => "container",
            SemanticRole::Inline => "inline",
            SemanticRole::PageBreak => "page_break",
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticRole::Heading(level) => write!(f, "heading (level {})", level),
            other => f.write_str(other.name()),
        }
    }
}

/// Static tag table used by the classifier
///
/// Tag names are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMapping {
    known: HashMap<String, SemanticRole>,
}

impl Default for TagMapping {
    /// Create a mapping with the built-in tag table
    fn default() -> Self {
        let mut mapping = TagMapping::empty();

        for level in 1..=6u8 {
            mapping.add_heading_tag(&format!("h{}", level), level);
        }
        mapping.add_heading_tag("title", 1);
        mapping.add_heading_tag("heading", 2);
        mapping.add_heading_tag("subtitle", 2);

        for tag in ["p", "paragraph", "text", "content"] {
            mapping.add_paragraph_tag(tag);
        }
        for tag in ["ul", "ol", "list", "items"] {
            mapping.add_list_tag(tag);
        }
        for tag in ["table", "grid"] {
            mapping.add_table_tag(tag);
        }
        for tag in [
            "meta", "metadata", "style", "script", "head", "link", "noscript", "template",
        ] {
            mapping.add_ignore_tag(tag);
        }
        for tag in ["section", "article", "chapter"] {
            mapping.add_section_tag(tag);
        }
        for tag in [
            "#document", "html", "body", "document", "doc", "root", "div", "main", "header",
            "footer", "nav", "aside",
        ] {
            mapping.add_container_tag(tag);
        }
        for tag in [
            "b", "strong", "i", "em", "u", "span", "a", "code", "small", "sub", "sup", "mark",
            "font", "s", "strike", "br",
        ] {
            mapping.add_inline_tag(tag);
        }
        for tag in ["pagebreak", "page-break", "newpage"] {
            mapping.set(tag, SemanticRole::PageBreak);
        }

        mapping
    }
}

impl TagMapping {
    /// Create a mapping with no known tags (everything goes through the heuristic)
    pub fn empty() -> Self {
        Self {
            known: HashMap::new(),
        }
    }

    /// Create the default mapping with configuration overrides applied
    pub fn from_config(config: &TagMappingConfig) -> Self {
        let mut mapping = TagMapping::default();
        mapping.apply_config(config);
        mapping
    }

    /// Register or replace the role of a tag
    pub fn set(&mut self, tag: &str, role: SemanticRole) {
        self.known.insert(tag.to_ascii_lowercase(), role);
    }

    /// Register a heading tag with its level (clamped into 1-6)
    pub fn add_heading_tag(&mut self, tag: &str, level: u8) {
        self.set(tag, SemanticRole::heading(level));
    }

    /// Register a paragraph tag
    pub fn add_paragraph_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Paragraph);
    }

    /// Register a list tag
    pub fn add_list_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::List);
    }

    /// Register a table tag
    pub fn add_table_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Table);
    }

    /// Register a tag whose subtree is skipped
    pub fn add_ignore_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Ignore);
    }

    /// Register a tag that wraps its children into a section block
    pub fn add_section_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Section);
    }

    /// Register a transparent wrapper tag
    pub fn add_container_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Container);
    }

    /// Register an inline formatting tag
    pub fn add_inline_tag(&mut self, tag: &str) {
        self.set(tag, SemanticRole::Inline);
    }

    /// Forget a tag so that it falls back to the heuristic
    pub fn remove_tag(&mut self, tag: &str) -> Option<SemanticRole> {
        self.known.remove(&tag.to_ascii_lowercase())
    }

    /// Role from the static table only
    pub fn lookup(&self, tag: &str) -> Option<SemanticRole> {
        self.known.get(&tag.to_ascii_lowercase()).copied()
    }

    /// Number of tags in the static table
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether the static table is empty
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Apply configured tag registrations on top of this mapping
    pub fn apply_config(&mut self, config: &TagMappingConfig) {
        for (tag, level) in &config.headings {
            self.add_heading_tag(tag, *level);
        }
        for tag in &config.paragraphs {
            self.add_paragraph_tag(tag);
        }
        for tag in &config.lists {
            self.add_list_tag(tag);
        }
        for tag in &config.tables {
            self.add_table_tag(tag);
        }
        for tag in &config.ignore {
            self.add_ignore_tag(tag);
        }
        for tag in &config.sections {
            self.add_section_tag(tag);
        }
        for tag in &config.containers {
            self.add_container_tag(tag);
        }
        for tag in &config.inline {
            self.add_inline_tag(tag);
        }
    }

    /// Start a classification session backed by this mapping
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(self)
    }
}

/// Tag registrations read from the `[tags]` table of a settings file
///
/// ```toml
/// [tags]
/// headings = { chaptername = 1, subhead = 3 }
/// paragraphs = ["blurb"]
/// ignore = ["comment"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMappingConfig {
    /// Heading tags with their levels
    pub headings: BTreeMap<String, u8>,
    /// Paragraph tags
    pub paragraphs: Vec<String>,
    /// List tags
    pub lists: Vec<String>,
    /// Table tags
    pub tables: Vec<String>,
    /// Ignored tags
    pub ignore: Vec<String>,
    /// Section tags
    pub sections: Vec<String>,
    /// Transparent container tags
    pub containers: Vec<String>,
    /// Inline formatting tags
    pub inline: Vec<String>,
}

/// One classification session with a memoized heuristic cache
///
/// The cache lives as long as the classifier, i.e. one traversal. The
/// underlying [`TagMapping`] is never modified.
#[derive(Debug)]
pub struct Classifier<'m> {
    mapping: &'m TagMapping,
    cache: HashMap<String, SemanticRole>,
}

impl<'m> Classifier<'m> {
    /// Create a classifier with an empty cache
    pub fn new(mapping: &'m TagMapping) -> Self {
        Self {
            mapping,
            cache: HashMap::new(),
        }
    }

    /// Classify a tag name; never fails
    ///
    /// Lookup order: static table, then the session cache, then the
    /// heuristic analyzer (whose result is cached).
    pub fn classify(&mut self, tag: &str) -> SemanticRole {
        let key = tag.to_ascii_lowercase();

        if let Some(role) = self.mapping.known.get(&key) {
            return *role;
        }
        if let Some(role) = self.cache.get(&key) {
            return *role;
        }

        let role = analyze_tag(&key);
        log::debug!("Heuristic classified <{}> as {}", tag, role);
        self.cache.insert(key, role);
        role
    }

    /// Whether the heuristic result for a tag is already memoized
    pub fn is_cached(&self, tag: &str) -> bool {
        self.cache.contains_key(&tag.to_ascii_lowercase())
    }

    /// Number of memoized heuristic results
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The static mapping behind this session
    pub fn mapping(&self) -> &TagMapping {
        self.mapping
    }
}

/// Heuristic analyzer for tags missing from the static table
///
/// Pattern based and case-insensitive. Never returns [`SemanticRole::Ignore`]:
/// unknown content falls back to a paragraph.
pub fn analyze_tag(tag: &str) -> SemanticRole {
    let tag = tag.to_ascii_lowercase();

    if let Some(level) = numbered_heading_level(&tag) {
        return SemanticRole::Heading(level);
    }
    if tag.contains("subtitle") {
        return SemanticRole::Heading(2);
    }
    if tag.contains("title") {
        return SemanticRole::Heading(1);
    }
    if tag.contains("head") || tag == "caption" {
        return SemanticRole::Heading(2);
    }
    if tag.contains("para") || tag.contains("text") || tag.contains("content") {
        return SemanticRole::Paragraph;
    }
    if is_list_item_tag(&tag) {
        // A stray item outside any list is just text
        return SemanticRole::Paragraph;
    }
    if tag.contains("list") || tag.contains("item") {
        return SemanticRole::List;
    }
    if tag.contains("table") || tag.contains("grid") || tag.contains("row") || tag.contains("cell")
    {
        return SemanticRole::Table;
    }

    SemanticRole::Paragraph
}

/// `h1`..`h6` exactly
fn numbered_heading_level(tag: &str) -> Option<u8> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<u8>() {
        Ok(level @ 1..=6) if digit.len() == 1 => Some(level),
        _ => None,
    }
}

/// A list-item leaf: `li`, or any tag containing `item`
///
/// Collections such as `items` or `itemlist` are lists, not leaves.
pub fn is_list_item_tag(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    if tag == "li" || tag.ends_with("item") {
        return true;
    }
    tag.contains("item") && !tag.contains("list") && !tag.ends_with("items")
}

/// A table row: `tr`, or any tag containing `row`
pub fn is_row_tag(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    tag == "tr" || tag.contains("row")
}

/// A table cell: `td`, `th`, or any tag containing `cell`
pub fn is_cell_tag(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    tag == "td" || tag == "th" || tag.contains("cell")
}

/// A table caption
pub fn is_caption_tag(tag: &str) -> bool {
    tag.to_ascii_lowercase().contains("caption")
}

/// Inline tags that mark their text bold
pub fn is_bold_tag(tag: &str) -> bool {
    matches!(tag.to_ascii_lowercase().as_str(), "b" | "strong")
}
