//! Style definitions (word/styles.xml)
//!
//! [`StyleSheet`] reads the styles a template defines. [`StyleMap`] maps
//! document model elements to style IDs, preferring whatever naming the
//! template actually uses.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tagdoc_model::{clamp_heading_level, MAX_HEADING_LEVEL};

use crate::error::{OoxmlError, Result};

/// Collection of styles from a package
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    pub style_type: StyleType,
    /// Base style ID
    pub based_on: Option<String>,
    /// Outline level (0-8, where 0 = Heading 1)
    pub outline_level: Option<u8>,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleType {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"style" => {
                            let style_type = match get_attr(e, b"w:type").as_deref() {
                                Some("character") => StyleType::Character,
                                Some("table") => StyleType::Table,
                                Some("numbering") => StyleType::Numbering,
                                _ => StyleType::Paragraph,
                            };
                            current = Some(StyleBuilder {
                                id: get_attr(e, b"w:styleId"),
                                style_type,
                                is_default: get_attr(e, b"w:default").as_deref() == Some("1"),
                                ..Default::default()
                            });
                        }
                        b"name" => {
                            if let Some(style) = current.as_mut() {
                                style.name = get_attr(e, b"w:val");
                            }
                        }
                        b"basedOn" => {
                            if let Some(style) = current.as_mut() {
                                style.based_on = get_attr(e, b"w:val");
                            }
                        }
                        b"outlineLvl" => {
                            if let Some(style) = current.as_mut() {
                                style.outline_level =
                                    get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current.take() {
                            let is_default = builder.is_default;
                            if let Some(style) = builder.build() {
                                if is_default && style.style_type == StyleType::Paragraph {
                                    stylesheet.default_paragraph = Some(style.id.clone());
                                }
                                stylesheet.styles.insert(style.id.clone(), style);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("Parsed {} styles", stylesheet.styles.len());
        Ok(stylesheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Find a style by display name, ignoring ASCII case
    pub fn find_by_name(&self, name: &str) -> Option<&Style> {
        self.styles
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Heading level (1-9) for a style, if it is a heading
    pub fn heading_level(&self, style_id: &str) -> Option<u8> {
        self.get(style_id)
            .and_then(|s| s.outline_level)
            .map(|l| l + 1)
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: StyleType,
    based_on: Option<String>,
    outline_level: Option<u8>,
    is_default: bool,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type,
            based_on: self.based_on,
            outline_level: self.outline_level,
        })
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

// ============================================================================
// Style mapping
// ============================================================================

/// Document model elements that map to Word styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Heading level 1-6
    Heading(u8),
    Paragraph,
    ListBullet,
    ListNumber,
    Table,
}

/// Maps document model elements to Word style IDs
///
/// # Example
///
/// ```
/// use tagdoc_ooxml::styles::{ElementType, StyleMap};
///
/// let mut map = StyleMap::default();
/// map.set(ElementType::Heading(1), "CorporateHeading1");
///
/// assert_eq!(map.heading(1), "CorporateHeading1");
/// assert_eq!(map.paragraph(), "Normal");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMap {
    mappings: HashMap<ElementType, String>,
}

impl Default for StyleMap {
    /// Word's built-in English style IDs
    fn default() -> Self {
        let mut mappings = HashMap::new();
        for level in 1..=MAX_HEADING_LEVEL {
            mappings.insert(ElementType::Heading(level), format!("Heading{}", level));
        }
        mappings.insert(ElementType::Paragraph, "Normal".to_string());
        mappings.insert(ElementType::ListBullet, "ListBullet".to_string());
        mappings.insert(ElementType::ListNumber, "ListNumber".to_string());
        mappings.insert(ElementType::Table, "TableGrid".to_string());
        Self { mappings }
    }
}

impl StyleMap {
    /// Set the style ID for an element
    pub fn set(&mut self, element: ElementType, style_id: impl Into<String>) {
        self.mappings.insert(element, style_id.into());
    }

    /// Style ID for an element, falling back to Word's defaults
    pub fn get(&self, element: ElementType) -> &str {
        self.mappings
            .get(&element)
            .map(|s| s.as_str())
            .unwrap_or_else(|| fallback_style(element))
    }

    /// Style ID for a heading level, clamped to 1-6
    pub fn heading(&self, level: u8) -> &str {
        self.get(ElementType::Heading(clamp_heading_level(level)))
    }

    pub fn paragraph(&self) -> &str {
        self.get(ElementType::Paragraph)
    }

    pub fn table(&self) -> &str {
        self.get(ElementType::Table)
    }

    pub fn list(&self, ordered: bool) -> &str {
        if ordered {
            self.get(ElementType::ListNumber)
        } else {
            self.get(ElementType::ListBullet)
        }
    }

    /// Build a map from the styles a template defines
    ///
    /// Style IDs are localized in some templates, so headings are also
    /// matched by their display name (`heading 1`, ...).
    pub fn from_stylesheet(stylesheet: &StyleSheet) -> Self {
        let mut map = StyleMap::default();

        for level in 1..=MAX_HEADING_LEVEL {
            let default_id = format!("Heading{}", level);
            if stylesheet.get(&default_id).is_some() {
                continue;
            }
            let by_id = [format!("heading {}", level), format!("H{}", level)]
                .into_iter()
                .find(|alt| stylesheet.get(alt).is_some());
            let by_name = || {
                stylesheet
                    .find_by_name(&format!("heading {}", level))
                    .map(|s| s.id.clone())
            };
            if let Some(id) = by_id.or_else(by_name) {
                map.set(ElementType::Heading(level), id);
            }
        }

        if let Some(normal) = &stylesheet.default_paragraph {
            map.set(ElementType::Paragraph, normal.clone());
        }

        for alt in ["TableGrid", "Table Grid", "GridTable1Light", "PlainTable1"] {
            if stylesheet.get(alt).is_some() {
                map.set(ElementType::Table, alt);
                break;
            }
        }

        map
    }

    /// Deepest heading level whose style exists, counting from level 1
    ///
    /// Returns 0 when the stylesheet has no `Heading 1` equivalent.
    pub fn max_heading_level(&self, stylesheet: &StyleSheet) -> u8 {
        (1..=MAX_HEADING_LEVEL)
            .take_while(|level| stylesheet.get(self.heading(*level)).is_some())
            .count() as u8
    }

    /// Mapped style IDs missing from the stylesheet
    pub fn validate(&self, stylesheet: &StyleSheet) -> Vec<String> {
        let mut missing: Vec<String> = self
            .mappings
            .values()
            .filter(|style_id| stylesheet.get(style_id).is_none())
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

fn fallback_style(element: ElementType) -> &'static str {
    match element {
        ElementType::Heading(_) => "Heading1",
        ElementType::Paragraph => "Normal",
        ElementType::ListBullet => "ListBullet",
        ElementType::ListNumber => "ListNumber",
        ElementType::Table => "TableGrid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:style w:type="paragraph" w:styleId="Standard" w:default="1">
                <w:name w:val="Normal"/>
            </w:style>
            <w:style w:type="paragraph" w:styleId="berschrift1">
                <w:name w:val="heading 1"/>
                <w:basedOn w:val="Standard"/>
                <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
            </w:style>
            <w:style w:type="paragraph" w:styleId="Heading2">
                <w:name w:val="heading 2"/>
                <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
            </w:style>
            <w:style w:type="paragraph" w:styleId="Heading4">
                <w:name w:val="heading 4"/>
            </w:style>
            <w:style w:type="table" w:styleId="PlainTable1">
                <w:name w:val="Plain Table 1"/>
            </w:style>
        </w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let styles = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(styles.len(), 5);
        assert_eq!(styles.default_paragraph.as_deref(), Some("Standard"));

        let h1 = styles.get("berschrift1").unwrap();
        assert_eq!(h1.name, "heading 1");
        assert_eq!(h1.based_on.as_deref(), Some("Standard"));
        assert_eq!(styles.heading_level("berschrift1"), Some(1));
        assert_eq!(styles.get("PlainTable1").unwrap().style_type, StyleType::Table);
    }

    #[test]
    fn test_style_map_from_localized_stylesheet() {
        let styles = StyleSheet::parse(STYLES).unwrap();
        let map = StyleMap::from_stylesheet(&styles);

        assert_eq!(map.heading(1), "berschrift1");
        assert_eq!(map.heading(2), "Heading2");
        assert_eq!(map.paragraph(), "Standard");
        assert_eq!(map.table(), "PlainTable1");
    }

    #[test]
    fn test_max_heading_level_is_contiguous() {
        let styles = StyleSheet::parse(STYLES).unwrap();
        let map = StyleMap::from_stylesheet(&styles);
        // Heading4 exists but Heading3 does not
        assert_eq!(map.max_heading_level(&styles), 2);
        assert_eq!(StyleMap::default().max_heading_level(&StyleSheet::default()), 0);
    }

    #[test]
    fn test_style_map_defaults_and_clamp() {
        let map = StyleMap::default();
        assert_eq!(map.heading(0), "Heading1");
        assert_eq!(map.heading(9), "Heading6");
        assert_eq!(map.list(true), "ListNumber");
        assert_eq!(map.list(false), "ListBullet");
    }

    #[test]
    fn test_validate_reports_missing() {
        let styles = StyleSheet::parse(STYLES).unwrap();
        let missing = StyleMap::default().validate(&styles);
        assert!(missing.contains(&"Heading1".to_string()));
        assert!(!missing.contains(&"Heading2".to_string()));
    }

    #[test]
    fn test_malformed_styles_is_error() {
        assert!(StyleSheet::parse(b"<w:styles><w:style></w:styles>").is_err());
    }
}
