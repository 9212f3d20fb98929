//! DOCX package writer
//!
//! Renders a [`DocumentModel`] through [`DocxBackend`] and places the result
//! into a template package (or the built-in one).
//!
//! # Example
//!
//! ```ignore
//! use tagdoc_model::{Block, DocumentModel};
//! use tagdoc_ooxml::DocxWriter;
//!
//! let mut doc = DocumentModel::with_title("Guide");
//! doc.push(Block::heading(1, "Intro"));
//! DocxWriter::new().write_to_file(&doc, "guide.docx")?;
//! ```

use std::path::Path;

use quick_xml::escape::escape;
use tagdoc_core::render::render;
use tagdoc_core::PageSetup;
use tagdoc_model::DocumentModel;

use crate::archive::{OoxmlArchive, CORE_PROPERTIES_PART, DOCUMENT_PART};
use crate::backend::DocxBackend;
use crate::error::Result;
use crate::styles::StyleMap;
use crate::template::Template;

/// Header and footer distance from the page edge, in twips
const HEADER_FOOTER_DISTANCE: u32 = 708;

/// Writes document models as .docx packages
#[derive(Debug, Default)]
pub struct DocxWriter {
    template: Option<Template>,
    page: PageSetup,
}

impl DocxWriter {
    /// Writer using the built-in styles and A4 portrait pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `template` for styles and package parts
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_page_setup(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Render `model` and return the .docx bytes
    pub fn write(self, model: &DocumentModel) -> Result<Vec<u8>> {
        let mut template = self.template.unwrap_or_else(Template::builtin);

        let stylesheet = template.get_styles()?;
        let style_map = StyleMap::from_stylesheet(stylesheet);
        for missing in style_map.validate(stylesheet) {
            log::warn!("Template has no style '{}'", missing);
        }
        // Templates without heading styles still get Heading1 references
        let max_level = style_map.max_heading_level(stylesheet).max(1);
        log::debug!(
            "Template defines {} styles, headings up to level {}",
            stylesheet.len(),
            max_level
        );

        let mut backend = DocxBackend::new(style_map, max_level);
        render(model, &mut backend);
        let body = backend.into_body();

        let mut archive = template.into_archive();
        archive.set_string(DOCUMENT_PART, document_xml(&body, &self.page));
        update_core_properties(&mut archive, model);

        log::info!("Wrote DOCX with {} blocks", model.len());
        archive.to_bytes()
    }

    /// Render `model` and write the package to `path`
    pub fn write_to_file<P: AsRef<Path>>(self, model: &DocumentModel, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.write(model)?;
        std::fs::write(path, bytes)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

fn document_xml(body: &str, page: &PageSetup) -> String {
    let (width, height) = page.dimensions();
    let orient = if page.landscape {
        r#" w:orient="landscape""#
    } else {
        ""
    };

    let mut xml = String::with_capacity(body.len() + 1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    xml.push_str("\n<w:body>\n");
    xml.push_str(body);
    xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"{}/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{d}" w:footer="{d}" w:gutter="0"/></w:sectPr>"#,
        width,
        height,
        orient,
        page.margin_top,
        page.margin_right,
        page.margin_bottom,
        page.margin_left,
        d = HEADER_FOOTER_DISTANCE,
    ));
    xml.push_str("\n</w:body>\n</w:document>");
    xml
}

/// Copy the model title and author into docProps/core.xml
fn update_core_properties(archive: &mut OoxmlArchive, model: &DocumentModel) {
    if model.title.is_none() && model.author.is_none() {
        return;
    }
    let Some(mut core) = archive.get_string(CORE_PROPERTIES_PART) else {
        log::warn!("Package has no core properties, skipping metadata");
        return;
    };

    if let Some(title) = &model.title {
        core = set_property(&core, "dc:title", title);
    }
    if let Some(author) = &model.author {
        core = set_property(&core, "dc:creator", author);
    }
    archive.set_string(CORE_PROPERTIES_PART, core);
}

/// Replace `<tag>..</tag>` or `<tag/>`, or insert before the closing root
fn set_property(xml: &str, tag: &str, value: &str) -> String {
    let element = format!("<{tag}>{}</{tag}>", escape(value), tag = tag);
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let empty = format!("<{}/>", tag);

    if let Some(start) = xml.find(&open) {
        if let Some(len) = xml[start..].find(&close) {
            let end = start + len + close.len();
            return format!("{}{}{}", &xml[..start], element, &xml[end..]);
        }
    }
    if xml.contains(&empty) {
        return xml.replacen(&empty, &element, 1);
    }
    xml.replacen(
        "</cp:coreProperties>",
        &format!("{}</cp:coreProperties>", element),
        1,
    )
}
