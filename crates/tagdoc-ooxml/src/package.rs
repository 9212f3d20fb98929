//! Built-in minimal Word package
//!
//! Used when no template is given. Carries only the parts a DOCX needs:
//! content types, relationships, styles and core properties.

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, CORE_PROPERTIES_PART, ROOT_RELS_PART, STYLES_PART,
};

/// Main document content type of a .docx
pub const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Main document content type of a .dotx
pub const TEMPLATE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";

const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

const CORE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

const CORE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const STYLES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Create the built-in package (everything except word/document.xml)
pub fn minimal_package() -> OoxmlArchive {
    let mut archive = OoxmlArchive::new();
    archive.set_string(CONTENT_TYPES_PART, content_types_xml());
    archive.set_string(ROOT_RELS_PART, root_rels_xml());
    archive.set_string(
        DOCUMENT_RELS_PART,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="styles.xml"/>
</Relationships>"#,
            STYLES_REL_TYPE
        ),
    );
    archive.set_string(STYLES_PART, styles_xml());
    archive.set_string(CORE_PROPERTIES_PART, empty_core_xml());
    archive
}

fn content_types_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="{}"/>
  <Override PartName="/word/styles.xml" ContentType="{}"/>
  <Override PartName="/docProps/core.xml" ContentType="{}"/>
</Types>"#,
        DOCUMENT_CONTENT_TYPE, STYLES_CONTENT_TYPE, CORE_CONTENT_TYPE
    )
}

fn root_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="{}" Target="docProps/core.xml"/>
</Relationships>"#,
        CORE_REL_TYPE
    )
}

/// Empty core properties part
pub fn empty_core_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"></cp:coreProperties>"#
        .to_string()
}

/// Built-in style definitions: Normal, Title, Heading1-6, lists and TableGrid
pub fn styles_xml() -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160"/></w:pPr></w:pPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:b/><w:sz w:val="56"/></w:rPr></w:style>
"#,
    );

    // Half-point sizes from Heading1 down to Heading6
    let sizes = [32, 28, 26, 24, 22, 22];
    for (index, size) in sizes.iter().enumerate() {
        let level = index + 1;
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr></w:style>
"#,
            level = level,
            outline = index,
            size = size
        ));
    }

    xml.push_str(
        r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style>
<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style>
</w:styles>"#,
    );
    xml
}

/// Make a template package usable as a document
///
/// Switches a .dotx main content type to the .docx one and adds the
/// built-in styles or core properties parts when the template lacks them.
pub fn prepare_package(archive: &mut OoxmlArchive) {
    let mut content_types = archive
        .get_string(CONTENT_TYPES_PART)
        .unwrap_or_else(content_types_xml);

    if content_types.contains(TEMPLATE_CONTENT_TYPE) {
        log::debug!("Converting template main part to document");
        content_types = content_types.replace(TEMPLATE_CONTENT_TYPE, DOCUMENT_CONTENT_TYPE);
    }

    if !archive.contains(STYLES_PART) {
        log::debug!("Template has no styles, adding built-in styles");
        archive.set_string(STYLES_PART, styles_xml());
        content_types = add_override(&content_types, "/word/styles.xml", STYLES_CONTENT_TYPE);
        let rels = archive.get_string(DOCUMENT_RELS_PART).unwrap_or_else(|| {
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
</Relationships>"#
                .to_string()
        });
        archive.set_string(
            DOCUMENT_RELS_PART,
            add_relationship(&rels, STYLES_REL_TYPE, "styles.xml"),
        );
    }

    if !archive.contains(CORE_PROPERTIES_PART) {
        archive.set_string(CORE_PROPERTIES_PART, empty_core_xml());
        content_types = add_override(&content_types, "/docProps/core.xml", CORE_CONTENT_TYPE);
        let rels = archive
            .get_string(ROOT_RELS_PART)
            .unwrap_or_else(root_rels_xml);
        archive.set_string(
            ROOT_RELS_PART,
            add_relationship(&rels, CORE_REL_TYPE, "docProps/core.xml"),
        );
    }

    archive.set_string(CONTENT_TYPES_PART, content_types);
}

fn add_override(content_types: &str, part_name: &str, content_type: &str) -> String {
    if content_types.contains(&format!("PartName=\"{}\"", part_name)) {
        return content_types.to_string();
    }
    content_types.replace(
        "</Types>",
        &format!(
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n</Types>",
            part_name, content_type
        ),
    )
}

fn add_relationship(rels: &str, rel_type: &str, target: &str) -> String {
    if rels.contains(&format!("Target=\"{}\"", target)) {
        return rels.to_string();
    }

    // First rIdN not already taken
    let id = (1..)
        .map(|n| format!("rId{}", n))
        .find(|id| !rels.contains(&format!("Id=\"{}\"", id)))
        .unwrap_or_default();
    rels.replace(
        "</Relationships>",
        &format!(
            "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n</Relationships>",
            id, rel_type, target
        ),
    )
}
