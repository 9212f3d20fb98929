//! DOCX Writer Coverage Tests
//!
//! End-to-end checks from markup or composed models to .docx packages.

use std::io::Cursor;

use tagdoc_core::{convert_markup, Chapter, Composer, PageSetup, Report, TagMapping, TemplateConfig};
use tagdoc_model::{Block, DocumentModel, Table};
use tagdoc_ooxml::archive::{CONTENT_TYPES_PART, CORE_PROPERTIES_PART, DOCUMENT_PART};
use tagdoc_ooxml::{DocxWriter, OoxmlArchive, Template};

fn unpack(bytes: &[u8]) -> OoxmlArchive {
    OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap()
}

fn document_xml(bytes: &[u8]) -> String {
    unpack(bytes).get_string(DOCUMENT_PART).unwrap()
}

// =============================================================================
// Markup to DOCX
// =============================================================================

#[test]
fn test_markup_guide_to_docx() {
    let markup = r#"<document>
        <title>Guide</title>
        <heading level="2">Intro</heading>
        <paragraph>Hello</paragraph>
        <list type="unordered"><item>a</item><item>b</item></list>
    </document>"#;
    let model = convert_markup(markup, &TagMapping::default()).unwrap();
    let xml = document_xml(&DocxWriter::new().write(&model).unwrap());

    let heading1 = xml.find(">Guide<").unwrap();
    let heading2 = xml.find(">Intro<").unwrap();
    let para = xml.find(">Hello<").unwrap();
    let item = xml.find("\u{2022} a").unwrap();
    assert!(heading1 < heading2 && heading2 < para && para < item);
    assert!(xml.contains(r#"<w:pStyle w:val="Heading2"/>"#));
    assert!(xml.contains("\u{2022} b"));
}

#[test]
fn test_html_page_to_docx() {
    let markup = "<html><body><h1>T</h1><p><b>x</b></p><table><tr><td>A</td><td>B</td></tr><tr><td>1</td></tr></table></body></html>";
    let model = convert_markup(markup, &TagMapping::default()).unwrap();
    let xml = document_xml(&DocxWriter::new().write(&model).unwrap());

    assert_eq!(xml.matches("<w:tr>").count(), 2);
    assert_eq!(xml.matches("<w:tc>").count(), 4);
    // The padded cell
    assert_eq!(xml.matches("<w:p/>").count(), 1);
}

#[test]
fn test_special_characters_escaped() {
    let mut doc = DocumentModel::new();
    doc.push(Block::paragraph("a < b && c > d"));
    let xml = document_xml(&DocxWriter::new().write(&doc).unwrap());
    assert!(xml.contains("a &lt; b &amp;&amp; c &gt; d"));
}

// =============================================================================
// Templates
// =============================================================================

#[test]
fn test_builtin_package_is_docx() {
    let bytes = DocxWriter::new().write(&DocumentModel::new()).unwrap();
    let archive = unpack(&bytes);
    let types = archive.get_string(CONTENT_TYPES_PART).unwrap();
    assert!(types.contains("wordprocessingml.document.main+xml"));
    assert!(archive.contains("word/styles.xml"));
    assert!(document_xml(&bytes).contains("<w:sectPr>"));
}

#[test]
fn test_template_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("plain.dotx");
    let output_path = dir.path().join("out.docx");

    // A written document is itself a valid template
    let seed = DocxWriter::new().write(&DocumentModel::new()).unwrap();
    std::fs::write(&template_path, seed).unwrap();

    let template = Template::load(&template_path).unwrap();
    let mut doc = DocumentModel::with_title("From template");
    doc.push(Block::heading(3, "Third"));
    DocxWriter::new()
        .with_template(template)
        .write_to_file(&doc, &output_path)
        .unwrap();

    let archive = OoxmlArchive::open(&output_path).unwrap();
    let xml = archive.get_string(DOCUMENT_PART).unwrap();
    assert!(xml.contains(r#"<w:pStyle w:val="Heading3"/>"#));
    let core = archive.get_string(CORE_PROPERTIES_PART).unwrap();
    assert!(core.contains("<dc:title>From template</dc:title>"));
}

#[test]
fn test_missing_template_file_is_error() {
    assert!(Template::load("/nonexistent/template.dotx").is_err());
}

// =============================================================================
// Composed documents
// =============================================================================

#[test]
fn test_composed_report_to_docx() {
    let config = TemplateConfig {
        company: "Acme".to_string(),
        ..TemplateConfig::default()
    };
    let report = Report {
        title: "Quarterly".to_string(),
        subtitle: Some("Q3".to_string()),
        author: Some("Sam".to_string()),
        summary: Some("All good".to_string()),
        chapters: vec![Chapter::new("Results", 1, "Numbers")],
        conclusion: None,
    };
    let mut composer = Composer::new(config);
    composer.generate_report(&report).unwrap();
    let composition = composer.finish();
    let bytes = DocxWriter::new().write(&composition.model).unwrap();

    let xml = document_xml(&bytes);
    assert!(xml.contains(r#"<w:br w:type="page"/>"#));
    assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    assert!(xml.contains("Acme"));

    let core = unpack(&bytes).get_string(CORE_PROPERTIES_PART).unwrap();
    assert!(core.contains("<dc:creator>Sam</dc:creator>"));
}

#[test]
fn test_landscape_letter_page() {
    let page = PageSetup {
        width: 12240,
        height: 15840,
        landscape: true,
        ..PageSetup::default()
    };
    let mut doc = DocumentModel::new();
    doc.push(Block::Table(Table::new(vec![vec!["wide", "table"]])));
    let xml = document_xml(&DocxWriter::new().with_page_setup(page).write(&doc).unwrap());
    assert!(xml.contains(r#"w:w="15840" w:h="12240" w:orient="landscape""#));
}
