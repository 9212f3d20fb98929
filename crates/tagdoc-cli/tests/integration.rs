//! Integration tests for tagdoc CLI
//!
//! These tests drive the command functions against real files:
//! markup -> DOCX/JSON/text, and TOML/JSON descriptions -> composed documents.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use tagdoc_cli::{
    compose_command, convert_command, load_settings, ComposeKind, OutputFormat, OutputOptions,
};
use tagdoc_model::{Block, DocumentModel, Heading, Paragraph};
use tempfile::TempDir;
use zip::ZipArchive;

const PAGE: &str = r#"<html>
<head><title>ignored</title></head>
<body>
  <h1>Field Guide</h1>
  <p>Intro &amp; overview</p>
  <ul><li>alpha</li><li>beta</li></ul>
  <table><tr><th>A</th><th>B</th></tr><tr><td>1</td></tr></table>
</body>
</html>"#;

/// Read one part of a DOCX package
fn read_part(docx: &Path, part: &str) -> String {
    let bytes = fs::read(docx).expect("Failed to read DOCX");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Invalid ZIP");
    let mut file = archive.by_name(part).expect("Missing part");
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

fn options(output: &Path) -> OutputOptions {
    OutputOptions {
        output: Some(output.to_path_buf()),
        ..OutputOptions::default()
    }
}

// =============================================================================
// convert
// =============================================================================

#[test]
fn test_convert_html_to_docx() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("page.html");
    let output = temp_dir.path().join("page.docx");
    fs::write(&input, PAGE).unwrap();

    convert_command(&input, &options(&output)).expect("Convert failed");

    let document = read_part(&output, "word/document.xml");
    assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert!(document.contains("Intro &amp; overview"));
    assert!(document.contains("\u{2022} alpha"));
    assert_eq!(document.matches("<w:tc>").count(), 4);
    assert!(!document.contains("ignored"));

    let core = read_part(&output, "docProps/core.xml");
    assert!(core.contains("<dc:title>Field Guide</dc:title>"));
}

#[test]
fn test_convert_default_output_path() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("notes.xml");
    fs::write(&input, "<document><paragraph>Hi</paragraph></document>").unwrap();

    convert_command(&input, &OutputOptions::default()).unwrap();
    assert!(temp_dir.path().join("notes.docx").exists());
}

#[test]
fn test_convert_to_json_model() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("page.html");
    let output = temp_dir.path().join("model.json");
    fs::write(&input, PAGE).unwrap();

    // Format inferred from the extension
    convert_command(&input, &options(&output)).unwrap();

    let model: DocumentModel = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(model.title.as_deref(), Some("Field Guide"));
    assert_eq!(model.blocks[0], Block::Heading(Heading::new(1, "Field Guide")));
    assert_eq!(model.blocks[1], Block::Paragraph(Paragraph::new("Intro & overview")));
}

#[test]
fn test_convert_to_text_with_explicit_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("page.html");
    let output = temp_dir.path().join("page.out");
    fs::write(&input, PAGE).unwrap();

    let opts = OutputOptions {
        format: Some(OutputFormat::Text),
        ..options(&output)
    };
    convert_command(&input, &opts).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("= Field Guide\n"));
    assert!(text.contains("* alpha\n* beta\n"));
    assert!(text.contains("|===\n| A | B\n| 1\n|===\n"));
}

#[test]
fn test_convert_discovers_config_next_to_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("custom.xml");
    let output = temp_dir.path().join("custom.json");
    fs::write(
        &input,
        "<doc><headline>Top</headline><blurb>Text</blurb><sidebar>Skip</sidebar></doc>",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("tagdoc.toml"),
        "[tags]\nparagraphs = [\"blurb\"]\nignore = [\"sidebar\"]\n\n[tags.headings]\nheadline = 1\n",
    )
    .unwrap();

    convert_command(&input, &options(&output)).unwrap();

    let model: DocumentModel = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        model.blocks,
        vec![
            Block::Heading(Heading::new(1, "Top")),
            Block::Paragraph(Paragraph::new("Text")),
        ]
    );
}

#[test]
fn test_explicit_config_wins() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tagdoc.toml"), "[page]\nlandscape = true\n").unwrap();
    let explicit = temp_dir.path().join("other.toml");
    fs::write(&explicit, "[page]\nlandscape = false\n").unwrap();
    let input = temp_dir.path().join("in.html");

    let settings = load_settings(Some(explicit.as_path()), Some(input.as_path())).unwrap();
    assert!(!settings.page.landscape);
    let settings = load_settings(None, Some(input.as_path())).unwrap();
    assert!(settings.page.landscape);
}

#[test]
fn test_convert_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = convert_command(&temp_dir.path().join("nope.html"), &OutputOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_convert_malformed_markup_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("bad.xml");
    fs::write(&input, "<document><p>open</document>").unwrap();
    let err = convert_command(&input, &OutputOptions::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to convert markup"));
}

#[test]
fn test_convert_with_template() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("seed.docx");
    let input = temp_dir.path().join("page.html");
    let output = temp_dir.path().join("out.docx");
    fs::write(&input, PAGE).unwrap();

    // Any produced document doubles as a template
    convert_command(&input, &options(&template)).unwrap();
    let opts = OutputOptions {
        template: Some(template.clone()),
        ..options(&output)
    };
    convert_command(&input, &opts).unwrap();

    assert!(read_part(&output, "word/styles.xml").contains("Heading6"));
}

// =============================================================================
// compose
// =============================================================================

#[test]
fn test_compose_minutes_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("minutes.toml");
    let output = temp_dir.path().join("minutes.txt");
    fs::write(
        &input,
        r#"title = "Weekly Sync"
date = "2024-05-02"
location = "Room 4"
attendees = ["Ana", "Ben"]
agenda = ["Status", "Risks"]
decisions = ["Ship it"]

[[discussion]]
title = "Status"
content = "On track"

[[action_items]]
task = "Write notes"
owner = "Ana"
due = "Friday"
"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("tagdoc.toml"),
        "[template]\ngenerate-cover-page = false\ngenerate-footer = false\n",
    )
    .unwrap();

    compose_command(ComposeKind::Minutes, &input, &options(&output)).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("= Meeting Information\n\nDate: 2024-05-02 | Location: Room 4\n"));
    assert!(text.contains("= Attendees\n\n* Ana\n* Ben\n"));
    assert!(text.contains("= Agenda\n\n. Status\n. Risks\n"));
    assert!(text.contains("| Task | Owner | Due\n| Write notes | Ana | Friday\n"));
    // Only chapters added before the TOC are listed in it
    assert!(text.contains("= Table of Contents\n\nMeeting Information .... 1\n"));
    assert!(!text.contains("Attendees .... "));
}

#[test]
fn test_compose_report_from_json_to_docx() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    let output = temp_dir.path().join("report.docx");
    fs::write(
        &input,
        r#"{
  "title": "Annual Review",
  "author": "Dana",
  "summary": "Strong year",
  "chapters": [{"title": "Revenue", "content": "Up"}, {"title": "Detail", "level": 2}],
  "conclusion": "Onward"
}"#,
    )
    .unwrap();

    compose_command(ComposeKind::Report, &input, &options(&output)).unwrap();

    let document = read_part(&output, "word/document.xml");
    assert!(document.contains("Annual Review"));
    assert!(document.contains(r#"<w:br w:type="page"/>"#));
    assert!(document.contains(r#"<w:pStyle w:val="Heading2"/>"#));
    let core = read_part(&output, "docProps/core.xml");
    assert!(core.contains("<dc:creator>Dana</dc:creator>"));
}

#[test]
fn test_compose_technical_without_title_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tech.toml");
    fs::write(&input, "version = \"2.0\"\n").unwrap();

    let err = compose_command(
        ComposeKind::Technical,
        &input,
        &options(&temp_dir.path().join("tech.docx")),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to compose document"));
}

#[test]
fn test_compose_invalid_description_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.toml");
    fs::write(&input, "title = [").unwrap();
    assert!(compose_command(ComposeKind::Report, &input, &OutputOptions::default()).is_err());
}
