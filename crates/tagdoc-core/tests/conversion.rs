//! End-to-end conversion tests
//!
//! Markup in, document model and rendered text out.

use chrono::NaiveDate;
use tagdoc_core::classifier::TagMapping;
use tagdoc_core::composer::{Composer, TemplateConfig};
use tagdoc_core::{build, convert_markup, parse_markup, to_text, ConversionError, SemanticRole};
use tagdoc_model::{Block, DocumentModel, Heading, List, Paragraph, Table, TocEntry};

fn convert(input: &str) -> DocumentModel {
    convert_markup(input, &TagMapping::default()).unwrap()
}

// =============================================================================
// Builder
// =============================================================================

#[test]
fn test_guide_document() {
    let model = convert(
        r#"<document><title>Guide</title><heading level="2">Intro</heading><paragraph>Hello</paragraph><list type="unordered"><item>a</item><item>b</item></list></document>"#,
    );

    assert_eq!(
        model.blocks,
        vec![
            Block::Heading(Heading::new(1, "Guide")),
            Block::Heading(Heading::new(2, "Intro")),
            Block::Paragraph(Paragraph::new("Hello")),
            Block::List(List::unordered(["a", "b"])),
        ]
    );
    assert_eq!(model.title.as_deref(), Some("Guide"));
}

#[test]
fn test_pretty_printed_markup_matches_compact() {
    let compact = convert("<doc><h1>A</h1><p>b</p></doc>");
    let pretty = convert(
        r#"
        <doc>
            <h1>
                A
            </h1>
            <p>
                b
            </p>
        </doc>
        "#,
    );
    assert_eq!(compact, pretty);
}

#[test]
fn test_blocks_follow_depth_first_order() {
    let model = convert(
        "<doc><h1>1</h1><div><p>2</p><div><h2>3</h2><p>4</p></div><p>5</p></div><p>6</p></doc>",
    );
    let order: Vec<String> = model
        .iter()
        .map(|block| match block {
            Block::Heading(h) => h.text.clone(),
            Block::Paragraph(p) => p.text.clone(),
            other => panic!("unexpected block {:?}", other),
        })
        .collect();
    assert_eq!(order, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_html_page() {
    let model = convert(
        r#"<!DOCTYPE html>
<html>
  <head><title>Browser title</title><style>p { color: red; }</style></head>
  <body>
    <h1>Welcome</h1>
    <p>Intro <b>bold</b> text&nbsp;here.</p>
    <ul><li>one</li><li>two</li></ul>
    <table>
      <tr><th>A</th><th>B</th></tr>
      <tr><td>1</td></tr>
    </table>
    <hr>
    <script>alert(1)</script>
  </body>
</html>"#,
    );

    assert_eq!(model.len(), 4, "{:#?}", model.blocks);
    assert_eq!(model.blocks[0], Block::heading(1, "Welcome"));
    match &model.blocks[1] {
        Block::Paragraph(p) => {
            assert_eq!(p.text, "Intro bold text\u{a0}here.");
            assert!(p.bold);
        }
        other => panic!("expected paragraph, got {:?}", other),
    }
    assert_eq!(model.blocks[2], Block::List(List::unordered(["one", "two"])));
    assert_eq!(
        model.blocks[3],
        Block::Table(Table::new(vec![vec!["A", "B"], vec!["1"]]))
    );
}

#[test]
fn test_heading_levels_always_in_range() {
    let model = convert(
        r#"<doc>
            <h1 level="-3">a</h1>
            <h6 level="99">b</h6>
            <subtitle level="seven">c</subtitle>
            <chapterheading level="3">d</chapterheading>
            <heading level="">e</heading>
        </doc>"#,
    );
    let levels: Vec<u8> = model.headings().map(|h| h.level).collect();
    assert_eq!(levels, vec![1, 6, 2, 3, 2]);
    assert!(levels.iter().all(|level| (1..=6).contains(level)));
}

#[test]
fn test_custom_mapping() {
    let mut mapping = TagMapping::default();
    mapping.add_heading_tag("headline", 1);
    mapping.add_ignore_tag("note");
    mapping.add_list_tag("bag");

    let model = convert_markup(
        "<doc><headline>Top</headline><note>hidden</note><bag><li>x</li></bag></doc>",
        &mapping,
    )
    .unwrap();
    assert_eq!(
        model.blocks,
        vec![
            Block::heading(1, "Top"),
            Block::List(List::unordered(["x"])),
        ]
    );
}

#[test]
fn test_unknown_tags_are_never_ignored() {
    let mapping = TagMapping::default();
    let mut classifier = mapping.classifier();
    for tag in ["widget", "xyzzy", "metaphor", "stylebook", "scripture", "unknown-thing"] {
        let role = classifier.classify(tag);
        assert_ne!(role, SemanticRole::Ignore, "{} was ignored", tag);
        assert_eq!(classifier.classify(tag), role);
    }
}

#[test]
fn test_hand_built_tree() {
    use tagdoc_core::{Element, Node};

    let tree = Node::from(
        Element::new("document")
            .child(Element::new("title").text("Manual"))
            .child(Element::new("grid").child(Element::new("row").child(Element::new("cell").text("c1")))),
    );
    let model = build(&tree, &TagMapping::default());
    assert_eq!(
        model.blocks,
        vec![
            Block::heading(1, "Manual"),
            Block::Table(Table::new(vec![vec!["c1"]])),
        ]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_malformed_markup_is_parse_error() {
    for input in ["<doc><p>x</doc>", "<doc>", "</p>", "<p>&nope;</p>"] {
        let err = convert_markup(input, &TagMapping::default()).unwrap_err();
        assert!(
            matches!(err, ConversionError::Parse { .. }),
            "{} gave {:?}",
            input,
            err
        );
    }
}

#[test]
fn test_empty_input_is_empty_model() {
    let tree = parse_markup("").unwrap();
    assert!(build(&tree, &TagMapping::default()).is_empty());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_irregular_table_renders_padded() {
    let model = convert("<table><tr><td>a</td><td>b</td><td>c</td></tr><tr><td>x</td><td>y</td></tr></table>");
    assert_eq!(to_text(&model), "|===\n| a | b | c\n| x | y |\n|===\n");
}

#[test]
fn test_converted_document_to_text() {
    let model = convert(
        "<doc><title>Guide</title><h2>Setup</h2><p>Install <strong>now</strong></p><ol><li>download</li><li>run</li></ol></doc>",
    );
    assert_eq!(
        to_text(&model),
        "= Guide\n\n== Setup\n\n*Install now*\n\n. download\n. run\n"
    );
}

// =============================================================================
// Composer
// =============================================================================

#[test]
fn test_toc_reflects_only_prior_chapters() {
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 0)
        .unwrap();
    let mut composer = Composer::new(TemplateConfig::default()).with_timestamp(timestamp);
    composer.add_chapter("Summary", 1, "s");
    assert_eq!(composer.generate_table_of_contents(), 1);
    composer.add_chapter("Details", 2, "d");

    let composition = composer.finish();
    let toc_lines: Vec<&str> = composition
        .model
        .iter()
        .filter_map(|block| match block {
            Block::Paragraph(p) if p.text.contains(" .... ") => Some(p.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(toc_lines, vec!["Summary .... 1"]);
    assert_eq!(
        composition.toc,
        vec![TocEntry::new("Summary", 1, 1), TocEntry::new("Details", 2, 2)]
    );
}

#[test]
fn test_compose_with_converted_content() {
    let mut composer = Composer::new(TemplateConfig {
        generate_cover_page: false,
        generate_footer: false,
        ..Default::default()
    });
    composer.add_chapter("Imported", 1, "");
    composer.append_model(convert("<doc><p>from markup</p></doc>"));

    let text = to_text(&composer.finish().model);
    assert_eq!(text, "= Imported\n\nfrom markup\n");
}
