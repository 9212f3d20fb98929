//! Markup parsing adapter
//!
//! Turns HTML-like or custom XML markup into a [`Node`] tree using the
//! `quick-xml` event reader. The reader does the tokenizing; this module
//! only assembles events into a tree, tolerating HTML void elements and
//! the common HTML named entities.

use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ConversionError, Result};
use crate::node::{Element, Node};

/// Name of the synthetic element wrapping every parsed tree
pub const DOCUMENT_ROOT: &str = "#document";

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Parse markup text into a node tree rooted at a `#document` element
///
/// # Errors
///
/// Returns [`ConversionError::Parse`] for mismatched or unclosed tags,
/// unknown entities, or any tokenizer failure.
pub fn parse_markup(input: &str) -> Result<Node> {
    let mut reader = Reader::from_str(input);
    // End tags are matched here so that HTML void elements can stay open
    reader.config_mut().check_end_names = false;

    let mut stack: Vec<Element> = vec![Element::new(DOCUMENT_ROOT)];

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let element = start_element(e)?;
                if is_void(&element.name) {
                    push_child(&mut stack, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                push_child(&mut stack, Node::Element(element));
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if is_void(&name) {
                    continue;
                }
                close_element(&mut stack, &name, position)?;
            }
            Ok(Event::Text(ref e)) => {
                let raw = String::from_utf8_lossy(e);
                let text = unescape_with(&raw, resolve_html_entity).map_err(|err| {
                    ConversionError::parse(format!("{} at byte {}", err, position))
                })?;
                if !text.is_empty() {
                    push_child(&mut stack, Node::Text(text.into_owned()));
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_child(&mut stack, Node::Text(text));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {
                // Comments, declarations, processing instructions, doctypes
            }
            Err(e) => {
                return Err(ConversionError::parse(format!(
                    "{} at byte {}",
                    e,
                    reader.error_position()
                )))
            }
        }
    }

    if stack.len() > 1 {
        let unclosed = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(ConversionError::parse(format!(
            "unclosed element <{}> at end of input",
            unclosed
        )));
    }

    let root = stack.pop().unwrap_or_else(|| Element::new(DOCUMENT_ROOT));
    log::debug!("Parsed markup into {} top-level nodes", root.children.len());
    Ok(Node::Element(root))
}

fn start_element(e: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in e.html_attributes() {
        let attr = attr.map_err(ConversionError::parse)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape_with(&raw, resolve_html_entity).map_err(ConversionError::parse)?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn close_element(stack: &mut Vec<Element>, name: &str, position: u64) -> Result<()> {
    // The synthetic root is never closed by markup
    if stack.len() <= 1 {
        return Err(ConversionError::parse(format!(
            "unexpected end tag </{}> at byte {}",
            name, position
        )));
    }

    let open = stack.last().map(|e| e.name.as_str()).unwrap_or_default();
    if !open.eq_ignore_ascii_case(name) {
        return Err(ConversionError::parse(format!(
            "mismatched end tag </{}> at byte {}, expected </{}>",
            name, position, open
        )));
    }

    if let Some(finished) = stack.pop() {
        push_child(stack, Node::Element(finished));
    }
    Ok(())
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Resolve the predefined XML entities plus common HTML named entities
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "deg" => "\u{b0}",
        "euro" => "\u{20ac}",
        "pound" => "\u{a3}",
        "yen" => "\u{a5}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        "times" => "\u{d7}",
        "divide" => "\u{f7}",
        _ => return None,
    };
    Some(resolved)
}
