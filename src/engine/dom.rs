//! Minimal owned XML tree over quick-xml events
//!
//! The transformation engine needs to mutate targeted elements while leaving
//! every untouched byte of the document alone. Only elements are structured;
//! everything else (text, comments, CDATA, the XML declaration, processing
//! instructions, DOCTYPE) is stored as the verbatim source slice and written
//! back unchanged, so whitespace and escaping survive the round trip.
//!
//! This is deliberately not a general-purpose XML library: no namespace
//! resolution beyond attribute prefixes, no entity expansion, no DTD
//! processing (quick-xml performs no external fetches).

use crate::core::error::{ShiftResult, TransformError};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// An attribute with its raw (escaped) value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttr {
  pub name: String,
  pub value: String,
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
  pub name: String,
  pub attrs: Vec<XmlAttr>,
  pub children: Vec<XmlNode>,
  /// Serialized as `<name/>` when true and childless
  pub self_closing: bool,
  /// 1-based source position of the start tag, for diagnostics
  pub line: u64,
  pub column: u64,
}

/// Any node the serializer can reproduce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
  Element(XmlElement),
  /// Character data, verbatim (still escaped) as it appeared in the source
  Text(String),
  /// Any other markup (comment, CDATA, declaration, PI, DOCTYPE), verbatim
  /// including its delimiters
  Markup(String),
}

/// A parsed document: nodes before the root, the root element, nodes after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
  pub prolog: Vec<XmlNode>,
  pub root: XmlElement,
  pub epilog: Vec<XmlNode>,
}

impl XmlElement {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      attrs: Vec::new(),
      children: Vec::new(),
      self_closing: false,
      line: 0,
      column: 0,
    }
  }

  /// Raw (escaped) attribute value
  pub fn attr(&self, name: &str) -> Option<&str> {
    self.attrs.iter().find(|attr| attr.name == name).map(|attr| attr.value.as_str())
  }

  /// Unescaped attribute value
  pub fn attr_unescaped(&self, name: &str) -> Option<String> {
    self.attr(name).map(unescape_lossy)
  }

  pub fn set_attr(&mut self, name: &str, value: &str) {
    match self.attrs.iter_mut().find(|attr| attr.name == name) {
      Some(attr) => attr.value = value.to_string(),
      None => self.attrs.push(XmlAttr {
        name: name.to_string(),
        value: value.to_string(),
      }),
    }
  }

  /// Remove an attribute; returns whether it existed
  pub fn remove_attr(&mut self, name: &str) -> bool {
    let before = self.attrs.len();
    self.attrs.retain(|attr| attr.name != name);
    self.attrs.len() != before
  }

  /// Indexes of element children
  pub fn element_children(&self) -> Vec<usize> {
    self
      .children
      .iter()
      .enumerate()
      .filter_map(|(index, node)| matches!(node, XmlNode::Element(_)).then_some(index))
      .collect()
  }
}

/// Unescape `&lt;`-style references; invalid references pass through raw
pub fn unescape_lossy(raw: &str) -> String {
  match quick_xml::escape::unescape(raw) {
    Ok(text) => text.into_owned(),
    Err(_) => raw.to_string(),
  }
}

/// 1-based line and column of a byte offset
pub fn line_col(text: &str, offset: usize) -> (u64, u64) {
  let clamped = offset.min(text.len());
  let before = &text[..clamped];
  let line = before.bytes().filter(|byte| *byte == b'\n').count() as u64 + 1;
  let column = match before.rfind('\n') {
    Some(pos) => (clamped - pos) as u64,
    None => clamped as u64 + 1,
  };
  (line, column)
}

fn parse_error(path: &Path, text: &str, offset: usize, reason: impl Into<String>) -> TransformError {
  let (line, column) = line_col(text, offset);
  TransformError::Parse {
    path: path.to_path_buf(),
    reason: format!("{} at line {}, column {}", reason.into(), line, column),
  }
}

/// Parse a document, keeping non-element content verbatim
pub fn parse(text: &str, path: &Path) -> ShiftResult<XmlDocument> {
  let mut reader = Reader::from_str(text);
  let mut stack: Vec<XmlElement> = Vec::new();
  let mut prolog: Vec<XmlNode> = Vec::new();
  let mut root: Option<XmlElement> = None;
  let mut epilog: Vec<XmlNode> = Vec::new();

  loop {
    let start_offset = reader.buffer_position() as usize;
    let event = reader
      .read_event()
      .map_err(|err| parse_error(path, text, reader.error_position() as usize, err.to_string()))?;
    let end_offset = reader.buffer_position() as usize;
    // The exact bytes this event was parsed from
    let raw = &text[start_offset..end_offset.min(text.len())];

    match event {
      Event::Start(start) => {
        if root.is_some() && stack.is_empty() {
          return Err(parse_error(path, text, start_offset, "multiple root elements").into());
        }
        let element = element_from_start(&start, false, text, start_offset, path)?;
        stack.push(element);
      }
      Event::Empty(start) => {
        if root.is_some() && stack.is_empty() {
          return Err(parse_error(path, text, start_offset, "multiple root elements").into());
        }
        let element = element_from_start(&start, true, text, start_offset, path)?;
        match stack.last_mut() {
          Some(parent) => parent.children.push(XmlNode::Element(element)),
          None => root = Some(element),
        }
      }
      Event::End(_) => {
        // quick-xml already rejects mismatched and stray end tags
        let element = stack
          .pop()
          .ok_or_else(|| parse_error(path, text, start_offset, "unexpected closing tag"))?;
        match stack.last_mut() {
          Some(parent) => parent.children.push(XmlNode::Element(element)),
          None => root = Some(element),
        }
      }
      // Entity references are kept raw inside their surrounding text
      Event::Text(_) | Event::GeneralRef(_) => {
        // Character data outside any element is not well-formed XML
        if stack.is_empty() && !raw.trim().is_empty() {
          return Err(parse_error(path, text, start_offset, "character data outside of the root element").into());
        }
        attach(XmlNode::Text(raw.to_string()), &mut stack, &mut prolog, &root, &mut epilog);
      }
      Event::CData(_) | Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
        attach(XmlNode::Markup(raw.to_string()), &mut stack, &mut prolog, &root, &mut epilog);
      }
      Event::Eof => break,
    }
  }

  if let Some(open) = stack.last() {
    return Err(parse_error(path, text, text.len(), format!("unclosed element <{}>", open.name)).into());
  }

  let root = root.ok_or_else(|| parse_error(path, text, text.len(), "document has no root element"))?;
  Ok(XmlDocument { prolog, root, epilog })
}

fn attach(
  node: XmlNode,
  stack: &mut [XmlElement],
  prolog: &mut Vec<XmlNode>,
  root: &Option<XmlElement>,
  epilog: &mut Vec<XmlNode>,
) {
  match stack.last_mut() {
    Some(parent) => parent.children.push(node),
    None if root.is_none() => prolog.push(node),
    None => epilog.push(node),
  }
}

fn element_from_start(
  start: &quick_xml::events::BytesStart<'_>,
  self_closing: bool,
  text: &str,
  offset: usize,
  path: &Path,
) -> ShiftResult<XmlElement> {
  let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
  let (line, column) = line_col(text, offset);
  let mut attrs = Vec::new();

  for attribute in start.attributes() {
    let attribute = attribute.map_err(|err| parse_error(path, text, offset, err.to_string()))?;
    attrs.push(XmlAttr {
      name: String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
      value: String::from_utf8_lossy(&attribute.value).into_owned(),
    });
  }

  Ok(XmlElement {
    name,
    attrs,
    children: Vec::new(),
    self_closing,
    line,
    column,
  })
}

impl XmlDocument {
  /// Serialize back to text; untouched content comes out verbatim
  pub fn to_xml(&self) -> String {
    let mut out = String::new();
    for node in &self.prolog {
      write_node(&mut out, node);
    }
    write_element(&mut out, &self.root);
    for node in &self.epilog {
      write_node(&mut out, node);
    }
    out
  }
}

fn write_node(out: &mut String, node: &XmlNode) {
  match node {
    XmlNode::Element(element) => write_element(out, element),
    XmlNode::Text(raw) | XmlNode::Markup(raw) => out.push_str(raw),
  }
}

fn write_element(out: &mut String, element: &XmlElement) {
  out.push('<');
  out.push_str(&element.name);
  for attr in &element.attrs {
    out.push(' ');
    out.push_str(&attr.name);
    out.push_str("=\"");
    out.push_str(&attr.value);
    out.push('"');
  }
  if element.children.is_empty() && element.self_closing {
    out.push_str("/>");
    return;
  }
  out.push('>');
  for child in &element.children {
    write_node(out, child);
  }
  out.push_str("</");
  out.push_str(&element.name);
  out.push('>');
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_verbatim() {
    let text = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n  <appSettings>\n    <add key=\"a\" value=\"1\"/>\n  </appSettings>\n</configuration>\n";
    let doc = parse(text, Path::new("test.config")).unwrap();
    assert_eq!(doc.to_xml(), text);
  }

  #[test]
  fn round_trips_comments_and_escapes() {
    let text = "<root><!-- keep &amp; hold --><item name=\"a&amp;b\">x &lt; y</item></root>";
    let doc = parse(text, Path::new("test.xml")).unwrap();
    assert_eq!(doc.to_xml(), text);
  }

  #[test]
  fn rejects_unclosed_elements() {
    assert!(parse("<root><child>", Path::new("bad.xml")).is_err());
  }

  #[test]
  fn rejects_text_at_root_level() {
    assert!(parse("plain text, not xml", Path::new("bad.txt")).is_err());
  }

  #[test]
  fn attr_accessors() {
    let doc = parse("<root a=\"1\" b=\"x&amp;y\"/>", Path::new("t.xml")).unwrap();
    assert_eq!(doc.root.attr("a"), Some("1"));
    assert_eq!(doc.root.attr_unescaped("b").as_deref(), Some("x&y"));

    let mut root = doc.root;
    root.set_attr("a", "2");
    assert_eq!(root.attr("a"), Some("2"));
    assert!(root.remove_attr("b"));
    assert!(!root.remove_attr("b"));
  }

  #[test]
  fn reports_position_of_elements() {
    let text = "<root>\n  <child/>\n</root>";
    let doc = parse(text, Path::new("t.xml")).unwrap();
    let XmlNode::Element(child) = &doc.root.children[1] else {
      panic!("expected element");
    };
    assert_eq!(child.line, 2);
    assert_eq!(child.column, 3);
  }
}
