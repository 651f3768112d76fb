//! Transformation engine: format classification and transformer dispatch
//!
//! This module decides which transformation engine handles a given file and
//! hands back the matching `Transformer` implementation:
//!
//! - **dom**: minimal owned XML tree that preserves untouched content verbatim
//! - **xml**: XDT-subset engine for well-formed XML files
//! - **json**: JDT-subset merge engine for `.json` files
//! - **ini**: sectioned key=value replacement for `.ini` files
//! - **trait_def**: the `Transformer` trait and `TransformerKind` enum
//!
//! Classification runs once per file via `classify_file`; callers dispatch
//! through the trait and never inspect file types themselves. JSON is
//! recognized purely by extension; XML by sniffing the first token of the
//! content; INI by extension as the fallback.

pub mod dom;
pub mod ini;
pub mod json;
pub mod trait_def;
pub mod xml;

pub use ini::IniTransformer;
pub use json::JsonTransformer;
pub use trait_def::{TransformOutcome, Transformer, TransformerKind};
pub use xml::XmlTransformer;

use crate::core::encoding;
use crate::core::error::{ShiftError, ShiftResult, TransformError};
use crate::logging::TransformLogger;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

/// Case-insensitive extension test
pub fn has_extension(path: &Path, extension: &str) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Whether the file is JSON: extension-based, no content sniffing
pub fn is_json_file(path: &Path) -> bool {
  has_extension(path, "json")
}

/// Whether the file's content parses as XML
///
/// Reads up to the first meaningful token: a declaration, comment, DOCTYPE,
/// processing instruction or element start counts as XML; character data at
/// the root, a parse error, or an empty file does not. The file must exist;
/// I/O faults and undecodable encodings propagate as errors rather than
/// being treated as "not XML".
pub fn is_xml_file(path: &Path) -> ShiftResult<bool> {
  if !path.exists() {
    return Err(TransformError::SourceNotFound { path: path.to_path_buf() }.into());
  }

  let bytes = fs::read(path)?;
  let detected = encoding::detect(&bytes);
  let text = match encoding::decode(&bytes, detected, path) {
    Ok(text) => text,
    Err(err @ ShiftError::Transform(TransformError::UnsupportedEncoding { .. })) => return Err(err),
    // Binary content that does not decode cannot be XML
    Err(_) => return Ok(false),
  };

  let mut reader = Reader::from_str(&text);
  loop {
    match reader.read_event() {
      Ok(Event::Text(text)) => {
        if !String::from_utf8_lossy(&text).trim().is_empty() {
          return Ok(false);
        }
      }
      Ok(Event::Start(_) | Event::Empty(_) | Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {
        return Ok(true);
      }
      Ok(Event::CData(_) | Event::GeneralRef(_) | Event::End(_) | Event::Eof) => return Ok(false),
      Err(_) => return Ok(false),
    }
  }
}

/// Whether any transformer can handle the file
pub fn is_supported_file(path: &Path) -> ShiftResult<bool> {
  Ok(classify_file(path)? != TransformerKind::Unsupported)
}

/// Resolve the format of a file once
///
/// `.json` wins on extension alone; anything whose content sniffs as XML is
/// XML regardless of extension; `.ini` is the extension-based fallback.
pub fn classify_file(path: &Path) -> ShiftResult<TransformerKind> {
  if is_json_file(path) {
    return Ok(TransformerKind::Json);
  }
  if is_xml_file(path)? {
    return Ok(TransformerKind::Xml);
  }
  if has_extension(path, "ini") {
    return Ok(TransformerKind::Ini);
  }
  Ok(TransformerKind::Unsupported)
}

/// Build the transformer for a file, bound to the given logger
///
/// `use_sections` makes the XML engine nest its log output to mirror
/// transformation depth; the other engines ignore it.
pub fn get_transformer<'a>(
  path: &Path,
  logger: &'a dyn TransformLogger,
  use_sections: bool,
) -> ShiftResult<Box<dyn Transformer + 'a>> {
  match classify_file(path)? {
    TransformerKind::Json => Ok(Box::new(JsonTransformer::new(logger))),
    TransformerKind::Xml => Ok(Box::new(XmlTransformer::new(logger, use_sections))),
    TransformerKind::Ini => Ok(Box::new(IniTransformer::new(logger))),
    TransformerKind::Unsupported => Err(TransformError::UnsupportedFormat { path: path.to_path_buf() }.into()),
  }
}
