//! XML transformation with XDT-style directives
//!
//! The transform document mirrors the source document's hierarchy. Elements
//! may carry attributes in the XDT namespace
//! (`http://schemas.microsoft.com/XML-Document-Transform`):
//!
//! - `xdt:Locator="Match(attr[,attr])"` narrows which source elements a
//!   transform element corresponds to; without a locator, all same-named
//!   children of the matched parent correspond.
//! - `xdt:Transform` names the directive: `Replace`, `Remove`, `RemoveAll`,
//!   `RemoveAttributes(a[,b])`, `SetAttributes` / `SetAttributes(a[,b])`,
//!   `Insert`, `InsertIfMissing`.
//!
//! An element carrying no directive recurses into its matching source
//! children. A directive whose locator matches nothing, an unknown verb, or
//! a malformed argument list fails the transformation: the failure is
//! reported through the logger with the transform file position and nothing
//! is written.
//!
//! Untouched regions of the source document keep their exact formatting; see
//! the `dom` module.

use crate::core::encoding;
use crate::core::error::{ShiftResult, TransformError};
use crate::engine::dom::{self, XmlAttr, XmlDocument, XmlElement, XmlNode};
use crate::engine::trait_def::{TransformOutcome, Transformer, TransformerKind};
use crate::logging::{MessageImportance, TransformLogger};
use std::collections::HashSet;
use std::path::Path;

/// The XML-Document-Transform namespace URI
pub const XDT_NAMESPACE: &str = "http://schemas.microsoft.com/XML-Document-Transform";

/// XDT-subset transformer for well-formed XML files
pub struct XmlTransformer<'a> {
  logger: &'a dyn TransformLogger,
  use_sections: bool,
}

/// Parsed `xdt:Transform` verb
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
  Replace,
  Remove,
  RemoveAll,
  RemoveAttributes(Vec<String>),
  SetAttributes(Vec<String>),
  Insert,
  InsertIfMissing,
}

/// Directives extracted from one transform element
struct Directives {
  verb: Option<Verb>,
  /// `Match(...)` attribute names; `None` means match by element name only
  match_attrs: Option<Vec<String>>,
}

/// A directive-level problem: reported via the logger, fails the transform
struct DirectiveError {
  line: u64,
  column: u64,
  message: String,
}

impl<'a> XmlTransformer<'a> {
  pub fn new(logger: &'a dyn TransformLogger, use_sections: bool) -> Self {
    Self { logger, use_sections }
  }

  /// Same transformer bound to a different logger
  #[allow(dead_code)]
  pub fn with_logger(self, logger: &'a dyn TransformLogger) -> Self {
    Self { logger, ..self }
  }

  fn apply(&self, transform_doc: &XmlDocument, source_doc: &mut XmlDocument, transform_path: &Path) -> bool {
    let prefixes = collect_xdt_prefixes(&transform_doc.root);
    if prefixes.is_empty() {
      self
        .logger
        .log_warning(&format!("{} declares no XDT namespace prefix; no directives will apply", transform_path.display()));
    }

    if transform_doc.root.name != source_doc.root.name {
      self.logger.log_error(&format!(
        "root element mismatch: transform document has <{}>, source document has <{}>",
        transform_doc.root.name, source_doc.root.name
      ));
      return false;
    }

    let path = format!("/{}", transform_doc.root.name);
    match self.walk(&transform_doc.root, &mut source_doc.root, &prefixes, &path) {
      Ok(()) => true,
      Err(err) => {
        self.logger.log_error_at(transform_path, err.line, err.column, &err.message);
        false
      }
    }
  }

  fn walk(
    &self,
    transform_parent: &XmlElement,
    source_parent: &mut XmlElement,
    prefixes: &HashSet<String>,
    path: &str,
  ) -> Result<(), DirectiveError> {
    for child in &transform_parent.children {
      let XmlNode::Element(transform_child) = child else {
        continue;
      };
      let child_path = format!("{}/{}", path, transform_child.name);
      let directives = extract_directives(transform_child, prefixes)?;
      let matched = matching_children(source_parent, transform_child, directives.match_attrs.as_deref())?;

      match &directives.verb {
        None => {
          for index in matched {
            let XmlNode::Element(source_child) = &mut source_parent.children[index] else {
              continue;
            };
            self.walk(transform_child, source_child, prefixes, &child_path)?;
          }
        }
        Some(Verb::Replace) => {
          require_matches(&matched, transform_child, &directives, &child_path)?;
          for index in &matched {
            source_parent.children[*index] = XmlNode::Element(clean_clone(transform_child, prefixes));
          }
          self.log_applied("Replace", &child_path, matched.len());
        }
        Some(Verb::Remove) => {
          require_matches(&matched, transform_child, &directives, &child_path)?;
          source_parent.children.remove(matched[0]);
          self.log_applied("Remove", &child_path, 1);
        }
        Some(Verb::RemoveAll) => {
          require_matches(&matched, transform_child, &directives, &child_path)?;
          for index in matched.iter().rev() {
            source_parent.children.remove(*index);
          }
          self.log_applied("RemoveAll", &child_path, matched.len());
        }
        Some(Verb::RemoveAttributes(names)) => {
          require_matches(&matched, transform_child, &directives, &child_path)?;
          for index in &matched {
            let XmlNode::Element(target) = &mut source_parent.children[*index] else {
              continue;
            };
            for name in names {
              if !target.remove_attr(name) {
                self
                  .logger
                  .log_warning(&format!("{}: attribute '{}' not present, nothing to remove", child_path, name));
              }
            }
          }
          self.log_applied("RemoveAttributes", &child_path, matched.len());
        }
        Some(Verb::SetAttributes(names)) => {
          require_matches(&matched, transform_child, &directives, &child_path)?;
          let names = if names.is_empty() {
            plain_attr_names(transform_child, prefixes)
          } else {
            names.clone()
          };
          for name in &names {
            if transform_child.attr(name).is_none() {
              return Err(directive_error(
                transform_child,
                format!("SetAttributes names attribute '{}' which the transform element does not carry", name),
              ));
            }
          }
          for index in &matched {
            let XmlNode::Element(target) = &mut source_parent.children[*index] else {
              continue;
            };
            for name in &names {
              let value = transform_child.attr(name).unwrap_or_default().to_string();
              target.set_attr(name, &value);
            }
          }
          self.log_applied("SetAttributes", &child_path, matched.len());
        }
        Some(Verb::Insert) => {
          insert_child(source_parent, clean_clone(transform_child, prefixes));
          self.log_applied("Insert", &child_path, 1);
        }
        Some(Verb::InsertIfMissing) => {
          if matched.is_empty() {
            insert_child(source_parent, clean_clone(transform_child, prefixes));
            self.log_applied("InsertIfMissing", &child_path, 1);
          } else {
            self
              .logger
              .log_message(MessageImportance::Low, &format!("{} already present, InsertIfMissing skipped", child_path));
          }
        }
      }
    }
    Ok(())
  }

  fn log_applied(&self, verb: &str, path: &str, count: usize) {
    self
      .logger
      .log_message(MessageImportance::Low, &format!("Applied {} to {} ({} element(s))", verb, path, count));
  }
}

fn require_matches(
  matched: &[usize],
  transform_child: &XmlElement,
  directives: &Directives,
  path: &str,
) -> Result<(), DirectiveError> {
  if matched.is_empty() {
    let locator = match &directives.match_attrs {
      Some(attrs) => format!(" with locator Match({})", attrs.join(",")),
      None => String::new(),
    };
    return Err(directive_error(
      transform_child,
      format!("no element in the source document matches {}{}", path, locator),
    ));
  }
  Ok(())
}

fn directive_error(element: &XmlElement, message: String) -> DirectiveError {
  DirectiveError {
    line: element.line,
    column: element.column,
    message,
  }
}

/// Prefixes bound to the XDT namespace anywhere in the transform document
fn collect_xdt_prefixes(element: &XmlElement) -> HashSet<String> {
  let mut prefixes = HashSet::new();
  collect_prefixes_into(element, &mut prefixes);
  prefixes
}

fn collect_prefixes_into(element: &XmlElement, prefixes: &mut HashSet<String>) {
  for attr in &element.attrs {
    if let Some(prefix) = attr.name.strip_prefix("xmlns:")
      && dom::unescape_lossy(&attr.value) == XDT_NAMESPACE
    {
      prefixes.insert(prefix.to_string());
    }
  }
  for child in &element.children {
    if let XmlNode::Element(child) = child {
      collect_prefixes_into(child, prefixes);
    }
  }
}

/// Split `Name` or `Name(arg, arg)` into the verb name and its arguments
fn parse_call(value: &str) -> Option<(&str, Vec<String>)> {
  let value = value.trim();
  match value.find('(') {
    None => Some((value, Vec::new())),
    Some(open) => {
      let name = value[..open].trim();
      let rest = &value[open + 1..];
      let close = rest.rfind(')')?;
      if !rest[close + 1..].trim().is_empty() {
        return None;
      }
      let inner = rest[..close].trim();
      if inner.is_empty() {
        return Some((name, Vec::new()));
      }
      let args: Vec<String> = inner.split(',').map(|arg| arg.trim().to_string()).collect();
      if args.iter().any(|arg| arg.is_empty()) {
        return None;
      }
      Some((name, args))
    }
  }
}

fn extract_directives(element: &XmlElement, prefixes: &HashSet<String>) -> Result<Directives, DirectiveError> {
  let mut verb = None;
  let mut match_attrs = None;

  for attr in &element.attrs {
    let Some((prefix, local)) = attr.name.split_once(':') else {
      continue;
    };
    if !prefixes.contains(prefix) {
      continue;
    }
    let value = dom::unescape_lossy(&attr.value);
    match local {
      "Transform" => {
        let Some((name, args)) = parse_call(&value) else {
          return Err(directive_error(element, format!("malformed Transform directive '{}'", value)));
        };
        let parsed = match name {
          "Replace" if args.is_empty() => Verb::Replace,
          "Remove" if args.is_empty() => Verb::Remove,
          "RemoveAll" if args.is_empty() => Verb::RemoveAll,
          "RemoveAttributes" if !args.is_empty() => Verb::RemoveAttributes(args),
          "SetAttributes" => Verb::SetAttributes(args),
          "Insert" if args.is_empty() => Verb::Insert,
          "InsertIfMissing" if args.is_empty() => Verb::InsertIfMissing,
          _ => {
            return Err(directive_error(element, format!("unknown or malformed Transform directive '{}'", value)));
          }
        };
        verb = Some(parsed);
      }
      "Locator" => {
        let Some((name, args)) = parse_call(&value) else {
          return Err(directive_error(element, format!("malformed Locator '{}'", value)));
        };
        if name != "Match" || args.is_empty() {
          return Err(directive_error(element, format!("unsupported Locator '{}'; only Match(attr[,attr]) is supported", value)));
        }
        match_attrs = Some(args);
      }
      _ => {}
    }
  }

  Ok(Directives { verb, match_attrs })
}

/// Indexes of `parent`'s children corresponding to the transform element
fn matching_children(
  parent: &XmlElement,
  transform_child: &XmlElement,
  match_attrs: Option<&[String]>,
) -> Result<Vec<usize>, DirectiveError> {
  if let Some(attrs) = match_attrs {
    for name in attrs {
      if transform_child.attr(name).is_none() {
        return Err(directive_error(
          transform_child,
          format!("Locator Match({}) names attribute '{}' which the transform element does not carry", attrs.join(","), name),
        ));
      }
    }
  }

  let mut matched = Vec::new();
  for (index, node) in parent.children.iter().enumerate() {
    let XmlNode::Element(candidate) = node else {
      continue;
    };
    if candidate.name != transform_child.name {
      continue;
    }
    let locator_hit = match match_attrs {
      None => true,
      Some(attrs) => attrs
        .iter()
        .all(|name| candidate.attr_unescaped(name) == transform_child.attr_unescaped(name)),
    };
    if locator_hit {
      matched.push(index);
    }
  }
  Ok(matched)
}

/// Attribute names on a transform element that are not XDT markup
fn plain_attr_names(element: &XmlElement, prefixes: &HashSet<String>) -> Vec<String> {
  element
    .attrs
    .iter()
    .filter(|attr| !is_xdt_attr(attr, prefixes))
    .map(|attr| attr.name.clone())
    .collect()
}

fn is_xdt_attr(attr: &XmlAttr, prefixes: &HashSet<String>) -> bool {
  if let Some(prefix) = attr.name.strip_prefix("xmlns:")
    && prefixes.contains(prefix)
  {
    return true;
  }
  match attr.name.split_once(':') {
    Some((prefix, _)) => prefixes.contains(prefix),
    None => false,
  }
}

/// Deep copy with all XDT markup stripped
fn clean_clone(element: &XmlElement, prefixes: &HashSet<String>) -> XmlElement {
  let mut cloned = element.clone();
  strip_xdt(&mut cloned, prefixes);
  cloned
}

fn strip_xdt(element: &mut XmlElement, prefixes: &HashSet<String>) {
  element.attrs.retain(|attr| !is_xdt_attr(attr, prefixes));
  for child in &mut element.children {
    if let XmlNode::Element(child) = child {
      strip_xdt(child, prefixes);
    }
  }
}

/// Append a new child element, mirroring the indentation of existing children
fn insert_child(parent: &mut XmlElement, element: XmlElement) {
  let element_indexes = parent.element_children();
  match element_indexes.last() {
    Some(&last) => {
      let indent = match last.checked_sub(1).map(|i| &parent.children[i]) {
        Some(XmlNode::Text(text)) if text.trim().is_empty() => Some(text.clone()),
        _ => None,
      };
      let mut position = last + 1;
      if let Some(indent) = indent {
        parent.children.insert(position, XmlNode::Text(indent));
        position += 1;
      }
      parent.children.insert(position, XmlNode::Element(element));
    }
    None => {
      parent.children.push(XmlNode::Element(element));
    }
  }
}

impl Transformer for XmlTransformer<'_> {
  fn kind(&self) -> TransformerKind {
    TransformerKind::Xml
  }

  fn is_file_supported(&self, path: &Path) -> bool {
    crate::engine::is_xml_file(path).unwrap_or(false)
  }

  fn transform(&self, source: &Path, transform: &Path, destination: &Path) -> ShiftResult<TransformOutcome> {
    if !source.exists() {
      return Err(TransformError::SourceNotFound { path: source.to_path_buf() }.into());
    }
    if !transform.exists() {
      return Err(TransformError::TransformNotFound { path: transform.to_path_buf() }.into());
    }

    let (source_text, source_encoding) = encoding::read_file(source)?;
    let (transform_text, _) = encoding::read_file(transform)?;
    let mut source_doc = dom::parse(&source_text, source)?;
    let transform_doc = dom::parse(&transform_text, transform)?;

    if self.use_sections {
      self.logger.start_section(
        MessageImportance::High,
        &format!("Applying {} to {}", transform.display(), source.display()),
      );
    }
    let applied = self.apply(&transform_doc, &mut source_doc, transform);
    if self.use_sections {
      let status = if applied { "done" } else { "failed" };
      self.logger.end_section(MessageImportance::High, &format!("Transformation {}", status));
    }

    if !applied {
      return Ok(TransformOutcome::Failed);
    }

    encoding::write_file(destination, &source_doc.to_xml(), source_encoding)?;
    self.logger.log_message(
      MessageImportance::Normal,
      &format!("Wrote {}", destination.display()),
    );
    Ok(TransformOutcome::Applied)
  }

  fn create_transform_file(&self, source: &Path, transform_to_create: &Path, overwrite: bool) -> ShiftResult<()> {
    if transform_to_create.exists() && !overwrite {
      return Ok(());
    }
    if !source.exists() {
      return Err(TransformError::SourceNotFound { path: source.to_path_buf() }.into());
    }

    let (source_text, source_encoding) = encoding::read_file(source)?;
    let source_doc = dom::parse(&source_text, source)?;

    // Root element of the source, children stripped, XDT namespace declared
    let mut root = XmlElement::new(source_doc.root.name.clone());
    root.attrs = source_doc.root.attrs.clone();
    if collect_xdt_prefixes(&source_doc.root).is_empty() {
      root.set_attr("xmlns:xdt", XDT_NAMESPACE);
    }
    root.children.push(XmlNode::Text("\n".to_string()));

    let skeleton = XmlDocument {
      prolog: source_doc.prolog.clone(),
      root,
      epilog: vec![XmlNode::Text("\n".to_string())],
    };

    encoding::write_file(transform_to_create, &skeleton.to_xml(), source_encoding)?;
    Ok(())
  }
}
