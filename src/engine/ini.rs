//! INI transformation: sectioned key=value replacement
//!
//! The transform file is a flat INI document; every `key=value` it contains,
//! scoped by its `[section]` header, becomes a replacement rule. The source
//! file is processed line by line: a `key=value` line whose section and key
//! (both case-insensitive) have a rule gets its value replaced, everything
//! else passes through unchanged, including comments (`;` or `#`) and
//! section headers. Duplicate keys in the transform file: first occurrence
//! wins.
//!
//! The output is accumulated in memory and written in one step, so a failure
//! mid-processing can never leave a partially-written destination. I/O and
//! encoding problems propagate as errors.

use crate::core::encoding;
use crate::core::error::{ShiftResult, TransformError};
use crate::engine::trait_def::{TransformOutcome, Transformer, TransformerKind};
use crate::logging::{MessageImportance, TransformLogger};
use std::collections::HashMap;
use std::path::Path;

/// Key=value transformer for `.ini` files
pub struct IniTransformer<'a> {
  logger: &'a dyn TransformLogger,
}

impl<'a> IniTransformer<'a> {
  pub fn new(logger: &'a dyn TransformLogger) -> Self {
    Self { logger }
  }

  /// Same transformer bound to a different logger
  #[allow(dead_code)]
  pub fn with_logger(self, logger: &'a dyn TransformLogger) -> Self {
    Self { logger }
  }
}

fn is_comment(line: &str) -> bool {
  let trimmed = line.trim_start();
  trimmed.starts_with(';') || trimmed.starts_with('#')
}

fn section_header(line: &str) -> Option<&str> {
  let trimmed = line.trim();
  trimmed.strip_prefix('[')?.strip_suffix(']')
}

/// Replacement rules keyed by lowercased (section, key)
fn replacement_rules(transform_text: &str) -> HashMap<(String, String), String> {
  let mut rules = HashMap::new();
  let mut section = String::new();

  for line in transform_text.lines() {
    if line.trim().is_empty() || is_comment(line) {
      continue;
    }
    if let Some(name) = section_header(line) {
      section = name.to_lowercase();
      continue;
    }
    if let Some((key, value)) = line.split_once('=') {
      rules
        .entry((section.clone(), key.trim().to_lowercase()))
        .or_insert_with(|| value.trim().to_string());
    }
  }
  rules
}

/// Replace the value part of a `key=value` line, keeping the layout around it
fn replace_value(line: &str, new_value: &str) -> String {
  let Some((left, right)) = line.split_once('=') else {
    return line.to_string();
  };
  let leading_ws: String = right.chars().take_while(|ch| ch.is_whitespace() && *ch != '\n').collect();
  format!("{}={}{}", left, leading_ws, new_value)
}

impl Transformer for IniTransformer<'_> {
  fn kind(&self) -> TransformerKind {
    TransformerKind::Ini
  }

  fn is_file_supported(&self, path: &Path) -> bool {
    crate::engine::has_extension(path, "ini")
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

    let rules = replacement_rules(&transform_text);
    let newline = if source_text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut section = String::new();
    let mut replaced = 0usize;
    let mut lines = Vec::new();

    for line in source_text.lines() {
      if is_comment(line) || line.trim().is_empty() {
        lines.push(line.to_string());
        continue;
      }
      if let Some(name) = section_header(line) {
        section = name.to_lowercase();
        lines.push(line.to_string());
        continue;
      }
      match line.split_once('=') {
        Some((key, _)) => {
          let rule = rules.get(&(section.clone(), key.trim().to_lowercase()));
          match rule {
            Some(value) => {
              lines.push(replace_value(line, value));
              replaced += 1;
              self
                .logger
                .log_message(MessageImportance::Low, &format!("Replaced [{}] {}", section, key.trim()));
            }
            None => lines.push(line.to_string()),
          }
        }
        None => lines.push(line.to_string()),
      }
    }

    let mut output = lines.join(newline);
    if source_text.ends_with('\n') {
      output.push_str(newline);
    }

    encoding::write_file(destination, &output, source_encoding)?;
    self.logger.log_message(
      MessageImportance::Normal,
      &format!("Wrote {} ({} value(s) replaced)", destination.display(), replaced),
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

    let (_, source_encoding) = encoding::read_file(source)?;
    encoding::write_file(transform_to_create, "", source_encoding)?;
    Ok(())
  }
}
