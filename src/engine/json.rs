//! JSON transformation with JDT-style merge semantics
//!
//! Default behavior merges the transform document into the source: objects
//! merge member-by-member, arrays append, scalars replace. Explicit verbs
//! override the default for the node that carries them:
//!
//! - `"@jdt.replace": <value>` - the value replaces the node wholesale
//! - `"@jdt.remove": true | "name" | ["a","b"]` - removes all members, or
//!   the named members
//! - `"@jdt.rename": {"old": "new"}` - renames members
//!
//! An unknown `@jdt.*` key or a verb value of the wrong shape fails the
//! transformation; the failure is reported through the logger with the JSON
//! path of the offending node and nothing is written.
//!
//! The destination keeps the source file's encoding and BOM.

use crate::core::encoding;
use crate::core::error::{ShiftResult, TransformError};
use crate::engine::trait_def::{TransformOutcome, Transformer, TransformerKind};
use crate::logging::{MessageImportance, TransformLogger};
use serde_json::{Map, Value};
use std::path::Path;

const VERB_PREFIX: &str = "@jdt.";
const JSON_TEMPLATE: &str = "{\n}\n";

/// JDT-subset transformer for `.json` files
pub struct JsonTransformer<'a> {
  logger: &'a dyn TransformLogger,
}

struct VerbError {
  path: String,
  message: String,
}

impl<'a> JsonTransformer<'a> {
  pub fn new(logger: &'a dyn TransformLogger) -> Self {
    Self { logger }
  }

  /// Same transformer bound to a different logger
  #[allow(dead_code)]
  pub fn with_logger(self, logger: &'a dyn TransformLogger) -> Self {
    Self { logger }
  }

  fn apply(&self, source: &mut Value, transform: &Value) -> Result<(), VerbError> {
    self.apply_value(source, transform, "$")
  }

  fn apply_value(&self, source: &mut Value, transform: &Value, path: &str) -> Result<(), VerbError> {
    match transform {
      Value::Object(members) => self.apply_object(source, members, path),
      Value::Array(items) => {
        match source {
          Value::Array(existing) => existing.extend(items.iter().cloned()),
          _ => *source = transform.clone(),
        }
        Ok(())
      }
      scalar => {
        *source = scalar.clone();
        Ok(())
      }
    }
  }

  fn apply_object(&self, source: &mut Value, members: &Map<String, Value>, path: &str) -> Result<(), VerbError> {
    // Verbs first, in JDT order: replace, remove, rename
    if let Some(replacement) = members.get("@jdt.replace") {
      *source = replacement.clone();
      self
        .logger
        .log_message(MessageImportance::Low, &format!("Replaced {}", path));
    }

    for (key, value) in members {
      if !key.starts_with(VERB_PREFIX) {
        continue;
      }
      match key.as_str() {
        "@jdt.replace" => {}
        "@jdt.remove" => self.apply_remove(source, value, path)?,
        "@jdt.rename" => self.apply_rename(source, value, path)?,
        other => {
          return Err(VerbError {
            path: path.to_string(),
            message: format!("unknown transformation verb '{}'", other),
          });
        }
      }
    }

    // Then plain members merge
    let plain: Vec<(&String, &Value)> = members.iter().filter(|(key, _)| !key.starts_with(VERB_PREFIX)).collect();
    if plain.is_empty() {
      return Ok(());
    }

    if !source.is_object() {
      *source = Value::Object(Map::new());
    }
    let Some(map) = source.as_object_mut() else {
      return Ok(());
    };
    for (key, value) in plain {
      let member_path = format!("{}.{}", path, key);
      match map.get_mut(key) {
        Some(existing) => self.apply_value(existing, value, &member_path)?,
        None => {
          ensure_no_verbs(value, &member_path)?;
          map.insert(key.clone(), value.clone());
        }
      }
    }
    Ok(())
  }

  fn apply_remove(&self, source: &mut Value, spec: &Value, path: &str) -> Result<(), VerbError> {
    let Some(map) = source.as_object_mut() else {
      return Err(VerbError {
        path: path.to_string(),
        message: "@jdt.remove applies only to objects".to_string(),
      });
    };
    match spec {
      Value::Bool(true) => {
        map.clear();
        self.logger.log_message(MessageImportance::Low, &format!("Removed all members of {}", path));
      }
      Value::Bool(false) => {}
      Value::String(name) => {
        remove_member(map, name, path, self.logger);
      }
      Value::Array(names) => {
        for name in names {
          let Value::String(name) = name else {
            return Err(VerbError {
              path: path.to_string(),
              message: "@jdt.remove array entries must be member names".to_string(),
            });
          };
          remove_member(map, name, path, self.logger);
        }
      }
      _ => {
        return Err(VerbError {
          path: path.to_string(),
          message: "@jdt.remove expects true, a member name, or an array of member names".to_string(),
        });
      }
    }
    Ok(())
  }

  fn apply_rename(&self, source: &mut Value, spec: &Value, path: &str) -> Result<(), VerbError> {
    let Some(map) = source.as_object_mut() else {
      return Err(VerbError {
        path: path.to_string(),
        message: "@jdt.rename applies only to objects".to_string(),
      });
    };
    let Some(renames) = spec.as_object() else {
      return Err(VerbError {
        path: path.to_string(),
        message: "@jdt.rename expects an object of {\"old\": \"new\"} pairs".to_string(),
      });
    };
    for (old, new) in renames {
      let Value::String(new) = new else {
        return Err(VerbError {
          path: path.to_string(),
          message: format!("@jdt.rename target for '{}' must be a string", old),
        });
      };
      match map.remove(old) {
        Some(value) => {
          map.insert(new.clone(), value);
          self
            .logger
            .log_message(MessageImportance::Low, &format!("Renamed {}.{} to {}", path, old, new));
        }
        None => {
          self
            .logger
            .log_warning(&format!("{}.{} not present, nothing to rename", path, old));
        }
      }
    }
    Ok(())
  }
}

fn remove_member(map: &mut Map<String, Value>, name: &str, path: &str, logger: &dyn TransformLogger) {
  if map.remove(name).is_some() {
    logger.log_message(MessageImportance::Low, &format!("Removed {}.{}", path, name));
  } else {
    logger.log_warning(&format!("{}.{} not present, nothing to remove", path, name));
  }
}

/// Members inserted into the source must not smuggle verbs with them
fn ensure_no_verbs(value: &Value, path: &str) -> Result<(), VerbError> {
  match value {
    Value::Object(members) => {
      for (key, child) in members {
        if key.starts_with(VERB_PREFIX) {
          return Err(VerbError {
            path: path.to_string(),
            message: format!("verb '{}' cannot apply to a member the source document does not have", key),
          });
        }
        ensure_no_verbs(child, &format!("{}.{}", path, key))?;
      }
    }
    Value::Array(items) => {
      for (index, item) in items.iter().enumerate() {
        ensure_no_verbs(item, &format!("{}[{}]", path, index))?;
      }
    }
    _ => {}
  }
  Ok(())
}

impl Transformer for JsonTransformer<'_> {
  fn kind(&self) -> TransformerKind {
    TransformerKind::Json
  }

  fn is_file_supported(&self, path: &Path) -> bool {
    crate::engine::is_json_file(path)
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

    let mut source_value: Value = serde_json::from_str(&source_text).map_err(|err| TransformError::Parse {
      path: source.to_path_buf(),
      reason: err.to_string(),
    })?;
    let transform_value: Value = serde_json::from_str(&transform_text).map_err(|err| TransformError::Parse {
      path: transform.to_path_buf(),
      reason: err.to_string(),
    })?;

    if let Err(err) = self.apply(&mut source_value, &transform_value) {
      self.logger.log_error(&format!("{}: {}", err.path, err.message));
      return Ok(TransformOutcome::Failed);
    }

    let mut output = serde_json::to_string_pretty(&source_value).map_err(|err| TransformError::Parse {
      path: destination.to_path_buf(),
      reason: err.to_string(),
    })?;
    output.push('\n');

    encoding::write_file(destination, &output, source_encoding)?;
    self
      .logger
      .log_message(MessageImportance::Normal, &format!("Wrote {}", destination.display()));
    Ok(TransformOutcome::Applied)
  }

  fn create_transform_file(&self, source: &Path, transform_to_create: &Path, overwrite: bool) -> ShiftResult<()> {
    if transform_to_create.exists() && !overwrite {
      return Ok(());
    }
    if !source.exists() {
      return Err(TransformError::SourceNotFound { path: source.to_path_buf() }.into());
    }

    // Read only to detect the encoding the skeleton must be written in
    let (_, source_encoding) = encoding::read_file(source)?;
    encoding::write_file(transform_to_create, JSON_TEMPLATE, source_encoding)?;
    Ok(())
  }
}
