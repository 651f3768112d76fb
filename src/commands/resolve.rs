//! `cfgshift resolve` - list the transform files of a base document
//!
//! Scans the base file's directory for siblings that match the transform
//! naming convention, and reports which configuration each one targets (when
//! a cfgshift.toml provides the configuration set).

use crate::core::context::ProjectContext;
use crate::core::error::{ShiftError, ShiftResult};
use crate::engine;
use crate::naming;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One resolved transform candidate
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTransform {
  pub file_name: String,
  /// Configured configuration the infix matches, if any
  pub configuration: Option<String>,
}

/// Run the resolve command
pub fn run_resolve(ctx: &ProjectContext, file: &Path, json: bool) -> ShiftResult<()> {
  let absolute = if file.is_absolute() { file.to_path_buf() } else { ctx.project_root().join(file) };
  if !absolute.exists() {
    return Err(ShiftError::message(format!("{} does not exist", file.display())));
  }
  if !engine::is_supported_file(&absolute)? {
    return Err(ShiftError::message(format!(
      "{} is neither well-formed XML, nor .json, nor .ini; its transforms could never apply",
      file.display()
    )));
  }
  let Some(base_name) = absolute.file_name().map(|name| name.to_string_lossy().into_owned()) else {
    return Err(ShiftError::message(format!("{} has no file name", file.display())));
  };
  let Some(parent) = absolute.parent() else {
    return Err(ShiftError::message(format!("{} has no parent directory", file.display())));
  };

  let configurations: Vec<String> = match &ctx.config {
    Some(config) => config.project.configurations.clone(),
    None => Vec::new(),
  };

  let mut resolved = Vec::new();
  for entry in fs::read_dir(parent)? {
    let candidate = entry?.file_name().to_string_lossy().into_owned();
    if !naming::is_generic_transform(&base_name, &candidate) {
      continue;
    }
    let configuration = configurations
      .iter()
      .find(|configuration| {
        naming::is_transform_for_configuration(&base_name, &candidate, std::slice::from_ref(*configuration))
      })
      .cloned();
    resolved.push(ResolvedTransform {
      file_name: candidate,
      configuration,
    });
  }
  resolved.sort_by(|a, b| a.file_name.cmp(&b.file_name));

  if json {
    println!("{}", serde_json::to_string_pretty(&resolved).map_err(anyhow::Error::from)?);
    return Ok(());
  }

  if resolved.is_empty() {
    println!("No transform files found for {}", base_name);
    return Ok(());
  }

  println!("Transforms of {}:", base_name);
  for transform in &resolved {
    match &transform.configuration {
      Some(configuration) => println!("  ✅ {} (configuration: {})", transform.file_name, configuration),
      None if configurations.is_empty() => println!("  • {}", transform.file_name),
      None => println!("  ⚠️  {} (matches no configured configuration)", transform.file_name),
    }
  }
  Ok(())
}
