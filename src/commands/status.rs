//! `cfgshift status` - show transform coverage for configured entries
//!
//! For every `[[transforms]]` entry and every configuration, reports whether
//! the expected transform file exists and whether the destination has been
//! generated.

use crate::core::context::ProjectContext;
use crate::core::error::ShiftResult;
use serde::Serialize;
use std::path::PathBuf;

/// Per-configuration status of one entry
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationStatus {
  pub configuration: String,
  pub transform_file: PathBuf,
  pub transform_exists: bool,
  pub destination: PathBuf,
  pub destination_exists: bool,
}

/// Status of one `[[transforms]]` entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
  pub name: String,
  pub source: PathBuf,
  pub source_exists: bool,
  pub configurations: Vec<ConfigurationStatus>,
}

/// Run the status command
pub fn run_status(ctx: &ProjectContext, json: bool) -> ShiftResult<()> {
  let config = ctx.require_config()?;

  let mut statuses = Vec::new();
  for entry in &config.transforms {
    let mut configurations = Vec::new();
    for configuration in config.configurations_for(entry) {
      let transform_file = entry.transform_path_for(configuration);
      let destination = entry.destination_for(configuration);
      configurations.push(ConfigurationStatus {
        configuration: configuration.clone(),
        transform_exists: ctx.root.join(&transform_file).exists(),
        transform_file,
        destination_exists: ctx.root.join(&destination).exists(),
        destination,
      });
    }
    statuses.push(EntryStatus {
      name: entry.display_name(),
      source_exists: ctx.root.join(&entry.source).exists(),
      source: entry.source.clone(),
      configurations,
    });
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&statuses).map_err(anyhow::Error::from)?);
    return Ok(());
  }

  if statuses.is_empty() {
    println!("No transform entries configured");
    println!("Add [[transforms]] entries to cfgshift.toml");
    return Ok(());
  }

  for status in &statuses {
    let marker = if status.source_exists { "📄" } else { "❌" };
    println!("{} {} ({})", marker, status.name, status.source.display());
    if !status.source_exists {
      println!("   source file is missing");
    }
    for configuration in &status.configurations {
      let marker = if configuration.transform_exists { "✅" } else { "⚠️ " };
      let note = if configuration.transform_exists {
        if configuration.destination_exists { "transform present, output generated" } else { "transform present" }
      } else {
        "no transform file"
      };
      println!(
        "   {} {:<12} {} ({})",
        marker,
        configuration.configuration,
        configuration.transform_file.display(),
        note
      );
    }
  }
  Ok(())
}
