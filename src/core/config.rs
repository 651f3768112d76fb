#![allow(dead_code)]

use crate::core::error::{ConfigError, ShiftResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for cfgshift
/// Searched in order: cfgshift.toml, .cfgshift.toml, .config/cfgshift.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub transforms: Vec<TransformEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Build configurations transforms are generated for (e.g. Debug, Release)
  pub configurations: Vec<String>,
}

/// One base file and where its transformed outputs go
///
/// # Example
///
/// ```toml
/// [[transforms]]
/// source = "config/App.config"
/// destination = "out/{configuration}/App.config"
/// # optional per-entry override of [project].configurations
/// configurations = ["Debug"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformEntry {
  /// Optional display name; defaults to the source file name
  #[serde(default)]
  pub name: Option<String>,

  /// Base file, relative to the project root
  pub source: PathBuf,

  /// Destination pattern; `{configuration}` is substituted per configuration
  pub destination: String,

  /// Configurations for this entry only (default: the project list)
  #[serde(default)]
  pub configurations: Option<Vec<String>>,
}

impl TransformEntry {
  /// Display name for messages and for `cfgshift apply <name>`
  pub fn display_name(&self) -> String {
    match &self.name {
      Some(name) => name.clone(),
      None => self
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| self.source.display().to_string()),
    }
  }

  /// Destination path for a configuration, relative to the project root
  pub fn destination_for(&self, configuration: &str) -> PathBuf {
    PathBuf::from(self.destination.replace("{configuration}", configuration))
  }

  /// Expected transform file path for a configuration, next to the source
  pub fn transform_path_for(&self, configuration: &str) -> PathBuf {
    let file_name = self
      .source
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    let transform_name = crate::naming::transform_name_for(&file_name, configuration);
    match self.source.parent() {
      Some(parent) => parent.join(transform_name),
      None => PathBuf::from(transform_name),
    }
  }
}

fn has_case_insensitive_duplicates(names: &[String]) -> Option<&str> {
  for (index, name) in names.iter().enumerate() {
    if names[..index].iter().any(|previous| previous.eq_ignore_ascii_case(name)) {
      return Some(name);
    }
  }
  None
}

impl ShiftConfig {
  /// Create a new config with the given configuration set
  pub fn new(configurations: Vec<String>) -> Self {
    Self {
      project: ProjectConfig { configurations },
      transforms: Vec::new(),
    }
  }

  /// Configurations for an entry: its own list, or the project list
  pub fn configurations_for<'a>(&'a self, entry: &'a TransformEntry) -> &'a [String] {
    match &entry.configurations {
      Some(list) => list,
      None => &self.project.configurations,
    }
  }

  /// Find config file in search order: cfgshift.toml, .cfgshift.toml, .config/cfgshift.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("cfgshift.toml"),
      path.join(".cfgshift.toml"),
      path.join(".config").join("cfgshift.toml"),
    ];

    candidates.into_iter().find(|candidate| candidate.exists())
  }

  /// Load config (searches multiple locations under `path`)
  pub fn load(path: &Path) -> ShiftResult<Self> {
    let config_path =
      Self::find_config_path(path).ok_or_else(|| ConfigError::NotFound { root: path.to_path_buf() })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShiftConfig = toml_edit::de::from_str(&content).map_err(|err| ConfigError::Parse {
      path: config_path.clone(),
      reason: err.to_string(),
    })?;

    config.validate(&config_path)?;
    Ok(config)
  }

  /// Save config to cfgshift.toml (default location)
  pub fn save(&self, path: &Path) -> ShiftResult<()> {
    let config_path = path.join("cfgshift.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content)
      .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Validate semantic constraints the schema cannot express
  pub fn validate(&self, config_path: &Path) -> ShiftResult<()> {
    let invalid = |reason: String| ConfigError::Invalid {
      path: config_path.to_path_buf(),
      reason,
    };

    if self.project.configurations.is_empty() {
      return Err(invalid("[project].configurations must not be empty".to_string()).into());
    }
    if let Some(duplicate) = has_case_insensitive_duplicates(&self.project.configurations) {
      return Err(invalid(format!("duplicate configuration '{}' (names are case-insensitive)", duplicate)).into());
    }

    for entry in &self.transforms {
      let name = entry.display_name();
      if entry.source.as_os_str().is_empty() {
        return Err(invalid(format!("transform '{}' has an empty source", name)).into());
      }
      if entry.source.is_absolute() {
        return Err(invalid(format!("transform '{}': source must be relative to the project root", name)).into());
      }
      if !entry.destination.contains("{configuration}") {
        return Err(
          invalid(format!(
            "transform '{}': destination must contain the {{configuration}} placeholder, or outputs would overwrite each other",
            name
          ))
          .into(),
        );
      }
      if let Some(list) = &entry.configurations {
        if list.is_empty() {
          return Err(invalid(format!("transform '{}': configurations override must not be empty", name)).into());
        }
        if let Some(duplicate) = has_case_insensitive_duplicates(list) {
          return Err(invalid(format!("transform '{}': duplicate configuration '{}'", name, duplicate)).into());
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> ShiftConfig {
    ShiftConfig {
      project: ProjectConfig {
        configurations: vec!["Debug".to_string(), "Release".to_string()],
      },
      transforms: vec![TransformEntry {
        name: None,
        source: PathBuf::from("config/App.config"),
        destination: "out/{configuration}/App.config".to_string(),
        configurations: None,
      }],
    }
  }

  #[test]
  fn round_trips_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let config = sample();
    config.save(dir.path()).unwrap();

    let loaded = ShiftConfig::load(dir.path()).unwrap();
    assert_eq!(loaded.project.configurations, vec!["Debug", "Release"]);
    assert_eq!(loaded.transforms.len(), 1);
    assert_eq!(loaded.transforms[0].source, PathBuf::from("config/App.config"));
  }

  #[test]
  fn missing_config_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
      ShiftConfig::load(dir.path()),
      Err(crate::core::error::ShiftError::Config(ConfigError::NotFound { .. }))
    ));
  }

  #[test]
  fn rejects_duplicate_configurations() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = sample();
    config.project.configurations.push("debug".to_string());
    assert!(config.validate(&dir.path().join("cfgshift.toml")).is_err());
  }

  #[test]
  fn rejects_destination_without_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = sample();
    config.transforms[0].destination = "out/App.config".to_string();
    assert!(config.validate(&dir.path().join("cfgshift.toml")).is_err());
  }

  #[test]
  fn entry_path_helpers() {
    let entry = sample().transforms.remove(0);
    assert_eq!(entry.destination_for("Debug"), PathBuf::from("out/Debug/App.config"));
    assert_eq!(entry.transform_path_for("Debug"), PathBuf::from("config/App.Debug.config"));
    assert_eq!(entry.display_name(), "App.config");
  }

  #[test]
  fn per_entry_configurations_override() {
    let mut config = sample();
    config.transforms[0].configurations = Some(vec!["Staging".to_string()]);
    let entry = config.transforms[0].clone();
    assert_eq!(config.configurations_for(&entry), ["Staging"]);
  }
}
