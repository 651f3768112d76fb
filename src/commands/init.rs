//! `cfgshift init` - create a starter cfgshift.toml
//!
//! Scans the project tree for supported base files and existing transform
//! files. Configurations are seeded from the infixes of transforms that are
//! already on disk (so `App.Debug.config` next to `App.config` yields a
//! `Debug` configuration); without any, the conventional Debug/Release pair
//! is used. Every base file that already has at least one transform becomes
//! a `[[transforms]]` entry.

use crate::core::config::{ShiftConfig, TransformEntry};
use crate::core::error::{ShiftError, ShiftResult};
use crate::naming;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SCAN_EXTENSIONS: [&str; 4] = ["config", "xml", "json", "ini"];
const SKIP_DIRS: [&str; 4] = ["target", "out", "node_modules", "bin"];
const MAX_DEPTH: usize = 8;

/// Run the init command
pub fn run_init(project_root: &Path, force: bool) -> ShiftResult<()> {
  if ShiftConfig::exists(project_root) && !force {
    return Err(ShiftError::with_help(
      "cfgshift.toml already exists",
      "Pass --force to overwrite it",
    ));
  }

  let mut files = Vec::new();
  scan_directory(project_root, project_root, 0, &mut files)?;

  // Group files per directory so transforms are only matched against siblings
  let mut by_dir: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
  for relative in &files {
    let dir = relative.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    if let Some(name) = relative.file_name().map(|name| name.to_string_lossy().into_owned()) {
      by_dir.entry(dir).or_default().push(name);
    }
  }

  let mut configurations: Vec<String> = Vec::new();
  let mut entries = Vec::new();

  for (dir, names) in &by_dir {
    for name in names {
      let transforms: Vec<&String> = names
        .iter()
        .filter(|candidate| naming::is_generic_transform(name, candidate))
        .collect();
      if transforms.is_empty() {
        continue;
      }
      // `name` is a base file with at least one transform next to it
      for transform in &transforms {
        if let Some(infix) = naming::transform_infix(name, transform)
          && !configurations.iter().any(|known| known.eq_ignore_ascii_case(infix))
        {
          configurations.push(infix.to_string());
        }
      }
      entries.push(TransformEntry {
        name: None,
        source: dir.join(name),
        destination: format!("out/{{configuration}}/{}", name),
        configurations: None,
      });
    }
  }

  if configurations.is_empty() {
    configurations = vec!["Debug".to_string(), "Release".to_string()];
  }

  let mut config = ShiftConfig::new(configurations);
  config.transforms = entries;
  config.save(project_root)?;

  println!("✅ Created cfgshift.toml");
  println!("   Configurations: {}", config.project.configurations.join(", "));
  println!("   Transform entries: {}", config.transforms.len());
  if config.transforms.is_empty() {
    println!("   Add [[transforms]] entries for the files you want transformed");
  }
  Ok(())
}

/// Collect supported files, relative to the root
fn scan_directory(root: &Path, dir: &Path, depth: usize, files: &mut Vec<PathBuf>) -> ShiftResult<()> {
  if depth > MAX_DEPTH {
    return Ok(());
  }
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    let name = entry.file_name().to_string_lossy().into_owned();
    if name.starts_with('.') {
      continue;
    }
    if path.is_dir() {
      if !SKIP_DIRS.contains(&name.as_str()) {
        scan_directory(root, &path, depth + 1, files)?;
      }
      continue;
    }
    let supported = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| SCAN_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));
    if supported && let Ok(relative) = path.strip_prefix(root) {
      files.push(relative.to_path_buf());
    }
  }
  Ok(())
}
