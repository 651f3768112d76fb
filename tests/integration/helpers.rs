//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway project directory
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project directory
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Create a project with a cfgshift.toml for the given entries
  ///
  /// Each entry is (source, destination-pattern).
  pub fn with_config(configurations: &[&str], entries: &[(&str, &str)]) -> Result<Self> {
    let project = Self::new()?;

    let mut config = String::from("[project]\nconfigurations = [");
    config.push_str(
      &configurations
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", "),
    );
    config.push_str("]\n");
    for (source, destination) in entries {
      config.push_str(&format!(
        "\n[[transforms]]\nsource = \"{}\"\ndestination = \"{}\"\n",
        source, destination
      ));
    }
    project.write_file("cfgshift.toml", &config)?;
    Ok(project)
  }

  /// Write a file, creating parent directories
  pub fn write_file(&self, relative: &str, content: &str) -> Result<()> {
    let path = self.path.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, relative: &str) -> bool {
    self.path.join(relative).exists()
  }

  /// Read a file
  pub fn read_file(&self, relative: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(relative))?)
  }
}

/// Run the cfgshift CLI, erroring when it exits non-zero
pub fn run_cfgshift(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_cfgshift_unchecked(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cfgshift command failed: cfgshift {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the cfgshift CLI without checking the exit status
pub fn run_cfgshift_unchecked(cwd: &Path, args: &[&str]) -> Result<Output> {
  let cfgshift_bin = env!("CARGO_BIN_EXE_cfgshift");

  Command::new(cfgshift_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run cfgshift")
}

/// Stdout of an output, lossily decoded
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}
