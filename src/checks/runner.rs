//! Check runner: executes registered checks in order

use crate::checks::config_valid::ConfigValidCheck;
use crate::checks::formats::FormatsSupportedCheck;
use crate::checks::orphans::OrphanTransformsCheck;
use crate::checks::sources::SourcesExistCheck;
use crate::checks::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShiftResult;

/// Runs a fixed set of checks against a project
pub struct CheckRunner {
  checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
  pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
    Self { checks }
  }

  /// Run every registered check, collecting all results
  pub fn run_all(&self, ctx: &CheckContext) -> ShiftResult<Vec<CheckResult>> {
    let mut results = Vec::new();
    for check in &self.checks {
      results.extend(check.run(ctx)?);
    }
    Ok(results)
  }
}

/// Runner with all built-in checks registered
pub fn create_default_runner() -> CheckRunner {
  CheckRunner::new(vec![
    Box::new(ConfigValidCheck),
    Box::new(SourcesExistCheck),
    Box::new(FormatsSupportedCheck),
    Box::new(OrphanTransformsCheck),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{ProjectConfig, ShiftConfig, TransformEntry};
  use std::fs;
  use std::path::PathBuf;
  use std::sync::Arc;

  fn context_with(dir: &tempfile::TempDir, config: ShiftConfig) -> CheckContext {
    config.save(dir.path()).unwrap();
    CheckContext {
      project_root: dir.path().to_path_buf(),
      config: Some(Arc::new(config)),
    }
  }

  fn sample_config() -> ShiftConfig {
    ShiftConfig {
      project: ProjectConfig {
        configurations: vec!["Debug".to_string(), "Release".to_string()],
      },
      transforms: vec![TransformEntry {
        name: None,
        source: PathBuf::from("App.config"),
        destination: "out/{configuration}/App.config".to_string(),
        configurations: None,
      }],
    }
  }

  #[test]
  fn healthy_project_passes_every_check() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("App.config"), "<configuration/>").unwrap();
    let ctx = context_with(&dir, sample_config());

    let results = create_default_runner().run_all(&ctx).unwrap();
    assert!(results.iter().all(|result| result.passed), "{:?}", results);
  }

  #[test]
  fn missing_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context_with(&dir, sample_config());

    let results = create_default_runner().run_all(&ctx).unwrap();
    let failed: Vec<_> = results.iter().filter(|result| !result.passed).collect();
    assert!(failed.iter().any(|result| result.check_name == "sources-exist"));
  }

  #[test]
  fn misnamed_transform_is_flagged_as_orphan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("App.config"), "<configuration/>").unwrap();
    fs::write(dir.path().join("App.Debug.config"), "<configuration/>").unwrap();
    fs::write(dir.path().join("App.Prodcution.config"), "<configuration/>").unwrap();
    let ctx = context_with(&dir, sample_config());

    let results = create_default_runner().run_all(&ctx).unwrap();
    let orphaned: Vec<_> = results
      .iter()
      .filter(|result| result.check_name == "orphan-transforms" && !result.passed)
      .collect();
    assert_eq!(orphaned.len(), 1);
    assert!(orphaned[0].message.contains("App.Prodcution.config"));
  }

  #[test]
  fn missing_config_fails_only_config_check() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CheckContext {
      project_root: dir.path().to_path_buf(),
      config: None,
    };

    let results = create_default_runner().run_all(&ctx).unwrap();
    let failed: Vec<_> = results.iter().filter(|result| !result.passed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].check_name, "config-validity");
  }
}
