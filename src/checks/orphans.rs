//! Orphan transform check: transform-named files matching no configuration
//!
//! A file like `App.Prodcution.config` sitting next to `App.config` is almost
//! certainly a misspelled transform: it matches the generic naming convention
//! but none of the configured build configurations, so nothing will ever
//! apply it.

use crate::checks::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShiftResult;
use crate::naming;
use std::fs;

pub struct OrphanTransformsCheck;

impl Check for OrphanTransformsCheck {
  fn name(&self) -> &str {
    "orphan-transforms"
  }

  fn description(&self) -> &str {
    "Finds transform-named files that match no configured build configuration"
  }

  fn run(&self, ctx: &CheckContext) -> ShiftResult<Vec<CheckResult>> {
    let Some(config) = &ctx.config else {
      return Ok(vec![CheckResult::pass(self.name(), "skipped: no valid cfgshift.toml")]);
    };
    if config.transforms.is_empty() {
      return Ok(vec![CheckResult::pass(self.name(), "no transform entries configured")]);
    }

    let mut results = Vec::new();
    for entry in &config.transforms {
      let source = ctx.project_root.join(&entry.source);
      let Some(source_name) = source.file_name().map(|name| name.to_string_lossy().into_owned()) else {
        continue;
      };
      let Some(parent) = source.parent() else {
        continue;
      };
      if !parent.is_dir() {
        continue;
      }

      let configurations = config.configurations_for(entry);
      for dir_entry in fs::read_dir(parent)? {
        let candidate = dir_entry?.file_name().to_string_lossy().into_owned();
        if naming::is_generic_transform(&source_name, &candidate)
          && !naming::is_transform_for_configuration(&source_name, &candidate, configurations)
        {
          results.push(CheckResult::warning(
            self.name(),
            format!("{} looks like a transform of {} but matches no configuration", candidate, source_name),
            Some("Rename the file to <name>.<configuration>.<ext> or add the configuration to cfgshift.toml"),
          ));
        }
      }
    }

    if results.is_empty() {
      results.push(CheckResult::pass(self.name(), "no orphan transform files found"));
    }
    Ok(results)
  }
}
