//! Source existence check: every configured base file is on disk

use crate::checks::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShiftResult;

pub struct SourcesExistCheck;

impl Check for SourcesExistCheck {
  fn name(&self) -> &str {
    "sources-exist"
  }

  fn description(&self) -> &str {
    "Checks that every configured transform source exists"
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
      if source.exists() {
        results.push(CheckResult::pass(self.name(), format!("{} exists", entry.source.display())));
      } else {
        results.push(CheckResult::error(
          self.name(),
          format!("source {} does not exist", entry.source.display()),
          Some("Fix the path in cfgshift.toml or restore the file"),
        ));
      }
    }
    Ok(results)
  }
}
