//! Format support check: every base file classifies as a transformable format

use crate::checks::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShiftResult;
use crate::engine::{self, TransformerKind};

pub struct FormatsSupportedCheck;

impl Check for FormatsSupportedCheck {
  fn name(&self) -> &str {
    "formats-supported"
  }

  fn description(&self) -> &str {
    "Checks that every configured source is well-formed XML, JSON or INI"
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
      if !source.exists() {
        // sources-exist reports the missing file; nothing to classify here
        continue;
      }
      match engine::classify_file(&source)? {
        TransformerKind::Unsupported => results.push(CheckResult::error(
          self.name(),
          format!("{} is neither well-formed XML, nor .json, nor .ini", entry.source.display()),
          None::<String>,
        )),
        kind => results.push(CheckResult::pass(
          self.name(),
          format!("{} handled by the {} transformer", entry.source.display(), kind),
        )),
      }
    }

    if results.is_empty() {
      results.push(CheckResult::pass(self.name(), "no sources on disk to classify"));
    }
    Ok(results)
  }
}
