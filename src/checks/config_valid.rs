//! Config validity check: cfgshift.toml present, parseable and valid

use crate::checks::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ShiftConfig;
use crate::core::error::ShiftResult;

pub struct ConfigValidCheck;

impl Check for ConfigValidCheck {
  fn name(&self) -> &str {
    "config-validity"
  }

  fn description(&self) -> &str {
    "Validates that cfgshift.toml exists, parses, and is semantically valid"
  }

  fn run(&self, ctx: &CheckContext) -> ShiftResult<Vec<CheckResult>> {
    if !ShiftConfig::exists(&ctx.project_root) {
      return Ok(vec![CheckResult::error(
        self.name(),
        "no cfgshift.toml found",
        Some("Run 'cfgshift init' to create one"),
      )]);
    }

    // Re-load rather than trusting the context: doctor must be able to
    // diagnose a config the context loader refused
    match ShiftConfig::load(&ctx.project_root) {
      Ok(config) => Ok(vec![CheckResult::pass(
        self.name(),
        format!(
          "cfgshift.toml valid: {} configuration(s), {} transform entr{}",
          config.project.configurations.len(),
          config.transforms.len(),
          if config.transforms.len() == 1 { "y" } else { "ies" }
        ),
      )]),
      Err(err) => Ok(vec![CheckResult::error(self.name(), err.to_string(), err.help())]),
    }
  }
}
