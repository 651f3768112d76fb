//! `cfgshift doctor` - run health checks and diagnostics

use crate::checks::{CheckContext, Severity, create_default_runner};
use crate::core::context::ProjectContext;
use crate::core::error::{ShiftError, ShiftResult};

/// Run the doctor command
pub fn run_doctor(ctx: &ProjectContext, json: bool) -> ShiftResult<()> {
  let check_ctx = CheckContext {
    project_root: ctx.root.clone(),
    config: ctx.config.clone(),
  };

  let runner = create_default_runner();
  let results = runner.run_all(&check_ctx)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&results).map_err(anyhow::Error::from)?);
  } else {
    println!("🩺 cfgshift doctor");
    println!("════════════════════════════════════════");
    for result in &results {
      let marker = match (result.passed, result.severity) {
        (true, _) => "✅",
        (false, Severity::Warning) => "⚠️ ",
        (false, _) => "❌",
      };
      println!("{} {}: {}", marker, result.check_name, result.message);
      if let Some(suggestion) = &result.suggestion {
        println!("   💡 {}", suggestion);
      }
    }
  }

  let errors = results
    .iter()
    .filter(|result| !result.passed && result.severity == Severity::Error)
    .count();
  if errors > 0 {
    return Err(ShiftError::message(format!("{} check(s) failed", errors)));
  }
  Ok(())
}
