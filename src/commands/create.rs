//! `cfgshift create` - generate skeleton transform files
//!
//! Writes a minimal transform document next to the source for each requested
//! configuration, in the format matching the source file. Existing files are
//! left untouched unless --overwrite is passed.

use crate::core::context::ProjectContext;
use crate::core::error::{ResultExt, ShiftError, ShiftResult};
use crate::engine;
use crate::logging::ConsoleLogger;
use crate::naming;
use std::path::Path;

/// Run the create command
pub fn run_create(
  ctx: &ProjectContext,
  source: &Path,
  configurations: Vec<String>,
  overwrite: bool,
) -> ShiftResult<()> {
  let absolute = if source.is_absolute() { source.to_path_buf() } else { ctx.root.join(source) };
  let Some(source_name) = absolute.file_name().map(|name| name.to_string_lossy().into_owned()) else {
    return Err(ShiftError::message(format!("{} has no file name", source.display())));
  };

  // Explicit --configuration list, or everything cfgshift.toml declares
  let configurations = if configurations.is_empty() {
    ctx
      .require_config()
      .help("Pass --configuration <name>, or run 'cfgshift init' first")?
      .project
      .configurations
      .clone()
  } else {
    configurations
  };

  let logger = ConsoleLogger::new(false);
  let transformer = engine::get_transformer(&absolute, &logger, false)?;

  for configuration in &configurations {
    let transform_name = naming::transform_name_for(&source_name, configuration);
    let target = match absolute.parent() {
      Some(parent) => parent.join(&transform_name),
      None => std::path::PathBuf::from(&transform_name),
    };
    let existed = target.exists();
    transformer.create_transform_file(&absolute, &target, overwrite)?;
    if existed && !overwrite {
      println!("⏭️  {} already exists, skipped", transform_name);
    } else {
      println!("✅ Created {}", transform_name);
    }
  }
  Ok(())
}
