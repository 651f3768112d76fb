//! Unified project context - build once, pass everywhere
//!
//! ProjectContext is built a single time in main.rs and passed by reference
//! to all commands, so the config file is located, parsed and validated
//! exactly once per invocation. Config is optional at build time because
//! some commands (init, the explicit apply form) run before or without a
//! cfgshift.toml; commands that need it call `require_config`.

use crate::core::config::ShiftConfig;
use crate::core::error::{ConfigError, ShiftResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared project-level state for all commands
#[derive(Clone)]
pub struct ProjectContext {
  /// Project root directory (where cfgshift.toml is searched)
  pub root: PathBuf,

  /// Parsed configuration, when one exists
  /// Wrapped in Arc for cheap sharing with rayon workers
  pub config: Option<Arc<ShiftConfig>>,
}

impl ProjectContext {
  /// Build the context from a project root
  ///
  /// A missing config file is not an error here; an invalid one is.
  pub fn build(root: &Path) -> ShiftResult<Self> {
    let config = if ShiftConfig::exists(root) {
      Some(Arc::new(ShiftConfig::load(root)?))
    } else {
      None
    };

    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Get config or error if not found
  pub fn require_config(&self) -> ShiftResult<&Arc<ShiftConfig>> {
    self
      .config
      .as_ref()
      .ok_or_else(|| ConfigError::NotFound { root: self.root.clone() }.into())
  }

  /// Project root as a Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }
}
