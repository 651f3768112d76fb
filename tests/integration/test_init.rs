//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("App.config", "<configuration/>")?;

  run_cfgshift(&project.path, &["init"])?;

  assert!(project.file_exists("cfgshift.toml"));
  let config = project.read_file("cfgshift.toml")?;
  assert!(config.contains("[project]"));
  // No transforms on disk: the conventional defaults are seeded
  assert!(config.contains("Debug"));
  assert!(config.contains("Release"));
  Ok(())
}

#[test]
fn test_init_seeds_configurations_from_existing_transforms() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("config/App.config", "<configuration/>")?;
  project.write_file("config/App.Staging.config", "<configuration/>")?;
  project.write_file("config/App.Production.config", "<configuration/>")?;

  run_cfgshift(&project.path, &["init"])?;

  let config = project.read_file("cfgshift.toml")?;
  assert!(config.contains("Staging"));
  assert!(config.contains("Production"));
  assert!(config.contains("[[transforms]]"));
  assert!(config.contains("config/App.config"));
  // The transform files themselves are not entries
  assert!(!config.contains("source = \"config/App.Staging.config\""));
  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite_without_force() -> Result<()> {
  let project = TestProject::new()?;
  run_cfgshift(&project.path, &["init"])?;

  let result = run_cfgshift(&project.path, &["init"]);
  assert!(result.is_err());

  run_cfgshift(&project.path, &["init", "--force"])?;
  Ok(())
}
