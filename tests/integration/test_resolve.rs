//! Tests for the `resolve` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_resolve_lists_transforms_with_configurations() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;
  project.write_file("App.Debug.config", "<configuration/>")?;
  project.write_file("app.release.config", "<configuration/>")?;
  project.write_file("App.Custom.config", "<configuration/>")?;
  project.write_file("Other.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["resolve", "App.config", "--json"])?;
  let resolved: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let entries = resolved.as_array().unwrap();

  // Other.config is not a transform; the three transform-named files are
  assert_eq!(entries.len(), 3);

  let by_name = |name: &str| {
    entries
      .iter()
      .find(|entry| entry["file_name"] == name)
      .unwrap_or_else(|| panic!("{} missing from output", name))
      .clone()
  };
  assert_eq!(by_name("App.Debug.config")["configuration"], "Debug");
  // Case-insensitive configuration match
  assert_eq!(by_name("app.release.config")["configuration"], "Release");
  // Generic transform with no matching configuration
  assert_eq!(by_name("App.Custom.config")["configuration"], serde_json::Value::Null);
  Ok(())
}

#[test]
fn test_resolve_without_config_lists_generic_matches() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("settings.ini", "[a]\nkey=1\n")?;
  project.write_file("settings.Production.ini", "[a]\nkey=2\n")?;

  let output = run_cfgshift(&project.path, &["resolve", "settings.ini"])?;
  assert!(stdout(&output).contains("settings.Production.ini"));
  Ok(())
}

#[test]
fn test_resolve_missing_file_fails() -> Result<()> {
  let project = TestProject::new()?;
  let result = run_cfgshift(&project.path, &["resolve", "gone.config"]);
  assert!(result.is_err());
  Ok(())
}
