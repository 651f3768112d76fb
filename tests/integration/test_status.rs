//! Tests for the `status` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_status_shows_transform_coverage() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;
  project.write_file("App.Debug.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["status"])?;
  let text = stdout(&output);
  assert!(text.contains("App.config"));
  assert!(text.contains("Debug"));
  assert!(text.contains("Release"));
  assert!(text.contains("no transform file"));
  Ok(())
}

#[test]
fn test_status_json_output() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;
  project.write_file("App.Debug.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["status", "--json"])?;
  let statuses: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let entry = &statuses.as_array().unwrap()[0];
  assert_eq!(entry["name"], "App.config");
  assert_eq!(entry["source_exists"], true);

  let configurations = entry["configurations"].as_array().unwrap();
  assert_eq!(configurations.len(), 2);
  assert_eq!(configurations[0]["configuration"], "Debug");
  assert_eq!(configurations[0]["transform_exists"], true);
  assert_eq!(configurations[1]["configuration"], "Release");
  assert_eq!(configurations[1]["transform_exists"], false);
  Ok(())
}

#[test]
fn test_status_requires_config() -> Result<()> {
  let project = TestProject::new()?;
  let result = run_cfgshift(&project.path, &["status"]);
  assert!(result.is_err());
  Ok(())
}
