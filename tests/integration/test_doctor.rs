//! Tests for the `doctor` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_doctor_passes_on_healthy_project() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["doctor"])?;
  assert!(stdout(&output).contains("config-validity"));
  Ok(())
}

#[test]
fn test_doctor_fails_when_source_is_missing() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;

  let output = run_cfgshift_unchecked(&project.path, &["doctor"])?;
  assert!(!output.status.success());
  assert!(stdout(&output).contains("sources-exist"));
  Ok(())
}

#[test]
fn test_doctor_reports_missing_config() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_cfgshift_unchecked(&project.path, &["doctor"])?;
  assert!(!output.status.success());
  assert!(stdout(&output).contains("no cfgshift.toml"));
  Ok(())
}

#[test]
fn test_doctor_flags_orphan_transforms_as_warning_only() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;
  // Misspelled configuration: a warning, not a failure
  project.write_file("App.Prodcution.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["doctor"])?;
  assert!(stdout(&output).contains("App.Prodcution.config"));
  Ok(())
}

#[test]
fn test_doctor_json_output() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", "<configuration/>")?;

  let output = run_cfgshift(&project.path, &["doctor", "--json"])?;
  let results: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let names: Vec<&str> = results
    .as_array()
    .unwrap()
    .iter()
    .map(|result| result["check_name"].as_str().unwrap())
    .collect();
  assert!(names.contains(&"config-validity"));
  assert!(names.contains(&"sources-exist"));
  assert!(names.contains(&"formats-supported"));
  assert!(names.contains(&"orphan-transforms"));
  Ok(())
}
