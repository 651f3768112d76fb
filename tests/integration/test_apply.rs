//! Tests for the `apply` command

use crate::helpers::*;
use anyhow::Result;

const SOURCE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n  <appSettings>\n    <add key=\"setting01\" value=\"default01\"/>\n    <add key=\"setting02\" value=\"default02\"/>\n  </appSettings>\n</configuration>\n";

const DEBUG_TRANSFORM: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration xmlns:xdt=\"http://schemas.microsoft.com/XML-Document-Transform\">\n  <appSettings>\n    <add key=\"setting01\" value=\"debug01\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"/>\n    <add key=\"setting02\" value=\"debug02\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"/>\n  </appSettings>\n</configuration>\n";

const EXPECTED_DEBUG: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n  <appSettings>\n    <add key=\"setting01\" value=\"debug01\"/>\n    <add key=\"setting02\" value=\"debug02\"/>\n  </appSettings>\n</configuration>\n";

#[test]
fn test_explicit_apply_round_trip() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("App.config", SOURCE)?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;

  run_cfgshift(
    &project.path,
    &[
      "apply",
      "--source",
      "App.config",
      "--transform",
      "App.Debug.config",
      "--destination",
      "App.out.config",
    ],
  )?;

  assert_eq!(project.read_file("App.out.config")?.trim(), EXPECTED_DEBUG.trim());
  Ok(())
}

#[test]
fn test_explicit_apply_missing_source_fails_without_touching_destination() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;

  let result = run_cfgshift(
    &project.path,
    &[
      "apply",
      "--source",
      "App.config",
      "--transform",
      "App.Debug.config",
      "--destination",
      "App.out.config",
    ],
  );

  assert!(result.is_err());
  assert!(!project.file_exists("App.out.config"));
  Ok(())
}

#[test]
fn test_explicit_apply_missing_transform_fails_without_touching_destination() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("App.config", SOURCE)?;

  let result = run_cfgshift(
    &project.path,
    &[
      "apply",
      "--source",
      "App.config",
      "--transform",
      "App.Debug.config",
      "--destination",
      "App.out.config",
    ],
  );

  assert!(result.is_err());
  assert!(!project.file_exists("App.out.config"));
  Ok(())
}

#[test]
fn test_configured_apply_single_configuration() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", SOURCE)?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;

  run_cfgshift(&project.path, &["apply", "--configuration", "Debug"])?;

  assert_eq!(project.read_file("out/Debug/App.config")?.trim(), EXPECTED_DEBUG.trim());
  assert!(!project.file_exists("out/Release/App.config"));
  Ok(())
}

#[test]
fn test_configured_apply_all_skips_missing_transforms() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", SOURCE)?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;
  // No Release transform: skipped, not failed

  let output = run_cfgshift(&project.path, &["apply", "--all"])?;
  let text = stdout(&output);
  assert!(text.contains("1 applied, 1 skipped, 0 failed"));
  assert!(project.file_exists("out/Debug/App.config"));
  assert!(!project.file_exists("out/Release/App.config"));
  Ok(())
}

#[test]
fn test_configured_apply_mixed_formats() -> Result<()> {
  let project = TestProject::with_config(
    &["Production"],
    &[
      ("App.config", "out/{configuration}/App.config"),
      ("appsettings.json", "out/{configuration}/appsettings.json"),
      ("settings.ini", "out/{configuration}/settings.ini"),
    ],
  )?;
  project.write_file("App.config", SOURCE)?;
  project.write_file(
    "App.Production.config",
    "<configuration xmlns:xdt=\"http://schemas.microsoft.com/XML-Document-Transform\">\n  <appSettings>\n    <add key=\"setting01\" value=\"prod01\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"/>\n  </appSettings>\n</configuration>",
  )?;
  project.write_file("appsettings.json", "{\"level\": \"info\"}")?;
  project.write_file("appsettings.Production.json", "{\"level\": \"error\"}")?;
  project.write_file("settings.ini", "[server]\nhost=localhost\n")?;
  project.write_file("settings.Production.ini", "[server]\nhost=prod.example.com\n")?;

  run_cfgshift(&project.path, &["apply", "--configuration", "Production"])?;

  assert!(project.read_file("out/Production/App.config")?.contains("prod01"));
  assert!(project.read_file("out/Production/appsettings.json")?.contains("error"));
  assert!(project.read_file("out/Production/settings.ini")?.contains("prod.example.com"));
  Ok(())
}

#[test]
fn test_configured_apply_unknown_configuration_fails() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", SOURCE)?;

  let result = run_cfgshift(&project.path, &["apply", "--configuration", "Prod"]);
  assert!(result.is_err());
  Ok(())
}

#[test]
fn test_configured_apply_failed_transform_exits_nonzero() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", SOURCE)?;
  // Locator matches nothing: engine failure
  project.write_file(
    "App.Debug.config",
    "<configuration xmlns:xdt=\"http://schemas.microsoft.com/XML-Document-Transform\">\n  <appSettings>\n    <add key=\"missing\" value=\"x\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"/>\n  </appSettings>\n</configuration>",
  )?;

  let output = run_cfgshift_unchecked(&project.path, &["apply", "--configuration", "Debug"])?;
  assert!(!output.status.success());
  assert!(!project.file_exists("out/Debug/App.config"));
  Ok(())
}

#[test]
fn test_apply_report_is_written() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", SOURCE)?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;

  run_cfgshift(
    &project.path,
    &["apply", "--configuration", "Debug", "--report", "report.json"],
  )?;

  let report: serde_json::Value = serde_json::from_str(&project.read_file("report.json")?)?;
  assert!(report["started_at"].is_string());
  let results = report["results"].as_array().unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0]["status"], "applied");
  assert_eq!(results[0]["configuration"], "Debug");
  Ok(())
}

#[test]
fn test_apply_by_entry_name() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug"],
    &[
      ("App.config", "out/{configuration}/App.config"),
      ("appsettings.json", "out/{configuration}/appsettings.json"),
    ],
  )?;
  project.write_file("App.config", SOURCE)?;
  project.write_file("App.Debug.config", DEBUG_TRANSFORM)?;
  project.write_file("appsettings.json", "{}")?;
  project.write_file("appsettings.Debug.json", "{\"a\": 1}")?;

  run_cfgshift(&project.path, &["apply", "App.config", "--configuration", "Debug"])?;

  assert!(project.file_exists("out/Debug/App.config"));
  assert!(!project.file_exists("out/Debug/appsettings.json"));
  Ok(())
}

#[test]
fn test_one_shot_flags_must_come_together() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("App.config", SOURCE)?;

  let result = run_cfgshift(&project.path, &["apply", "--source", "App.config"]);
  assert!(result.is_err());
  Ok(())
}
