//! Tests for the `create` command

use crate::helpers::*;
use anyhow::Result;

const XML_SOURCE: &str =
  "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration>\n  <appSettings>\n    <add key=\"a\" value=\"1\"/>\n  </appSettings>\n</configuration>\n";

#[test]
fn test_create_xml_skeletons_for_all_configurations() -> Result<()> {
  let project = TestProject::with_config(
    &["Debug", "Release"],
    &[("App.config", "out/{configuration}/App.config")],
  )?;
  project.write_file("App.config", XML_SOURCE)?;

  run_cfgshift(&project.path, &["create", "App.config"])?;

  for name in ["App.Debug.config", "App.Release.config"] {
    assert!(project.file_exists(name), "{} missing", name);
    let skeleton = project.read_file(name)?;
    assert!(skeleton.contains("xmlns:xdt=\"http://schemas.microsoft.com/XML-Document-Transform\""));
    assert!(!skeleton.contains("appSettings"));
  }
  Ok(())
}

#[test]
fn test_create_specific_configuration_without_config_file() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("appsettings.json", "{\"a\": 1}")?;

  run_cfgshift(&project.path, &["create", "appsettings.json", "--configuration", "Staging"])?;

  assert!(project.file_exists("appsettings.Staging.json"));
  assert_eq!(project.read_file("appsettings.Staging.json")?, "{\n}\n");
  Ok(())
}

#[test]
fn test_create_is_idempotent_without_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("settings.ini", "[a]\nkey=1\n")?;

  run_cfgshift(&project.path, &["create", "settings.ini", "--configuration", "Debug"])?;
  project.write_file("settings.Debug.ini", "[a]\nkey=edited\n")?;

  // Second run must not clobber the edited file
  run_cfgshift(&project.path, &["create", "settings.ini", "--configuration", "Debug"])?;
  assert_eq!(project.read_file("settings.Debug.ini")?, "[a]\nkey=edited\n");

  // --overwrite does
  run_cfgshift(&project.path, &["create", "settings.ini", "--configuration", "Debug", "--overwrite"])?;
  assert_eq!(project.read_file("settings.Debug.ini")?, "");
  Ok(())
}

#[test]
fn test_create_rejects_unsupported_files() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("notes.txt", "not a config file")?;

  let result = run_cfgshift(&project.path, &["create", "notes.txt", "--configuration", "Debug"]);
  assert!(result.is_err());
  Ok(())
}
