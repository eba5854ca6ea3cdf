//! Tests for the `check` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_check_passes_minimal_config() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;

  let output = appship_ok(&project.path, &["check"])?;

  assert!(stdout(&output).contains("Example is ready to ship"));
  assert!(!project.file_exists("dist"));
  Ok(())
}

#[test]
fn test_check_reports_invalid_config() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;
  project.write_config(&MINIMAL_CONFIG.replace("[build]", "dist = \"../out\"\n\n[build]"))?;

  let output = appship(&project.path, &["check"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("project: dist '../out' must stay inside the project"));
  Ok(())
}

#[test]
fn test_check_reports_unresolved_placeholder() -> Result<()> {
  let config = format!(
    "{}\n[notarize]\napple_id = \"dev@example.com\"\nteam_id = \"ABCDE12345\"\npassword = \"${{APPSHIP_TEST_UNSET_PASSWORD}}\"\n",
    MINIMAL_CONFIG
  );
  let project = TestProject::new(&config)?;

  let output = appship(&project.path, &["check"])?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = stderr(&output);
  assert!(stderr.contains("env: unresolved environment variables in notarize.password"));
  assert!(stderr.contains("Export APPSHIP_TEST_UNSET_PASSWORD"));
  Ok(())
}

#[test]
fn test_check_without_config() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;
  std::fs::remove_file(project.path.join("appship.toml"))?;

  let output = appship(&project.path, &["check"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No appship configuration found"));
  Ok(())
}

#[test]
fn test_check_with_explicit_config_path() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;
  std::fs::remove_file(project.path.join("appship.toml"))?;
  std::fs::write(project.path.join("ship.toml"), MINIMAL_CONFIG)?;

  appship_ok(&project.path, &["check", "--config", "ship.toml"])?;
  Ok(())
}

#[test]
fn test_check_ignores_placeholders_in_disabled_sections() -> Result<()> {
  let config = format!(
    "{}\n[notarize]\napple_id = \"dev@example.com\"\nteam_id = \"ABCDE12345\"\npassword = \"${{APPSHIP_TEST_UNSET_PASSWORD}}\"\n\n[release]\nowner = \"example\"\nname = \"example-app\"\ntoken = \"${{APPSHIP_TEST_UNSET_TOKEN}}\"\n",
    MINIMAL_CONFIG
  );
  let project = TestProject::new(&config)?;

  let output = appship_ok(&project.path, &["check", "--skip-notarize", "--skip-publish"])?;

  assert!(stdout(&output).contains("Example is ready to ship"));
  Ok(())
}
