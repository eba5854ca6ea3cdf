//! Tests for build / release / snapshot: validation gates execution

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_failed_validation_never_starts_execution() -> Result<()> {
  let config = format!("{}\n[changelog]\nsort = \"sideways\"\n", MINIMAL_CONFIG);
  let project = TestProject::new(&config)?;

  for command in ["build", "snapshot"] {
    let output = appship(&project.path, &[command, "--skip-notarize"])?;

    assert_eq!(output.status.code(), Some(3), "{}", stderr(&output));
    assert!(stderr(&output).contains("changelog: unknown changelog sort 'sideways'"));
    assert!(!project.file_exists("dist"), "{} must not create the output directory", command);
  }
  Ok(())
}

#[test]
fn test_release_requires_tag() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;

  let output = appship(&project.path, &["release"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("is not tagged"));
  assert!(!project.file_exists("dist"));
  Ok(())
}

#[test]
fn test_build_failure_is_reported_with_step_name() -> Result<()> {
  // The empty Example.xcodeproj cannot build, with or without Xcode installed
  let project = TestProject::new(MINIMAL_CONFIG)?;

  let output = appship(&project.path, &["snapshot", "--skip-notarize"])?;

  assert!(!output.status.success());
  assert!(stderr(&output).contains("❌ build: "), "{}", stderr(&output));
  assert!(project.file_exists("dist"));
  Ok(())
}

#[test]
fn test_dist_with_leftovers_needs_clean() -> Result<()> {
  let project = TestProject::new(MINIMAL_CONFIG)?;
  std::fs::create_dir_all(project.path.join("dist"))?;
  std::fs::write(project.path.join("dist/old.zip"), "stale")?;

  let output = appship(&project.path, &["build"])?;
  assert!(stderr(&output).contains("dist: output directory"));
  assert!(project.file_exists("dist/old.zip"));

  let output = appship(&project.path, &["build", "--clean"])?;
  assert!(!stderr(&output).contains("dist: output directory"));
  assert!(!project.file_exists("dist/old.zip"));
  Ok(())
}
