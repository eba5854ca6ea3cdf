//! Tests for the `changelog` command

use crate::helpers::*;
use anyhow::Result;

fn project_with_history(config: &str) -> Result<TestProject> {
  let project = TestProject::new(config)?;
  project.tag("v1.0.0")?;
  project.commit("feat: add PDF export")?;
  project.commit("docs: update readme")?;
  project.commit("fix: crash on launch")?;
  Ok(project)
}

#[test]
fn test_changelog_on_tagged_head() -> Result<()> {
  let config = format!("{}\n[changelog]\nfilters = {{ exclude = [\"^docs:\"] }}\n", MINIMAL_CONFIG);
  let project = project_with_history(&config)?;
  project.tag("v1.1.0")?;

  let output = appship_ok(&project.path, &["changelog"])?;

  assert_eq!(
    stdout(&output),
    "## 1.1.0\n\n- fix: crash on launch\n- feat: add PDF export\n"
  );
  Ok(())
}

#[test]
fn test_changelog_untagged_uses_snapshot_version() -> Result<()> {
  let config = format!("{}\n[changelog]\nsort = \"asc\"\n", MINIMAL_CONFIG);
  let project = project_with_history(&config)?;

  let output = appship_ok(&project.path, &["changelog"])?;
  let notes = stdout(&output);

  assert!(notes.starts_with("## 1.0.1-SNAPSHOT-"), "{}", notes);
  assert!(notes.ends_with("\n\n- feat: add PDF export\n- docs: update readme\n- fix: crash on launch\n"));
  Ok(())
}

#[test]
fn test_changelog_groups() -> Result<()> {
  let config = format!(
    r#"{}
[[changelog.groups]]
title = "Other"
order = 99

[[changelog.groups]]
title = "Features"
regexp = "^feat"
order = 0

[[changelog.groups]]
title = "Fixes"
regexp = "^fix"
order = 1
"#,
    MINIMAL_CONFIG
  );
  let project = project_with_history(&config)?;
  project.tag("v1.1.0")?;

  let output = appship_ok(&project.path, &["changelog"])?;

  assert_eq!(
    stdout(&output),
    "## 1.1.0\n\n### Features\n\n- feat: add PDF export\n\n### Fixes\n\n- fix: crash on launch\n\n### Other\n\n- docs: update readme\n"
  );
  Ok(())
}

#[test]
fn test_changelog_invalid_pattern() -> Result<()> {
  let config = format!("{}\n[changelog]\nfilters = {{ include = [\"feat(\"] }}\n", MINIMAL_CONFIG);
  let project = project_with_history(&config)?;

  let output = appship(&project.path, &["changelog"])?;

  assert!(!output.status.success());
  assert!(stderr(&output).contains("invalid changelog pattern 'feat(' in include[0]"));
  Ok(())
}
