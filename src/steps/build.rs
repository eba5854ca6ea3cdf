//! `xcodebuild` with the release version stamped into the bundle

use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::ShipError;
use crate::core::process::ToolCommand;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::path::Path;

pub struct BuildStep;

impl BuildStep {
  fn command(state: &RunState, derived_data: &Path) -> ToolCommand {
    let build = &state.config().build;
    let mut cmd = ToolCommand::new("xcodebuild");

    if let Some(project) = &build.project {
      cmd = cmd.arg("-project").path_arg(&state.resolve_path(project));
    } else if let Some(workspace) = &build.workspace {
      cmd = cmd.arg("-workspace").path_arg(&state.resolve_path(workspace));
    }

    cmd
      .args(["-scheme", build.scheme.as_str()])
      .args(["-configuration", build.configuration.as_str()])
      .arg("-derivedDataPath")
      .path_arg(derived_data)
      .arg(format!("MARKETING_VERSION={}", state.version()))
      .arg(format!("CURRENT_PROJECT_VERSION={}", state.vcs().commit_count))
      .args(build.extra_args.iter().cloned())
      .arg("build")
      .current_dir(state.root())
  }
}

impl Step for BuildStep {
  fn name(&self) -> &str {
    "build"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::AppBundle]
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let derived_data = state.artifacts.require_output_dir()?.join("build");
    state.runner().run(&Self::command(state, &derived_data))?;

    let config = state.config();
    let app = derived_data
      .join("Build/Products")
      .join(&config.build.configuration)
      .join(format!("{}.app", config.app_name()));

    if !app.is_dir() {
      return Err(ShipError::with_help(
        format!("xcodebuild succeeded but {} was not produced", app.display()),
        "Set build.app_name when the product name differs from project_name",
      ));
    }

    tracing::info!("  built {}", app.display());
    state.artifacts.app_bundle = Some(app);
    Ok(StepOutcome::Done)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::context::Toggles;
  use crate::core::process::testing::RecordingRunner;
  use crate::pipeline::testing::{config, state_at};

  const TOML: &str = r#"
project_name = "Example"

[build]
project = "Example.xcodeproj"
scheme = "Example"
extra_args = ["-quiet"]
"#;

  #[test]
  fn test_build_stamps_version_and_finds_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let dist = dir.path().join("dist");
    std::fs::create_dir_all(dist.join("build/Build/Products/Release/Example.app")).unwrap();

    let (mut state, runner) = state_at(dir.path(), config(TOML), Toggles::default(), RecordingRunner::new());
    state.artifacts.output_dir = Some(dist.clone());

    BuildStep.execute(&mut state).unwrap();

    let expected = format!(
      "xcodebuild -project {} -scheme Example -configuration Release -derivedDataPath {} \
       MARKETING_VERSION=1.2.0 CURRENT_PROJECT_VERSION=42 -quiet build",
      dir.path().join("Example.xcodeproj").display(),
      dist.join("build").display()
    );
    assert_eq!(runner.rendered(), vec![expected]);
    assert_eq!(
      state.artifacts.app_bundle,
      Some(dist.join("build/Build/Products/Release/Example.app"))
    );
  }

  #[test]
  fn test_missing_bundle_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (mut state, _) = state_at(dir.path(), config(TOML), Toggles::default(), RecordingRunner::new());
    state.artifacts.output_dir = Some(dir.path().join("dist"));

    let err = BuildStep.execute(&mut state).unwrap_err();
    assert!(err.to_string().contains("was not produced"));
    assert!(state.artifacts.app_bundle.is_none());
  }

  #[test]
  fn test_xcodebuild_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::new().fail("xcodebuild", "** BUILD FAILED **");
    let (mut state, _) = state_at(dir.path(), config(TOML), Toggles::default(), runner);
    state.artifacts.output_dir = Some(dir.path().join("dist"));

    let err = BuildStep.execute(&mut state).unwrap_err();
    assert!(err.to_string().contains("** BUILD FAILED **"));
  }
}
