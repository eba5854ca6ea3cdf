//! Project identity, output directory and Xcode build inputs

use super::required;
use crate::core::context::RunState;
use crate::core::error::ShipError;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::path::Component;

pub struct ProjectCheck;

impl Step for ProjectCheck {
  fn name(&self) -> &str {
    "project"
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let config = state.config();
    required("project_name", &config.project_name)?;

    let dist = &config.dist;
    if dist.as_os_str().is_empty() {
      return Err(ShipError::invalid("dist must not be empty", "Use a directory such as \"dist\""));
    }
    if dist.is_absolute() || dist.components().any(|c| c == Component::ParentDir) {
      return Err(ShipError::invalid(
        format!("dist '{}' must stay inside the project", dist.display()),
        "Use a relative path without '..'; the directory is wiped by --clean",
      ));
    }

    Ok(StepOutcome::Done)
  }
}

pub struct BuildCheck;

impl Step for BuildCheck {
  fn name(&self) -> &str {
    "build"
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let build = &state.config().build;

    let input = match (&build.project, &build.workspace) {
      (Some(project), None) => project,
      (None, Some(workspace)) => workspace,
      (Some(_), Some(_)) => {
        return Err(ShipError::invalid(
          "build.project and build.workspace are mutually exclusive",
          "Keep build.workspace if the project uses CocoaPods or multiple projects",
        ));
      }
      (None, None) => {
        return Err(ShipError::invalid(
          "build.project or build.workspace is required",
          "Point build.project at the .xcodeproj to build",
        ));
      }
    };

    required("build.scheme", &build.scheme)?;
    required("build.configuration", &build.configuration)?;

    let path = state.resolve_path(input);
    if !path.exists() {
      return Err(ShipError::invalid(
        format!("Xcode input {} does not exist", path.display()),
        "Paths in appship.toml are relative to the project root",
      ));
    }

    Ok(StepOutcome::Done)
  }
}
