//! Output directory lifecycle

use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::{ResultExt, ShipError};
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::fs;

pub struct CleanStep;

impl Step for CleanStep {
  fn name(&self) -> &str {
    "clean"
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    (!state.toggles().clean).then(|| "pass --clean to remove previous output".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let dist = state.resolve_path(&state.config().dist);
    if !dist.exists() {
      return crate::pipeline::skip(format!("{} does not exist", dist.display()));
    }

    fs::remove_dir_all(&dist).with_context(|| format!("Failed to remove {}", dist.display()))?;
    tracing::info!("  removed {}", dist.display());
    Ok(StepOutcome::Done)
  }
}

pub struct DistStep;

impl Step for DistStep {
  fn name(&self) -> &str {
    "dist"
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir]
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let dist = state.resolve_path(&state.config().dist);

    if dist.is_dir() && fs::read_dir(&dist)?.next().is_some() {
      return Err(ShipError::with_help(
        format!("output directory {} is not empty", dist.display()),
        "Run again with --clean to remove previous output",
      ));
    }

    fs::create_dir_all(&dist).with_context(|| format!("Failed to create {}", dist.display()))?;
    state.artifacts.output_dir = Some(dist);
    Ok(StepOutcome::Done)
  }
}
