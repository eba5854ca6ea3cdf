//! Step contract shared by validation checks and execution steps

use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::ShipResult;

/// Non-failure outcome of a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
  /// The step did its work
  Done,
  /// The step deliberately did nothing; the pipeline continues
  Skipped { reason: String },
}

/// `Ok(Done)`, `Ok(Skipped)` or `Err(failure)`
pub type StepResult = ShipResult<StepOutcome>;

/// Shorthand for returning a skip from `execute`
pub fn skip(reason: impl Into<String>) -> StepResult {
  Ok(StepOutcome::Skipped { reason: reason.into() })
}

/// A single named unit of pipeline work
///
/// # Example
///
/// ```rust,ignore
/// struct Staple;
///
/// impl Step for Staple {
///   fn name(&self) -> &str {
///     "staple"
///   }
///
///   fn requires(&self) -> &[ArtifactKind] {
///     &[ArtifactKind::AppBundle]
///   }
///
///   fn execute(&self, state: &mut RunState) -> StepResult {
///     let app = state.artifacts.require_app_bundle()?;
///     state.runner().run(&ToolCommand::new("xcrun").args(["stapler", "staple"]).path_arg(app))?;
///     Ok(StepOutcome::Done)
///   }
/// }
/// ```
pub trait Step {
  /// Human-readable identifier used in logs and as the error prefix
  fn name(&self) -> &str;

  /// Artifacts that must be present before `execute` runs
  fn requires(&self) -> &[ArtifactKind] {
    &[]
  }

  /// Artifacts this step is allowed to write
  fn produces(&self) -> &[ArtifactKind] {
    &[]
  }

  /// Decide up front that this run has nothing for the step to do.
  ///
  /// Checked before `requires`, so a step that is toggled off never trips over
  /// artifacts an upstream step legitimately did not produce.
  fn skip_reason(&self, _state: &RunState) -> Option<String> {
    None
  }

  /// Do the work. Invoked at most once per run.
  fn execute(&self, state: &mut RunState) -> StepResult;
}
