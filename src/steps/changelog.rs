//! Release notes in the output directory

use crate::changelog;
use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::ResultExt;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::fs;

/// Writes `release-notes.md` for the publish step
pub struct ChangelogStep;

impl Step for ChangelogStep {
  fn name(&self) -> &str {
    "changelog"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::ReleaseNotes]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    state
      .config()
      .changelog
      .disable
      .then(|| "changelog disabled".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let notes = changelog::generate(state.version(), &state.vcs().commits, &state.config().changelog)?;

    let path = state.artifacts.require_output_dir()?.join("release-notes.md");
    fs::write(&path, notes).with_context(|| format!("Failed to write {}", path.display()))?;

    state.artifacts.release_notes = Some(path);
    Ok(StepOutcome::Done)
  }
}
