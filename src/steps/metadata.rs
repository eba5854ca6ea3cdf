//! Machine-readable run summary in the output directory

use crate::core::context::{ArtifactKind, RunState, Toggles};
use crate::core::error::{ResultExt, ShipResult};
use crate::core::vcs::VcsInfo;
use crate::pipeline::{Step, StepOutcome, StepResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Contents of `metadata.json`
#[derive(Debug, Serialize)]
struct RunMetadata<'a> {
  project_name: &'a str,
  version: &'a str,
  /// Tag the release is published under, even when HEAD is untagged
  release_tag: String,
  date: DateTime<Utc>,
  #[serde(flatten)]
  vcs: &'a VcsInfo,
  toggles: Toggles,
}

pub struct MetadataStep;

impl Step for MetadataStep {
  fn name(&self) -> &str {
    "metadata"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir]
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let dist = state.artifacts.require_output_dir()?;

    write_json(&dist.join("artifacts.json"), &state.artifacts)?;
    write_json(
      &dist.join("metadata.json"),
      &RunMetadata {
        project_name: &state.config().project_name,
        version: state.version(),
        release_tag: state.release_tag(),
        date: Utc::now(),
        vcs: state.vcs(),
        toggles: state.toggles(),
      },
    )?;

    Ok(StepOutcome::Done)
  }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ShipResult<()> {
  let json = serde_json::to_string_pretty(value)?;
  fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path.display()))
}
