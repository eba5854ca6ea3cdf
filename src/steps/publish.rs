//! GitHub release through the `gh` CLI

use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::ShipError;
use crate::core::process::ToolCommand;
use crate::pipeline::{Step, StepOutcome, StepResult};
use semver::Version;

pub struct PublishStep;

impl Step for PublishStep {
  fn name(&self) -> &str {
    "publish"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Packages]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::ReleaseUrl]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    if state.toggles().skip_publish {
      Some("publishing disabled".to_string())
    } else if state.config().release.is_none() {
      Some("release not configured".to_string())
    } else {
      None
    }
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(release) = &state.config().release else {
      return crate::pipeline::skip("release not configured");
    };
    let token = release.resolved_token().ok_or_else(|| {
      ShipError::with_help("no GitHub token available", "Export GITHUB_TOKEN or set release.token")
    })?;
    let tag = state.release_tag();
    let prerelease = release
      .prerelease
      .unwrap_or_else(|| Version::parse(state.version()).is_ok_and(|v| !v.pre.is_empty()));

    let mut gh = ToolCommand::new("gh").args(["release", "create", tag.as_str()]);
    for package in state.artifacts.require_packages()? {
      gh = gh.path_arg(package);
    }
    if let Some(checksums) = &state.artifacts.checksums {
      gh = gh.path_arg(checksums);
    }
    gh = gh
      .args(["--repo", release.repository().as_str()])
      .args(["--title", tag.as_str()])
      .args(["--target", state.vcs().commit.as_str()]);
    gh = match &state.artifacts.release_notes {
      Some(notes) => gh.arg("--notes-file").path_arg(notes),
      None => gh.args(["--notes", ""]),
    };
    if release.draft {
      gh = gh.arg("--draft");
    }
    if prerelease {
      gh = gh.arg("--prerelease");
    }

    let output = state.runner().run(&gh.env("GH_TOKEN", token).current_dir(state.root()))?;
    let url = output
      .lines()
      .map(str::trim)
      .rfind(|line| line.starts_with("https://"))
      .ok_or_else(|| ShipError::message(format!("gh did not report a release URL (output: {})", output.trim())))?
      .to_string();

    tracing::info!("  published {}", url);
    state.artifacts.release_url = Some(url);
    Ok(StepOutcome::Done)
  }
}
