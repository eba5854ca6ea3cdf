//! Developer ID signing and Apple notarization

use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::{ResultExt, ShipError};
use crate::core::process::ToolCommand;
use crate::pipeline::{Step, StepOutcome, StepResult};
use serde::Deserialize;
use std::fs;

pub struct SignStep;

impl Step for SignStep {
  fn name(&self) -> &str {
    "sign"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::AppBundle]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    state.config().sign.is_none().then(|| "signing not configured".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(sign) = &state.config().sign else {
      return crate::pipeline::skip("signing not configured");
    };
    let app = state.artifacts.require_app_bundle()?;

    let mut codesign = ToolCommand::new("codesign")
      .args(["--force", "--deep", "--options", "runtime", "--timestamp"])
      .args(["--sign", sign.identity.as_str()]);
    if let Some(entitlements) = &sign.entitlements {
      codesign = codesign.arg("--entitlements").path_arg(&state.resolve_path(entitlements));
    }
    state.runner().run(&codesign.path_arg(app))?;

    state.runner().run(
      &ToolCommand::new("codesign")
        .args(["--verify", "--deep", "--strict", "--verbose=2"])
        .path_arg(app),
    )?;

    Ok(StepOutcome::Done)
  }
}

/// `notarytool submit --output-format json` result
#[derive(Debug, Deserialize)]
struct Submission {
  id: String,
  status: String,
  #[serde(default)]
  message: Option<String>,
}

pub struct NotarizeStep;

impl Step for NotarizeStep {
  fn name(&self) -> &str {
    "notarize"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir, ArtifactKind::AppBundle]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    if state.toggles().skip_notarize {
      Some("disabled by --skip-notarize".to_string())
    } else if state.config().notarize.is_none() {
      Some("notarization not configured".to_string())
    } else {
      None
    }
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(notarize) = &state.config().notarize else {
      return crate::pipeline::skip("notarization not configured");
    };
    let app = state.artifacts.require_app_bundle()?;
    let upload = state
      .artifacts
      .require_output_dir()?
      .join(format!("{}-notarize.zip", state.config().app_name()));

    state.runner().run(
      &ToolCommand::new("ditto")
        .args(["-c", "-k", "--keepParent"])
        .path_arg(app)
        .path_arg(&upload),
    )?;

    let output = state.runner().run(
      &ToolCommand::new("xcrun")
        .args(["notarytool", "submit"])
        .path_arg(&upload)
        .args(["--apple-id", notarize.apple_id.as_str()])
        .args(["--team-id", notarize.team_id.as_str()])
        .arg("--password")
        .secret_arg(notarize.password.as_str())
        .args(["--output-format", "json", "--wait"]),
    );

    if upload.exists() {
      fs::remove_file(&upload).with_context(|| format!("Failed to remove {}", upload.display()))?;
    }

    let submission: Submission = serde_json::from_str(output?.trim())?;
    if submission.status != "Accepted" {
      let detail = submission.message.map(|m| format!(" ({})", m)).unwrap_or_default();
      return Err(ShipError::with_help(
        format!("notarization {} finished as {}{}", submission.id, submission.status, detail),
        format!("Inspect the log with: xcrun notarytool log {}", submission.id),
      ));
    }
    tracing::info!("  notarization {} accepted", submission.id);

    state
      .runner()
      .run(&ToolCommand::new("xcrun").args(["stapler", "staple"]).path_arg(app))?;

    Ok(StepOutcome::Done)
  }
}
