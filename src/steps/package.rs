//! Distributable packages and their checksums

use super::{file_name, package_stem, sha256_file};
use crate::core::config::PackageFormat;
use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::ResultExt;
use crate::core::process::ToolCommand;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::fs;

fn not_requested(state: &RunState, format: PackageFormat) -> Option<String> {
  (!state.config().package.wants(format)).then(|| format!("{} not in package.formats", format.extension()))
}

/// Zip of the app bundle, made with `ditto` so extended attributes survive
pub struct ArchiveStep;

impl Step for ArchiveStep {
  fn name(&self) -> &str {
    "archive"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir, ArtifactKind::AppBundle]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Archive, ArtifactKind::Packages]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    not_requested(state, PackageFormat::Zip)
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let zip = state
      .artifacts
      .require_output_dir()?
      .join(format!("{}.zip", package_stem(state)?));
    let app = state.artifacts.require_app_bundle()?;

    state.runner().run(
      &ToolCommand::new("ditto")
        .args(["-c", "-k", "--keepParent"])
        .path_arg(app)
        .path_arg(&zip),
    )?;

    state.artifacts.archive = Some(zip.clone());
    state.artifacts.packages.push(zip);
    Ok(StepOutcome::Done)
  }
}

/// Compressed disk image with the app at its root
pub struct DmgStep;

impl Step for DmgStep {
  fn name(&self) -> &str {
    "dmg"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir, ArtifactKind::AppBundle]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Packages]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    not_requested(state, PackageFormat::Dmg)
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let dmg = state
      .artifacts
      .require_output_dir()?
      .join(format!("{}.dmg", package_stem(state)?));
    let app = state.artifacts.require_app_bundle()?;

    state.runner().run(
      &ToolCommand::new("hdiutil")
        .arg("create")
        .args(["-volname", state.config().app_name()])
        .arg("-srcfolder")
        .path_arg(app)
        .args(["-ov", "-format", "UDZO"])
        .path_arg(&dmg),
    )?;

    state.artifacts.packages.push(dmg);
    Ok(StepOutcome::Done)
  }
}

/// `checksums.txt` in `shasum -a 256` format
pub struct ChecksumsStep;

impl Step for ChecksumsStep {
  fn name(&self) -> &str {
    "checksums"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir, ArtifactKind::Packages]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Checksums]
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let mut contents = String::new();
    for package in state.artifacts.require_packages()? {
      contents.push_str(&format!("{}  {}\n", sha256_file(package)?, file_name(package)));
    }

    let path = state.artifacts.require_output_dir()?.join("checksums.txt");
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    state.artifacts.checksums = Some(path);
    Ok(StepOutcome::Done)
  }
}
