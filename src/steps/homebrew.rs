//! Homebrew cask rendering and tap update

use super::{file_name, sha256_file};
use crate::core::config::CaskConfig;
use crate::core::context::{ArtifactKind, RunState};
use crate::core::error::{ResultExt, ShipError};
use crate::core::process::ToolCommand;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs for one cask file
struct CaskFile<'a> {
  cask: &'a CaskConfig,
  version: &'a str,
  sha256: &'a str,
  url: &'a str,
  app_name: &'a str,
}

impl CaskFile<'_> {
  fn render(&self) -> String {
    let mut out = format!("cask {} do\n", ruby_string(&self.cask.name));
    out.push_str(&format!("  version {}\n", ruby_string(self.version)));
    out.push_str(&format!("  sha256 {}\n\n", ruby_string(self.sha256)));
    out.push_str(&format!("  url {}\n", ruby_string(self.url)));
    out.push_str(&format!("  name {}\n", ruby_string(self.app_name)));
    if let Some(description) = &self.cask.description {
      out.push_str(&format!("  desc {}\n", ruby_string(description)));
    }
    out.push_str(&format!("  homepage {}\n\n", ruby_string(&self.cask.homepage)));
    out.push_str(&format!("  app {}\n", ruby_string(&format!("{}.app", self.app_name))));
    out.push_str("end\n");
    out
  }
}

/// Double-quoted Ruby literal; `\`, `"` and `#{` are escaped
fn ruby_string(value: &str) -> String {
  let escaped = value.replace('\\', "\\\\").replace('"', "\\\"").replace("#{", "\\#{");
  format!("\"{}\"", escaped)
}

/// The package a cask points at: the disk image when there is one, else the zip
fn cask_package(packages: &[PathBuf]) -> Option<&PathBuf> {
  packages
    .iter()
    .find(|p| p.extension().is_some_and(|e| e == "dmg"))
    .or_else(|| packages.iter().find(|p| p.extension().is_some_and(|e| e == "zip")))
}

pub struct CaskStep;

impl Step for CaskStep {
  fn name(&self) -> &str {
    "cask"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::OutputDir, ArtifactKind::Packages]
  }

  fn produces(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Cask]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    state.config().cask.is_none().then(|| "cask not configured".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let config = state.config();
    let Some(cask) = &config.cask else {
      return crate::pipeline::skip("cask not configured");
    };
    let release = config
      .release
      .as_ref()
      .ok_or_else(|| ShipError::validation("cask needs [release] to build download URLs"))?;

    let package = cask_package(state.artifacts.require_packages()?)
      .ok_or_else(|| ShipError::message("no .dmg or .zip package to put in the cask"))?;
    let sha256 = sha256_file(package)?;
    let url = release.download_url(&state.release_tag(), &file_name(package));

    let contents = CaskFile {
      cask,
      version: state.version(),
      sha256: &sha256,
      url: &url,
      app_name: config.app_name(),
    }
    .render();

    let path = state
      .artifacts
      .require_output_dir()?
      .join(format!("{}.rb", cask.name));
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    state.artifacts.cask = Some(path);
    Ok(StepOutcome::Done)
  }
}

/// Commits the rendered cask into a local tap checkout
pub struct TapStep;

impl TapStep {
  fn git(tap: &Path) -> ToolCommand {
    ToolCommand::new("git").arg("-C").path_arg(tap)
  }
}

impl Step for TapStep {
  fn name(&self) -> &str {
    "tap"
  }

  fn requires(&self) -> &[ArtifactKind] {
    &[ArtifactKind::Cask]
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    if state.toggles().skip_publish {
      return Some("publishing disabled".to_string());
    }
    match &state.config().cask {
      Some(cask) if cask.tap.is_some() => None,
      _ => Some("no tap configured".to_string()),
    }
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some((cask, tap)) = state
      .config()
      .cask
      .as_ref()
      .and_then(|cask| cask.tap.as_ref().map(|tap| (cask, tap)))
    else {
      return crate::pipeline::skip("no tap configured");
    };

    let tap_root = state.resolve_path(&tap.path);
    let relative = Path::new(&tap.directory).join(format!("{}.rb", cask.name));
    let destination = tap_root.join(&relative);
    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(state.artifacts.require_cask()?, &destination)
      .with_context(|| format!("Failed to copy cask to {}", destination.display()))?;

    let runner = state.runner();
    runner.run(&Self::git(&tap_root).arg("add").path_arg(&relative))?;
    runner.run(
      &Self::git(&tap_root)
        .args(["commit", "-m"])
        .arg(format!("Update {} to {}", cask.name, state.version())),
    )?;
    if tap.push {
      runner.run(&Self::git(&tap_root).arg("push"))?;
    }

    tracing::info!("  updated {}", destination.display());
    Ok(StepOutcome::Done)
  }
}
