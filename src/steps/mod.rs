//! Execution stage
//!
//! Adapters around the macOS and GitHub tooling. Each step declares the
//! artifacts it reads and writes; the stage runner enforces both sides.
//!
//! ```text
//! clean -> dist -> build -> sign -> notarize -> archive -> dmg -> checksums
//!   -> changelog -> publish -> cask -> tap -> metadata
//! ```

mod build;
mod changelog;
mod homebrew;
mod metadata;
mod package;
mod prepare;
mod publish;
mod signing;

use crate::core::config::NameVars;
use crate::core::context::RunState;
use crate::core::error::{ResultExt, ShipResult};
use crate::pipeline::Step;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Execution steps in run order
pub fn execution_steps() -> Vec<Box<dyn Step>> {
  vec![
    Box::new(prepare::CleanStep),
    Box::new(prepare::DistStep),
    Box::new(build::BuildStep),
    Box::new(signing::SignStep),
    Box::new(signing::NotarizeStep),
    Box::new(package::ArchiveStep),
    Box::new(package::DmgStep),
    Box::new(package::ChecksumsStep),
    Box::new(changelog::ChangelogStep),
    Box::new(publish::PublishStep),
    Box::new(homebrew::CaskStep),
    Box::new(homebrew::TapStep),
    Box::new(metadata::MetadataStep),
  ]
}

/// Package file stem from `package.name_template`
pub(crate) fn package_stem(state: &RunState) -> ShipResult<String> {
  let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
  state.config().package.render_name(&NameVars {
    name: state.config().app_name(),
    version: state.version(),
    short_commit: &state.vcs().short_commit,
    date: &date,
  })
}

/// Lowercase hex SHA-256 of a file's contents
pub(crate) fn sha256_file(path: &Path) -> ShipResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to hash {}", path.display()))?;
  Ok(format!("{:x}", hasher.finalize()))
}

/// Final path component as a string, for upload names and checksum lines
pub(crate) fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
