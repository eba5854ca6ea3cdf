//! Shared run state - built once per invocation, threaded through every step
//!
//! # Design
//!
//! `config`, `version` and `vcs` are resolved before the pipeline is built and
//! are only reachable through read-only accessors. `artifacts` is the one
//! mutable part: each execution step fills in the fields it owns and reads the
//! fields earlier steps produced.
//!
//! ```text
//! commands::load_state:
//!   ShipConfig::load + SystemGit::resolve + resolve_version -> RunState
//!   |
//!   v
//! Pipeline::run_all(&mut RunState)
//!   validation steps: read config/toggles
//!   execution steps:  read + write artifacts
//! ```

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::process::CommandRunner;
use crate::core::vcs::VcsInfo;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Flags set from the command line before the pipeline starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Toggles {
  pub skip_publish: bool,
  pub skip_notarize: bool,
  pub clean: bool,
  pub snapshot: bool,
}

/// Fields of [`Artifacts`], used by steps to declare what they read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  OutputDir,
  AppBundle,
  Archive,
  Packages,
  Checksums,
  ReleaseNotes,
  ReleaseUrl,
  Cask,
}

impl ArtifactKind {
  pub const ALL: [ArtifactKind; 8] = [
    ArtifactKind::OutputDir,
    ArtifactKind::AppBundle,
    ArtifactKind::Archive,
    ArtifactKind::Packages,
    ArtifactKind::Checksums,
    ArtifactKind::ReleaseNotes,
    ArtifactKind::ReleaseUrl,
    ArtifactKind::Cask,
  ];
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ArtifactKind::OutputDir => "output directory",
      ArtifactKind::AppBundle => "app bundle",
      ArtifactKind::Archive => "archive",
      ArtifactKind::Packages => "packages",
      ArtifactKind::Checksums => "checksums file",
      ArtifactKind::ReleaseNotes => "release notes",
      ArtifactKind::ReleaseUrl => "release URL",
      ArtifactKind::Cask => "cask file",
    };
    write!(f, "{}", name)
  }
}

/// Everything the execution stage has produced so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifacts {
  pub output_dir: Option<PathBuf>,
  pub app_bundle: Option<PathBuf>,
  pub archive: Option<PathBuf>,
  /// Append-only
  pub packages: Vec<PathBuf>,
  pub checksums: Option<PathBuf>,
  pub release_notes: Option<PathBuf>,
  pub release_url: Option<String>,
  pub cask: Option<PathBuf>,
}

impl Artifacts {
  /// Whether `kind` holds a non-empty value
  pub fn has(&self, kind: ArtifactKind) -> bool {
    fn set(p: &Option<PathBuf>) -> bool {
      p.as_ref().is_some_and(|p| !p.as_os_str().is_empty())
    }
    match kind {
      ArtifactKind::OutputDir => set(&self.output_dir),
      ArtifactKind::AppBundle => set(&self.app_bundle),
      ArtifactKind::Archive => set(&self.archive),
      ArtifactKind::Packages => !self.packages.is_empty(),
      ArtifactKind::Checksums => set(&self.checksums),
      ArtifactKind::ReleaseNotes => set(&self.release_notes),
      ArtifactKind::ReleaseUrl => self.release_url.as_ref().is_some_and(|u| !u.is_empty()),
      ArtifactKind::Cask => set(&self.cask),
    }
  }

  /// Kinds whose value differs between `before` and `self`
  pub fn changed_since(&self, before: &Artifacts) -> Vec<ArtifactKind> {
    ArtifactKind::ALL
      .into_iter()
      .filter(|kind| match kind {
        ArtifactKind::OutputDir => self.output_dir != before.output_dir,
        ArtifactKind::AppBundle => self.app_bundle != before.app_bundle,
        ArtifactKind::Archive => self.archive != before.archive,
        ArtifactKind::Packages => self.packages != before.packages,
        ArtifactKind::Checksums => self.checksums != before.checksums,
        ArtifactKind::ReleaseNotes => self.release_notes != before.release_notes,
        ArtifactKind::ReleaseUrl => self.release_url != before.release_url,
        ArtifactKind::Cask => self.cask != before.cask,
      })
      .collect()
  }

  pub fn require_output_dir(&self) -> ShipResult<&Path> {
    required(&self.output_dir, ArtifactKind::OutputDir)
  }

  pub fn require_app_bundle(&self) -> ShipResult<&Path> {
    required(&self.app_bundle, ArtifactKind::AppBundle)
  }

  pub fn require_cask(&self) -> ShipResult<&Path> {
    required(&self.cask, ArtifactKind::Cask)
  }

  pub fn require_packages(&self) -> ShipResult<&[PathBuf]> {
    if self.packages.is_empty() {
      return Err(missing(ArtifactKind::Packages));
    }
    Ok(&self.packages)
  }

  pub fn require_release_url(&self) -> ShipResult<&str> {
    match self.release_url.as_deref() {
      Some(url) if !url.is_empty() => Ok(url),
      _ => Err(missing(ArtifactKind::ReleaseUrl)),
    }
  }
}

fn required(value: &Option<PathBuf>, kind: ArtifactKind) -> ShipResult<&Path> {
  match value.as_deref() {
    Some(path) if !path.as_os_str().is_empty() => Ok(path),
    _ => Err(missing(kind)),
  }
}

fn missing(kind: ArtifactKind) -> ShipError {
  ShipError::Contract {
    message: format!("{} was not produced by an earlier step", kind),
  }
}

/// Mutable record threaded through every step of one invocation
pub struct RunState {
  root: PathBuf,
  config: ShipConfig,
  version: String,
  vcs: VcsInfo,
  toggles: Toggles,
  runner: Rc<dyn CommandRunner>,
  pub artifacts: Artifacts,
}

impl RunState {
  pub fn new(
    root: PathBuf,
    config: ShipConfig,
    version: String,
    vcs: VcsInfo,
    toggles: Toggles,
    runner: Rc<dyn CommandRunner>,
  ) -> Self {
    Self {
      root,
      config,
      version,
      vcs,
      toggles,
      runner,
      artifacts: Artifacts::default(),
    }
  }

  /// Project root (config paths are relative to it)
  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn config(&self) -> &ShipConfig {
    &self.config
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn vcs(&self) -> &VcsInfo {
    &self.vcs
  }

  pub fn toggles(&self) -> Toggles {
    self.toggles
  }

  pub fn runner(&self) -> &dyn CommandRunner {
    self.runner.as_ref()
  }

  /// Tag the release is published under: the HEAD tag, or `v<version>` for
  /// untagged and snapshot runs
  pub fn release_tag(&self) -> String {
    match &self.vcs.tag {
      Some(tag) if !self.toggles.snapshot => tag.clone(),
      _ => format!("v{}", self.version),
    }
  }

  /// Resolve a config-relative path against the project root
  pub fn resolve_path(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }
}
