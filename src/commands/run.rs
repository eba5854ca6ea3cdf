//! `appship build`, `appship release`, `appship snapshot`
//!
//! All three run the same pipeline; they differ only in how the version is
//! resolved and which toggles are forced.

use super::load_state;
use crate::core::context::{RunState, Toggles};
use crate::core::error::ShipResult;
use crate::core::vcs::VersionMode;
use crate::pipeline::{Pipeline, TracingReporter};
use std::path::Path;

/// Which pipeline preset the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
  Build,
  Release,
  Snapshot,
}

impl RunKind {
  pub fn version_mode(self) -> VersionMode {
    match self {
      RunKind::Build => VersionMode::Build,
      RunKind::Release => VersionMode::Release,
      RunKind::Snapshot => VersionMode::Snapshot,
    }
  }

  /// Apply the preset on top of the flags given on the command line
  pub fn toggles(self, requested: Toggles) -> Toggles {
    match self {
      RunKind::Build => Toggles {
        skip_publish: true,
        snapshot: false,
        ..requested
      },
      RunKind::Release => Toggles {
        snapshot: false,
        ..requested
      },
      RunKind::Snapshot => Toggles {
        skip_publish: true,
        snapshot: true,
        ..requested
      },
    }
  }
}

/// Validate, then execute the release pipeline
pub fn run_pipeline(root: &Path, config: Option<&Path>, kind: RunKind, requested: Toggles) -> ShipResult<()> {
  let mut state = load_state(root, config, kind.version_mode(), kind.toggles(requested))?;

  Pipeline::release().run_all(&mut state, &TracingReporter)?;

  print_summary(&state);
  Ok(())
}

fn print_summary(state: &RunState) {
  let artifacts = &state.artifacts;

  println!("✅ {} {}", state.config().project_name, state.version());
  for package in &artifacts.packages {
    println!("   📦 {}", package.display());
  }
  if let Some(cask) = &artifacts.cask {
    println!("   🍺 {}", cask.display());
  }
  if let Some(url) = &artifacts.release_url {
    println!("   🚀 {}", url);
  }
}
