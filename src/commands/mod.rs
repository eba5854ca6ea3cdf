//! CLI commands for appship
//!
//! - **check**: validation stage only, nothing is built
//! - **build**: full pipeline without publishing
//! - **release**: full pipeline for a tagged commit, publishing included
//! - **snapshot**: full pipeline with a `-SNAPSHOT-` version, never publishes
//! - **changelog**: print the release notes for the current commit range
//!
//! Every command loads config and repository facts once through [`load_state`].

pub mod changelog;
pub mod check;
pub mod run;

pub use changelog::run_changelog;
pub use check::run_check;
pub use run::{RunKind, run_pipeline};

use crate::core::config::ShipConfig;
use crate::core::context::{RunState, Toggles};
use crate::core::error::ShipResult;
use crate::core::process::SystemRunner;
use crate::core::vcs::{SystemGit, VersionMode, resolve_version};
use std::path::Path;
use std::rc::Rc;

/// Build the run state for `root`: config, repository facts, version
pub fn load_state(root: &Path, config: Option<&Path>, mode: VersionMode, toggles: Toggles) -> ShipResult<RunState> {
  let (config, config_path) = ShipConfig::load(root, config)?;
  tracing::debug!("config: {}", config_path.display());

  let git = SystemGit::open(root)?;
  let vcs = git.resolve()?;
  let version = resolve_version(mode, &vcs)?;

  tracing::info!(
    "{} {} ({}{})",
    config.project_name,
    version,
    vcs.short_commit,
    if vcs.dirty { ", dirty" } else { "" }
  );

  Ok(RunState::new(
    root.to_path_buf(),
    config,
    version,
    vcs,
    toggles,
    Rc::new(SystemRunner),
  ))
}
