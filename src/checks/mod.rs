//! Validation stage
//!
//! One check per concern, run in order before anything touches the disk or the
//! network. Checks only read configuration, toggles and repository facts; they
//! never write artifacts. A check that has nothing to validate for this run
//! (e.g. notarization disabled) skips instead of passing silently.
//!
//! # Checks
//!
//! - **env**: no `${VAR}` placeholder left unresolved
//! - **project**: project name and output directory
//! - **build**: Xcode project/workspace and scheme
//! - **sign**, **notarize**: identities and credentials
//! - **package**: formats and file name template
//! - **changelog**: sort order and patterns
//! - **release**, **cask**: publishing targets

mod changelog;
mod env;
mod package;
mod project;
mod publishing;
mod signing;

use crate::pipeline::Step;

/// Validation checks in run order
pub fn validation_steps() -> Vec<Box<dyn Step>> {
  vec![
    Box::new(env::EnvCheck),
    Box::new(project::ProjectCheck),
    Box::new(project::BuildCheck),
    Box::new(signing::SignCheck),
    Box::new(signing::NotarizeCheck),
    Box::new(package::PackageCheck),
    Box::new(changelog::ChangelogCheck),
    Box::new(publishing::ReleaseCheck),
    Box::new(publishing::CaskCheck),
  ]
}

/// Error for an empty required setting
fn required(key: &str, value: &str) -> crate::core::error::ShipResult<()> {
  if value.trim().is_empty() {
    return Err(crate::core::error::ShipError::invalid(
      format!("{} is required", key),
      format!("Set {} in appship.toml", key),
    ));
  }
  Ok(())
}
