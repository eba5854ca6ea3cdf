//! `appship check` - validate configuration without building anything

use super::load_state;
use crate::core::context::Toggles;
use crate::core::error::ShipResult;
use crate::core::vcs::VersionMode;
use crate::pipeline::{Pipeline, TracingReporter};
use std::path::Path;

/// Run the validation stage with the toggles a later build/release would use
pub fn run_check(root: &Path, config: Option<&Path>, toggles: Toggles) -> ShipResult<()> {
  let mut state = load_state(root, config, VersionMode::Build, toggles)?;

  let _validated = Pipeline::release().run_validation(&mut state, &TracingReporter)?;

  println!("✅ {} is ready to ship", state.config().project_name);
  Ok(())
}
