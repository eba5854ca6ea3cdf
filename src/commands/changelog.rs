//! `appship changelog` - preview release notes for the current range

use super::load_state;
use crate::changelog;
use crate::core::context::Toggles;
use crate::core::error::ShipResult;
use crate::core::vcs::VersionMode;
use std::path::Path;

/// Print the notes the changelog step would write, to stdout
pub fn run_changelog(root: &Path, config: Option<&Path>) -> ShipResult<()> {
  let state = load_state(root, config, VersionMode::Build, Toggles::default())?;

  if state.config().changelog.disable {
    tracing::warn!("changelog.disable is set; release runs will not write notes");
  }

  let range = match &state.vcs().previous_tag {
    Some(tag) => format!("{}..HEAD", tag),
    None => "all history".to_string(),
  };
  tracing::info!("{} commits in {}", state.vcs().commits.len(), range);

  let notes = changelog::generate(state.version(), &state.vcs().commits, &state.config().changelog)?;
  print!("{}", notes);
  Ok(())
}
