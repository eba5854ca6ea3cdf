//! Changelog sort order and pattern validation

use crate::changelog::Rules;
use crate::core::context::RunState;
use crate::pipeline::{Step, StepOutcome, StepResult};

pub struct ChangelogCheck;

impl Step for ChangelogCheck {
  fn name(&self) -> &str {
    "changelog"
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    state
      .config()
      .changelog
      .disable
      .then(|| "changelog disabled".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let changelog = &state.config().changelog;
    let rules = Rules::compile(changelog)?;

    if !changelog.groups.is_empty() && !rules.has_catch_all() {
      tracing::warn!("changelog groups have no catch-all (empty regexp); commits matching no group will be left out");
    }

    Ok(StepOutcome::Done)
  }
}
