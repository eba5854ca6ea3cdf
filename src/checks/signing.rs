//! Code signing identity and notarization credentials

use super::required;
use crate::core::context::RunState;
use crate::core::error::ShipError;
use crate::pipeline::{Step, StepOutcome, StepResult};

/// Notarization is configured and not switched off for this run
pub(crate) fn notarization_enabled(state: &RunState) -> bool {
  state.config().notarize.is_some() && !state.toggles().skip_notarize
}

pub struct SignCheck;

impl Step for SignCheck {
  fn name(&self) -> &str {
    "sign"
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(sign) = &state.config().sign else {
      if notarization_enabled(state) {
        return Err(ShipError::invalid(
          "notarization requires a signed app but [sign] is not configured",
          "Add [sign] identity = \"Developer ID Application: ...\" or pass --skip-notarize",
        ));
      }
      return crate::pipeline::skip("signing not configured");
    };

    required("sign.identity", &sign.identity)?;

    if let Some(entitlements) = &sign.entitlements {
      let path = state.resolve_path(entitlements);
      if !path.is_file() {
        return Err(ShipError::invalid(
          format!("entitlements file {} does not exist", path.display()),
          "Paths in appship.toml are relative to the project root",
        ));
      }
    }

    Ok(StepOutcome::Done)
  }
}

pub struct NotarizeCheck;

impl Step for NotarizeCheck {
  fn name(&self) -> &str {
    "notarize"
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    if state.toggles().skip_notarize {
      Some("disabled by --skip-notarize".to_string())
    } else if state.config().notarize.is_none() {
      Some("notarization not configured".to_string())
    } else {
      None
    }
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(notarize) = &state.config().notarize else {
      return crate::pipeline::skip("notarization not configured");
    };

    required("notarize.apple_id", &notarize.apple_id)?;
    required("notarize.team_id", &notarize.team_id)?;
    required("notarize.password", &notarize.password)?;

    Ok(StepOutcome::Done)
  }
}
