use crate::core::config::{NameVars, PackageFormat};
use crate::core::context::RunState;
use crate::core::error::ShipError;
use crate::pipeline::{Step, StepOutcome, StepResult};
use std::collections::HashSet;

pub struct PackageCheck;

impl Step for PackageCheck {
  fn name(&self) -> &str {
    "package"
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let package = &state.config().package;

    if package.formats.is_empty() {
      return Err(ShipError::invalid(
        "package.formats is empty",
        "List at least one of \"zip\", \"dmg\"",
      ));
    }

    let mut seen = HashSet::new();
    for format in &package.formats {
      if PackageFormat::parse(format).is_none() {
        return Err(ShipError::invalid(
          format!("unknown package format '{}'", format),
          "Supported formats: \"zip\", \"dmg\"",
        ));
      }
      if !seen.insert(format.as_str()) {
        return Err(ShipError::invalid(
          format!("package format '{}' is listed twice", format),
          "Each format produces one file; list it once",
        ));
      }
    }

    package.render_name(&NameVars {
      name: state.config().app_name(),
      version: state.version(),
      short_commit: &state.vcs().short_commit,
      date: "1970-01-01",
    })?;

    Ok(StepOutcome::Done)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::context::Toggles;
  use crate::pipeline::testing::{config, state_with};

  fn check(toml: &str) -> StepResult {
    let (mut state, _) = state_with(config(toml), Toggles::default());
    PackageCheck.execute(&mut state)
  }

  #[test]
  fn test_default_package_config_passes() {
    assert_eq!(check("project_name = \"Example\"").unwrap(), StepOutcome::Done);
  }

  #[test]
  fn test_rejects_bad_formats() {
    let err = check("[package]\nformats = []").unwrap_err();
    assert_eq!(err.to_string(), "package.formats is empty");

    let err = check("[package]\nformats = [\"zip\", \"pkg\"]").unwrap_err();
    assert_eq!(err.to_string(), "unknown package format 'pkg'");

    let err = check("[package]\nformats = [\"dmg\", \"dmg\"]").unwrap_err();
    assert_eq!(err.to_string(), "package format 'dmg' is listed twice");
  }

  #[test]
  fn test_rejects_unknown_template_placeholder() {
    let err = check("[package]\nname_template = \"{name}-{arch}\"").unwrap_err();
    assert!(err.to_string().contains("{arch}"));
  }
}
