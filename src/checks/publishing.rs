//! GitHub release and Homebrew cask targets

use super::required;
use crate::core::context::RunState;
use crate::core::error::ShipError;
use crate::pipeline::{Step, StepOutcome, StepResult};

pub struct ReleaseCheck;

impl Step for ReleaseCheck {
  fn name(&self) -> &str {
    "release"
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    if state.toggles().skip_publish {
      Some("publishing disabled".to_string())
    } else if state.config().release.is_none() {
      Some("release not configured".to_string())
    } else {
      None
    }
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let Some(release) = &state.config().release else {
      return crate::pipeline::skip("release not configured");
    };

    required("release.owner", &release.owner)?;
    required("release.name", &release.name)?;

    if release.resolved_token().is_none() {
      return Err(ShipError::invalid(
        "no GitHub token available for publishing",
        "Export GITHUB_TOKEN or set release.token = \"${MY_TOKEN}\"",
      ));
    }

    let vcs = state.vcs();
    if vcs.tag.is_none() {
      return Err(ShipError::invalid(
        format!("HEAD ({}) is not tagged", vcs.short_commit),
        "Tag the commit (git tag v1.2.3) or run `appship snapshot`",
      ));
    }
    if vcs.dirty {
      return Err(ShipError::invalid(
        "working tree has uncommitted changes",
        "Commit or stash changes so the release matches its tag",
      ));
    }

    Ok(StepOutcome::Done)
  }
}

pub struct CaskCheck;

impl Step for CaskCheck {
  fn name(&self) -> &str {
    "cask"
  }

  fn skip_reason(&self, state: &RunState) -> Option<String> {
    state.config().cask.is_none().then(|| "cask not configured".to_string())
  }

  fn execute(&self, state: &mut RunState) -> StepResult {
    let config = state.config();
    let Some(cask) = &config.cask else {
      return crate::pipeline::skip("cask not configured");
    };

    required("cask.name", &cask.name)?;
    required("cask.homepage", &cask.homepage)?;

    if config.release.is_none() {
      return Err(ShipError::invalid(
        "cask needs [release] to know where packages are downloaded from",
        "Add a [release] section with owner and name",
      ));
    }

    if let Some(tap) = &cask.tap {
      let path = state.resolve_path(&tap.path);
      if !path.join(".git").exists() {
        return Err(ShipError::invalid(
          format!("cask.tap.path {} is not a git checkout", path.display()),
          "Clone your homebrew tap locally and point cask.tap.path at it",
        ));
      }
    }

    Ok(StepOutcome::Done)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::context::Toggles;
  use crate::core::process::testing::RecordingRunner;
  use crate::pipeline::testing::{config, state_at, state_with};

  const RELEASE: &str = r#"
[release]
owner = "example"
name = "example-app"
token = "ghp_test"
"#;

  #[test]
  fn test_release_skips_when_publishing_disabled() {
    let toggles = Toggles {
      skip_publish: true,
      ..Default::default()
    };
    let (state, _) = state_with(config(RELEASE), toggles);
    assert_eq!(ReleaseCheck.skip_reason(&state).as_deref(), Some("publishing disabled"));
  }

  #[test]
  fn test_release_passes_on_tagged_clean_head() {
    let (mut state, _) = state_with(config(RELEASE), Toggles::default());
    assert!(ReleaseCheck.skip_reason(&state).is_none());
    assert_eq!(ReleaseCheck.execute(&mut state).unwrap(), StepOutcome::Done);
  }

  #[test]
  fn test_release_requires_owner() {
    let (mut state, _) = state_with(config("[release]\nname = \"x\"\ntoken = \"t\""), Toggles::default());
    assert_eq!(ReleaseCheck.execute(&mut state).unwrap_err().to_string(), "release.owner is required");
  }

  #[test]
  fn test_cask_requires_release_and_tap_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let cask = "[cask]\nname = \"example-app\"\nhomepage = \"https://example.com\"\n";

    let (mut state, _) = state_at(dir.path(), config(cask), Toggles::default(), RecordingRunner::new());
    assert!(CaskCheck.execute(&mut state).unwrap_err().to_string().contains("needs [release]"));

    let with_tap = format!("{}\n[cask.tap]\npath = \"tap\"\n{}", cask, RELEASE);
    let (mut state, _) = state_at(dir.path(), config(&with_tap), Toggles::default(), RecordingRunner::new());
    assert!(CaskCheck.execute(&mut state).unwrap_err().to_string().contains("not a git checkout"));

    std::fs::create_dir_all(dir.path().join("tap/.git")).unwrap();
    assert_eq!(CaskCheck.execute(&mut state).unwrap(), StepOutcome::Done);
  }

  #[test]
  fn test_cask_skips_when_unconfigured() {
    let (state, _) = state_with(config(RELEASE), Toggles::default());
    assert_eq!(CaskCheck.skip_reason(&state).as_deref(), Some("cask not configured"));
  }
}
