//! Stage runner: ordered, sequential, stop at the first failure

use super::reporter::Reporter;
use super::step::{Step, StepOutcome, StepResult};
use crate::core::context::{ArtifactKind, Artifacts, RunState};
use crate::core::error::{ShipError, ShipResult};
use std::time::Instant;

/// An ordered list of steps run under one failure policy
pub struct Stage {
  name: &'static str,
  steps: Vec<Box<dyn Step>>,
}

impl Stage {
  pub fn new(name: &'static str, steps: Vec<Box<dyn Step>>) -> Self {
    Self { name, steps }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn steps(&self) -> &[Box<dyn Step>] {
    &self.steps
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name()).collect()
  }

  pub fn run(&self, state: &mut RunState, reporter: &dyn Reporter) -> ShipResult<()> {
    run_stage(self.name, state, &self.steps, reporter)
  }
}

/// Run `steps` in order against `state`.
///
/// Skips are reported and passed over. The first failure stops the stage and
/// comes back as `"<step>: <message>"`; later steps are never invoked. Writes a
/// failing step already made are kept.
pub fn run_stage(
  stage: &str,
  state: &mut RunState,
  steps: &[Box<dyn Step>],
  reporter: &dyn Reporter,
) -> ShipResult<()> {
  reporter.stage_started(stage, steps.len());

  for step in steps {
    let name = step.name();
    reporter.step_started(name);
    let started = Instant::now();

    match run_step(step.as_ref(), state) {
      Ok(StepOutcome::Done) => reporter.step_finished(name, started.elapsed()),
      Ok(StepOutcome::Skipped { reason }) => reporter.step_skipped(name, &reason),
      Err(err) => {
        reporter.step_failed(name, &err);
        return Err(err.in_step(name));
      }
    }
  }

  Ok(())
}

fn run_step(step: &dyn Step, state: &mut RunState) -> StepResult {
  if let Some(reason) = step.skip_reason(state) {
    return Ok(StepOutcome::Skipped { reason });
  }

  if let Some(kind) = step.requires().iter().find(|kind| !state.artifacts.has(**kind)) {
    return Err(ShipError::Contract {
      message: format!("requires the {} but no earlier step produced it", kind),
    });
  }

  let before = state.artifacts.clone();
  let outcome = step.execute(state)?;
  check_writes(step, &outcome, &before, &state.artifacts)?;
  Ok(outcome)
}

fn check_writes(step: &dyn Step, outcome: &StepOutcome, before: &Artifacts, after: &Artifacts) -> ShipResult<()> {
  let changed = after.changed_since(before);

  if let StepOutcome::Skipped { .. } = outcome
    && let Some(kind) = changed.first()
  {
    return Err(ShipError::Contract {
      message: format!("skipped but still changed the {}", kind),
    });
  }

  for kind in changed {
    if !step.produces().contains(&kind) {
      return Err(ShipError::Contract {
        message: format!("changed the {} which it does not own", kind),
      });
    }
    if kind == ArtifactKind::Packages && !after.packages.starts_with(&before.packages) {
      return Err(ShipError::Contract {
        message: "packages may only be appended to".to_string(),
      });
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::reporter::testing::RecordingReporter;
  use crate::pipeline::step::skip;
  use crate::pipeline::testing::{FakeStep, Script, calls, state};
  use std::path::PathBuf;

  #[test]
  fn test_empty_stage_succeeds() {
    let mut state = state();
    let reporter = RecordingReporter::default();
    run_stage("validation", &mut state, &[], &reporter).unwrap();
    assert_eq!(reporter.events(), vec!["stage validation 0"]);
  }

  #[test]
  fn test_failure_stops_stage() {
    for k in 0..4 {
      let log = calls();
      let steps: Vec<Box<dyn Step>> = (0..4)
        .map(|i| {
          let script = if i == k { Script::Fail("boom") } else { Script::Done };
          FakeStep::new(&format!("step-{}", i), script, &log).boxed()
        })
        .collect();

      let mut state = state();
      let reporter = RecordingReporter::default();
      let err = run_stage("execution", &mut state, &steps, &reporter).unwrap_err();

      assert_eq!(err.to_string(), format!("step-{}: boom", k));
      assert_eq!(err.step_name(), Some(format!("step-{}", k).as_str()));
      let expected: Vec<String> = (0..=k).map(|i| format!("step-{}", i)).collect();
      assert_eq!(*log.borrow(), expected, "steps after step-{} must not run", k);
    }
  }

  #[test]
  fn test_skips_and_successes_all_run_in_order() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("a", Script::Done, &log).boxed(),
      FakeStep::new("b", Script::Skip("not configured"), &log).boxed(),
      FakeStep::new("c", Script::Done, &log).boxed(),
      FakeStep::new("d", Script::Skip("disabled"), &log).boxed(),
    ];

    let mut state = state();
    let reporter = RecordingReporter::default();
    run_stage("execution", &mut state, &steps, &reporter).unwrap();

    assert_eq!(*log.borrow(), vec!["a", "b", "c", "d"]);
    assert_eq!(
      reporter.events(),
      vec![
        "stage execution 4",
        "start a",
        "done a",
        "start b",
        "skip b: not configured",
        "start c",
        "done c",
        "start d",
        "skip d: disabled",
      ]
    );
  }

  #[test]
  fn test_duplicate_names_both_run() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("sign", Script::Done, &log).boxed(),
      FakeStep::new("sign", Script::Done, &log).boxed(),
    ];
    run_stage("execution", &mut state(), &steps, &RecordingReporter::default()).unwrap();
    assert_eq!(*log.borrow(), vec!["sign", "sign"]);
  }

  #[test]
  fn test_missing_required_artifact_fails_before_execute() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("sign", Script::Done, &log)
        .requiring(&[ArtifactKind::AppBundle])
        .boxed(),
    ];

    let err = run_stage("execution", &mut state(), &steps, &RecordingReporter::default()).unwrap_err();
    assert_eq!(
      err.to_string(),
      "sign: pipeline contract violated: requires the app bundle but no earlier step produced it"
    );
    assert!(log.borrow().is_empty());
  }

  #[test]
  fn test_skip_reason_wins_over_requirements() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("tap", Script::Done, &log)
        .requiring(&[ArtifactKind::ReleaseUrl])
        .skipping_when(|_| Some("publishing disabled".to_string()))
        .boxed(),
    ];

    let reporter = RecordingReporter::default();
    run_stage("execution", &mut state(), &steps, &reporter).unwrap();
    assert!(log.borrow().is_empty());
    assert!(reporter.events().contains(&"skip tap: publishing disabled".to_string()));
  }

  #[test]
  fn test_writing_unowned_artifact_is_a_violation() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("rogue", Script::Done, &log)
        .writing(|state| state.artifacts.release_url = Some("https://example.com".to_string()))
        .boxed(),
    ];

    let err = run_stage("execution", &mut state(), &steps, &RecordingReporter::default()).unwrap_err();
    assert!(err.to_string().contains("changed the release URL which it does not own"));
  }

  #[test]
  fn test_packages_are_append_only() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("zip", Script::Done, &log)
        .producing(&[ArtifactKind::Packages])
        .writing(|state| state.artifacts.packages.push(PathBuf::from("a.zip")))
        .boxed(),
      FakeStep::new("dmg", Script::Done, &log)
        .producing(&[ArtifactKind::Packages])
        .writing(|state| state.artifacts.packages = vec![PathBuf::from("b.dmg")])
        .boxed(),
    ];

    let err = run_stage("execution", &mut state(), &steps, &RecordingReporter::default()).unwrap_err();
    assert_eq!(
      err.to_string(),
      "dmg: pipeline contract violated: packages may only be appended to"
    );
  }

  #[test]
  fn test_failed_step_keeps_partial_writes() {
    let log = calls();
    let steps: Vec<Box<dyn Step>> = vec![
      FakeStep::new("build", Script::Fail("xcodebuild exited 65"), &log)
        .producing(&[ArtifactKind::AppBundle])
        .writing(|state| state.artifacts.app_bundle = Some(PathBuf::from("Example.app")))
        .boxed(),
    ];

    let mut state = state();
    assert!(run_stage("execution", &mut state, &steps, &RecordingReporter::default()).is_err());
    assert_eq!(state.artifacts.app_bundle, Some(PathBuf::from("Example.app")));
  }

  #[test]
  fn test_skip_that_writes_is_a_violation() {
    struct Sneaky;
    impl Step for Sneaky {
      fn name(&self) -> &str {
        "sneaky"
      }
      fn produces(&self) -> &[ArtifactKind] {
        &[ArtifactKind::Cask]
      }
      fn execute(&self, state: &mut RunState) -> StepResult {
        state.artifacts.cask = Some(PathBuf::from("x.rb"));
        skip("changed my mind")
      }
    }

    let steps: Vec<Box<dyn Step>> = vec![Box::new(Sneaky)];
    let err = run_stage("execution", &mut state(), &steps, &RecordingReporter::default()).unwrap_err();
    assert!(err.to_string().contains("skipped but still changed the cask file"));
  }
}
