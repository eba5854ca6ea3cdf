//! Progress reporting for stage runs

use crate::core::error::ShipError;
use std::time::Duration;

/// Receives the operator-facing story of a stage run
pub trait Reporter {
  fn stage_started(&self, stage: &str, steps: usize);
  fn step_started(&self, step: &str);
  fn step_finished(&self, step: &str, elapsed: Duration);
  fn step_skipped(&self, step: &str, reason: &str);
  fn step_failed(&self, step: &str, error: &ShipError);
}

/// Reporter that writes through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
  fn stage_started(&self, stage: &str, steps: usize) {
    tracing::info!("{} ({} steps)", stage, steps);
  }

  fn step_started(&self, step: &str) {
    tracing::info!("• {}", step);
  }

  fn step_finished(&self, step: &str, elapsed: Duration) {
    if elapsed >= Duration::from_secs(1) {
      tracing::info!("  {} took {:.1}s", step, elapsed.as_secs_f64());
    } else {
      tracing::debug!("  {} took {}ms", step, elapsed.as_millis());
    }
  }

  fn step_skipped(&self, step: &str, reason: &str) {
    tracing::info!("  {} skipped: {}", step, reason);
  }

  fn step_failed(&self, step: &str, error: &ShipError) {
    tracing::error!("  {} failed: {}", step, error);
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use super::*;
  use std::cell::RefCell;

  /// Keeps every event as a line, e.g. `start build`, `skip sign: no identity`
  #[derive(Default)]
  pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
  }

  impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
      self.events.borrow().clone()
    }
  }

  impl Reporter for RecordingReporter {
    fn stage_started(&self, stage: &str, steps: usize) {
      self.events.borrow_mut().push(format!("stage {} {}", stage, steps));
    }

    fn step_started(&self, step: &str) {
      self.events.borrow_mut().push(format!("start {}", step));
    }

    fn step_finished(&self, step: &str, _elapsed: Duration) {
      self.events.borrow_mut().push(format!("done {}", step));
    }

    fn step_skipped(&self, step: &str, reason: &str) {
      self.events.borrow_mut().push(format!("skip {}: {}", step, reason));
    }

    fn step_failed(&self, step: &str, error: &ShipError) {
      self.events.borrow_mut().push(format!("fail {}: {}", step, error));
    }
  }
}
