//! Two-stage release pipeline
//!
//! A [`Pipeline`] is an explicit value holding two ordered [`Stage`]s:
//!
//! - **validation**: one check per concern, reads config and toggles only
//! - **execution**: the same concerns, now producing and consuming artifacts
//!
//! Execution is only reachable through the [`Validated`] token returned by a
//! successful validation run, so no build, signing or publishing side effect can
//! happen while any declared configuration is invalid.
//!
//! # Example
//!
//! ```rust,ignore
//! let pipeline = Pipeline::release();
//! let reporter = TracingReporter;
//!
//! // check command
//! pipeline.run_validation(&mut state, &reporter)?;
//!
//! // build / release / snapshot
//! pipeline.run_all(&mut state, &reporter)?;
//! ```

mod reporter;
mod stage;
mod step;

pub use reporter::{Reporter, TracingReporter};
pub use stage::{Stage, run_stage};
pub use step::{Step, StepOutcome, StepResult, skip};

use crate::core::context::RunState;
use crate::core::error::ShipResult;

/// Validation stage followed by execution stage
pub struct Pipeline {
  validation: Stage,
  execution: Stage,
}

/// Proof that the validation stage passed for this pipeline
#[must_use = "execution only happens through Validated::run_execution"]
pub struct Validated<'p> {
  pipeline: &'p Pipeline,
}

impl Pipeline {
  pub fn new(validation: Vec<Box<dyn Step>>, execution: Vec<Box<dyn Step>>) -> Self {
    Self {
      validation: Stage::new("validation", validation),
      execution: Stage::new("execution", execution),
    }
  }

  /// The standard release pipeline.
  ///
  /// Execution order is a dependency chain: build, sign, notarize, package,
  /// changelog, publish, distribute. Later steps read artifacts written by
  /// earlier ones, so reordering is a correctness change.
  pub fn release() -> Self {
    Self::new(crate::checks::validation_steps(), crate::steps::execution_steps())
  }

  pub fn validation(&self) -> &Stage {
    &self.validation
  }

  pub fn execution(&self) -> &Stage {
    &self.execution
  }

  /// Run every validation check; the token unlocks execution
  pub fn run_validation(&self, state: &mut RunState, reporter: &dyn Reporter) -> ShipResult<Validated<'_>> {
    self.validation.run(state, reporter)?;
    Ok(Validated { pipeline: self })
  }

  /// Validation, then execution. Execution never starts if validation fails.
  pub fn run_all(&self, state: &mut RunState, reporter: &dyn Reporter) -> ShipResult<()> {
    self.run_validation(state, reporter)?.run_execution(state, reporter)
  }
}

impl Validated<'_> {
  pub fn run_execution(self, state: &mut RunState, reporter: &dyn Reporter) -> ShipResult<()> {
    self.pipeline.execution.run(state, reporter)
  }
}
