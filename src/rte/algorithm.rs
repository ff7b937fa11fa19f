//! Algorithm hooks
//!
//! A concrete algorithm implements [`Algorithm`] and hands itself to an
//! [`AlgorithmRte`](super::AlgorithmRte). The runtime thread owns it from then on and calls
//! the hooks in step order; none of them is ever called concurrently.

use super::errors::{Interrupted, StepError};
use super::host::View;
use super::scheduler::RuntimeEnvironment;
use crate::exercise::Exercise;
use crate::state::{AlgorithmState, Attachments, StateError, StepId};
use std::sync::Arc;

/// Step logic and state capture of a visualized algorithm
pub trait Algorithm: Send + 'static {
    /// The step every run starts with
    fn first_step(&self) -> StepId;

    /// Execute one step and return the step that follows, or [`StepId::NONE`] when the
    /// algorithm is finished.
    ///
    /// Pacing sleeps go through [`StepContext::sleep`]; propagate its error with `?` so a
    /// stop request ends the step.
    fn execute_step(&mut self, step: StepId, ctx: &mut StepContext<'_>)
        -> Result<StepId, StepError>;

    /// Register the algorithm's variables in `state`
    fn store_state(&self, state: &mut AlgorithmState) -> Result<(), StateError>;

    /// Set the algorithm's variables from `state`
    fn restore_state(&mut self, state: &AlgorithmState);

    /// Fill the initial state. Called once when the runtime environment is created.
    fn create_initial_state(&mut self, state: &mut AlgorithmState) -> Result<(), StateError> {
        self.store_state(state)
    }

    /// Undo the visualization side effects of `step`, which was followed by `next_step`
    fn roll_back_step(&mut self, step: StepId, next_step: StepId);

    /// Continue from a learner-chosen state before `step` is executed
    fn adopt_state(&mut self, _step: StepId, _state: &AlgorithmState) {}

    /// Views whose repaints are suppressed while steps are skipped
    fn views(&self) -> Vec<Arc<dyn View>> {
        Vec::new()
    }

    fn supports_exercise_mode(&self) -> bool {
        false
    }

    /// Exercise asked before `step` in exercise mode
    fn exercise(&self, _step: StepId) -> Option<Arc<Exercise>> {
        None
    }

    /// Exercise asked after the last step in exercise mode
    fn final_exercise(&self) -> Option<Arc<Exercise>> {
        None
    }
}

/// Services available to a step while it executes
pub struct StepContext<'a> {
    env: &'a RuntimeEnvironment,
    attachments: &'a mut Attachments,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(env: &'a RuntimeEnvironment, attachments: &'a mut Attachments) -> Self {
        StepContext { env, attachments }
    }

    /// Pause the visualization for `millis`, scaled by the execution speed.
    ///
    /// Returns immediately while the step is skipped, and blocks while the run is paused.
    pub fn sleep(&self, millis: u64) -> Result<(), Interrupted> {
        self.env.sleep(millis)
    }

    /// Whether the rest of this step is being skipped
    pub fn is_skipping(&self) -> bool {
        self.env.is_skipping()
    }

    /// Scratch objects of this step, kept with its state in the history
    pub fn attachments(&mut self) -> &mut Attachments {
        self.attachments
    }

    pub fn plugin(&self) -> &str {
        self.env.plugin()
    }
}
