//! Exercise provider contract
//!
//! The provider is the learner-facing side of exercise mode, typically a panel of the host
//! application. Every method is invoked on the GUI thread.

use super::{ExamResult, Exercise};
use crate::state::StepId;
use std::sync::Arc;

/// Receives exercise lifecycle callbacks on the GUI thread
pub trait ExerciseProvider: Send + Sync {
    /// A run in exercise mode started
    fn begin_exam(&self);

    /// A run in exercise mode ended; `canceled` is true if it was stopped early
    fn end_exam(&self, canceled: bool);

    /// An exercise is about to be presented. `step` is `None` for a final exercise.
    fn before_processing_exercise(&self, exercise: &Arc<Exercise>, step: Option<StepId>);

    /// Processing of an exercise finished with `result`
    fn after_processing_exercise(
        &self,
        exercise: &Arc<Exercise>,
        result: ExamResult,
        last_solution: &str,
    );

    /// One submitted solution was examined
    fn after_solving_exercise(&self, exercise: &Arc<Exercise>, succeeded: bool, solution: &str);

    /// Bind the provider to the plugin whose exercises it presents, or unbind it
    fn set_owner(&self, plugin: Option<&str>);

    fn is_visible(&self) -> bool;

    fn set_visible(&self, visible: bool);
}
