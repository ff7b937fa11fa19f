//! Exercises for exercise mode
//!
//! An [`Exercise`] is a question attached to a step (or to the end of the algorithm). While
//! exercise mode is active the runtime environment presents it and blocks until the learner
//! answers:
//!
//! ```text
//! enter ─► before_request ─► (learner: solve / give_up) ─► wake_up ─► after_request
//!   ─► examine ─► retry or exit
//! ```
//!
//! The exercise only talks back to the runtime through the narrow [`ExerciseController`]
//! capability, and to the learner-facing panel through the [`ExerciseProvider`].

pub mod provider;

use crate::gui::GuiHandle;
use crate::state::{AlgorithmState, StateValue, StepId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use provider::ExerciseProvider;

/// Outcome of examining a submitted solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamResult {
    Succeeded,
    Failed,
}

impl ExamResult {
    pub fn succeeded(self) -> bool {
        self == ExamResult::Succeeded
    }
}

impl From<bool> for ExamResult {
    fn from(correct: bool) -> Self {
        if correct {
            ExamResult::Succeeded
        } else {
            ExamResult::Failed
        }
    }
}

/// The capability an exercise uses to reach the runtime environment that processes it
pub trait ExerciseController: Send + Sync {
    /// Resume the runtime thread blocked on this exercise
    fn wake_up(&self);

    fn exercise_provider(&self) -> Option<Arc<dyn ExerciseProvider>>;

    /// Queue used to reach the provider on the GUI thread
    fn gui(&self) -> GuiHandle;
}

/// Algorithm-specific behavior of an exercise
pub trait ExerciseLogic: Send + Sync {
    /// Check a submitted solution against a state.
    ///
    /// The state is the one after the step ran, or the one before it when
    /// [`applies_solution_before_execution`](Self::applies_solution_before_execution) is set.
    fn examine(&self, solutions: &[StateValue], state: &AlgorithmState) -> bool;

    /// Called on the GUI thread before the learner is asked, with the state before the step
    fn before_request(&self, _state: &AlgorithmState) {}

    /// Called on the GUI thread once the learner answered or gave up
    fn after_request(&self, _omitted: bool) {}

    /// Whether a correct solution should be adopted by the algorithm before the step runs
    fn applies_solution_before_execution(&self) -> bool {
        false
    }

    /// Write a correct solution into a fresh state handed to `Algorithm::adopt_state`
    fn apply_solution(&self, _solutions: &[StateValue], _state: &mut AlgorithmState) {}

    /// Human-readable form of a solution
    fn solution_to_string(&self, solutions: &[StateValue]) -> String {
        solutions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Default)]
struct ExerciseInner {
    solutions: Option<Vec<StateValue>>,
    given_up: bool,
    processing: bool,
    last_solution: String,
    controller: Option<Arc<dyn ExerciseController>>,
}

/// A learner-facing question gating progression past a step
pub struct Exercise {
    text: String,
    credits: u32,
    logic: Box<dyn ExerciseLogic>,
    inner: Mutex<ExerciseInner>,
}

impl Exercise {
    pub fn new(text: impl Into<String>, credits: u32, logic: impl ExerciseLogic + 'static) -> Self {
        Exercise {
            text: text.into(),
            credits,
            logic: Box::new(logic),
            inner: Mutex::new(ExerciseInner::default()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn logic(&self) -> &dyn ExerciseLogic {
        self.logic.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.lock().processing
    }

    pub fn is_given_up(&self) -> bool {
        self.inner.lock().given_up
    }

    /// The currently submitted solution, if any
    pub fn solutions(&self) -> Option<Vec<StateValue>> {
        self.inner.lock().solutions.clone()
    }

    /// Human-readable form of the most recent submission
    pub fn last_solution(&self) -> String {
        self.inner.lock().last_solution.clone()
    }

    /// Whether the learner answered or gave up since the last reset
    pub fn has_submission(&self) -> bool {
        let inner = self.inner.lock();
        inner.given_up || inner.solutions.is_some()
    }

    /// Whether the learner skipped the question
    pub fn is_omitted(&self) -> bool {
        let inner = self.inner.lock();
        inner.given_up || inner.solutions.is_none()
    }

    /// Start processing under `controller`.
    ///
    /// Returns `false` without side effects if the exercise is already being processed.
    pub fn enter(
        self: &Arc<Self>,
        controller: Arc<dyn ExerciseController>,
        step: Option<StepId>,
    ) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.processing {
                return false;
            }
            inner.processing = true;
            inner.given_up = false;
            inner.solutions = None;
            inner.controller = Some(Arc::clone(&controller));
        }
        debug!("Entering exercise '{}' at step {:?}", self.text, step);

        if let Some(provider) = controller.exercise_provider() {
            let exercise = Arc::clone(self);
            let notified = controller.gui().invoke_and_wait(move || {
                if !provider.is_visible() {
                    provider.set_visible(true);
                }
                provider.before_processing_exercise(&exercise, step);
            });
            if let Err(e) = notified {
                warn!("Exercise provider not notified: {}", e);
            }
        }
        true
    }

    /// Submit a solution. Ignored unless the exercise is being processed.
    pub fn solve(&self, solutions: Vec<StateValue>) -> bool {
        let controller = {
            let mut inner = self.inner.lock();
            if !inner.processing || inner.given_up {
                return false;
            }
            inner.last_solution = self.logic.solution_to_string(&solutions);
            inner.solutions = Some(solutions);
            inner.controller.clone()
        };
        if let Some(controller) = controller {
            controller.wake_up();
        }
        true
    }

    /// Skip the question. Ignored unless the exercise is being processed.
    pub fn give_up(&self) -> bool {
        let controller = {
            let mut inner = self.inner.lock();
            if !inner.processing {
                return false;
            }
            inner.given_up = true;
            inner.solutions = None;
            inner.controller.clone()
        };
        if let Some(controller) = controller {
            controller.wake_up();
        }
        true
    }

    /// Examine the current submission against `state`. An omitted exercise always fails.
    pub fn examine(&self, state: &AlgorithmState) -> ExamResult {
        let solutions = {
            let inner = self.inner.lock();
            if inner.given_up {
                return ExamResult::Failed;
            }
            match inner.solutions.clone() {
                Some(solutions) => solutions,
                None => return ExamResult::Failed,
            }
        };
        ExamResult::from(self.logic.examine(&solutions, state))
    }

    /// Write the current submission into `state` for adoption by the algorithm
    pub(crate) fn transfer_solution(&self, state: &mut AlgorithmState) {
        if let Some(solutions) = self.solutions() {
            self.logic.apply_solution(&solutions, state);
        }
    }

    /// Drop a rejected submission so the learner can try again
    pub(crate) fn reset_solution(&self) {
        self.inner.lock().solutions = None;
    }

    /// Stop processing and report `result` to the provider
    pub fn exit(self: &Arc<Self>, result: ExamResult) {
        let (controller, last_solution) = {
            let mut inner = self.inner.lock();
            if !inner.processing {
                return;
            }
            inner.processing = false;
            inner.solutions = None;
            (inner.controller.take(), inner.last_solution.clone())
        };
        debug!("Leaving exercise '{}' with {:?}", self.text, result);

        let Some(controller) = controller else {
            return;
        };
        if let Some(provider) = controller.exercise_provider() {
            let exercise = Arc::clone(self);
            let notified = controller.gui().invoke_and_wait(move || {
                provider.after_processing_exercise(&exercise, result, &last_solution)
            });
            if let Err(e) = notified {
                warn!("Exercise provider not notified: {}", e);
            }
        }
    }
}

impl fmt::Debug for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Exercise")
            .field("text", &self.text)
            .field("credits", &self.credits)
            .field("processing", &inner.processing)
            .field("given_up", &inner.given_up)
            .field("solutions", &inner.solutions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Equals(i64);

    impl ExerciseLogic for Equals {
        fn examine(&self, solutions: &[StateValue], _state: &AlgorithmState) -> bool {
            solutions.first().and_then(StateValue::as_int) == Some(self.0)
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        before: AtomicUsize,
        after: AtomicUsize,
        visible: parking_lot::Mutex<bool>,
    }

    impl ExerciseProvider for CountingProvider {
        fn begin_exam(&self) {}
        fn end_exam(&self, _canceled: bool) {}
        fn before_processing_exercise(&self, _exercise: &Arc<Exercise>, _step: Option<StepId>) {
            self.before.fetch_add(1, Ordering::SeqCst);
        }
        fn after_processing_exercise(
            &self,
            _exercise: &Arc<Exercise>,
            _result: ExamResult,
            _last_solution: &str,
        ) {
            self.after.fetch_add(1, Ordering::SeqCst);
        }
        fn after_solving_exercise(&self, _e: &Arc<Exercise>, _succeeded: bool, _solution: &str) {}
        fn set_owner(&self, _plugin: Option<&str>) {}
        fn is_visible(&self) -> bool {
            *self.visible.lock()
        }
        fn set_visible(&self, visible: bool) {
            *self.visible.lock() = visible;
        }
    }

    struct TestController {
        provider: Arc<CountingProvider>,
        gui: GuiHandle,
        wakeups: AtomicUsize,
    }

    impl ExerciseController for TestController {
        fn wake_up(&self) {
            self.wakeups.fetch_add(1, Ordering::SeqCst);
        }
        fn exercise_provider(&self) -> Option<Arc<dyn ExerciseProvider>> {
            Some(self.provider.clone())
        }
        fn gui(&self) -> GuiHandle {
            self.gui.clone()
        }
    }

    fn controller() -> Arc<TestController> {
        Arc::new(TestController {
            provider: Arc::new(CountingProvider::default()),
            gui: gui::spawn("exercise-test-gui").unwrap(),
            wakeups: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_enter_twice_is_noop() {
        let exercise = Arc::new(Exercise::new("What is x?", 2, Equals(4)));
        let ctrl = controller();

        assert!(exercise.enter(ctrl.clone(), Some(StepId::new(1))));
        assert!(!exercise.enter(ctrl.clone(), Some(StepId::new(1))));
        assert_eq!(ctrl.provider.before.load(Ordering::SeqCst), 1);
        assert!(ctrl.provider.is_visible());

        exercise.exit(ExamResult::Failed);
        exercise.exit(ExamResult::Failed);
        assert_eq!(ctrl.provider.after.load(Ordering::SeqCst), 1);
        assert!(!exercise.is_processing());
    }

    #[test]
    fn test_solve_requires_processing() {
        let exercise = Arc::new(Exercise::new("What is x?", 1, Equals(4)));
        assert!(!exercise.solve(vec![StateValue::Int(4)]));
        assert!(!exercise.give_up());

        let ctrl = controller();
        exercise.enter(ctrl.clone(), None);
        assert!(exercise.solve(vec![StateValue::Int(4)]));
        assert_eq!(ctrl.wakeups.load(Ordering::SeqCst), 1);
        assert_eq!(exercise.last_solution(), "4");

        let state = AlgorithmState::new("test", StepId::NONE);
        assert_eq!(exercise.examine(&state), ExamResult::Succeeded);

        exercise.exit(ExamResult::Succeeded);
        assert_eq!(exercise.solutions(), None);
    }

    #[test]
    fn test_given_up_exercise_fails() {
        let exercise = Arc::new(Exercise::new("What is x?", 1, Equals(4)));
        let ctrl = controller();
        exercise.enter(ctrl.clone(), None);

        exercise.solve(vec![StateValue::Int(4)]);
        assert!(exercise.give_up());
        assert!(exercise.is_omitted());
        assert_eq!(exercise.solutions(), None);
        assert!(!exercise.solve(vec![StateValue::Int(4)]));

        let state = AlgorithmState::new("test", StepId::NONE);
        assert_eq!(exercise.examine(&state), ExamResult::Failed);
        assert_eq!(ctrl.wakeups.load(Ordering::SeqCst), 2);
    }
}
