//! GUI-side observers of the runtime environment
//!
//! Both types are called on the GUI thread only (the TUI's main loop pumps the GUI queue),
//! and both keep plain data the panes render from.

use crate::exercise::{ExamResult, Exercise, ExerciseProvider};
use crate::rte::{RteEvent, RteListener};
use crate::state::StepId;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lifecycle state shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// The plugin's own runtime listener
#[derive(Debug, Default)]
pub struct RunStatus {
    state: Mutex<RunState>,
    finished_runs: Mutex<usize>,
}

impl RunStatus {
    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    pub fn finished_runs(&self) -> usize {
        *self.finished_runs.lock()
    }
}

impl RteListener for RunStatus {
    fn on_running(&self, _event: &RteEvent) {
        *self.state.lock() = RunState::Running;
    }

    fn on_pause(&self, _event: &RteEvent) {
        *self.state.lock() = RunState::Paused;
    }

    fn on_stop(&self, _event: &RteEvent) {
        *self.state.lock() = RunState::Stopped;
        *self.finished_runs.lock() += 1;
    }
}

/// Data the exercise pane renders
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    pub visible: bool,
    pub owner: Option<String>,
    pub exam_active: bool,
    pub question: Option<String>,
    /// Last examined answer and whether it was right
    pub feedback: Option<(bool, String)>,
    pub credits_earned: u32,
    pub credits_total: u32,
    pub log: Vec<String>,
}

#[derive(Default)]
struct PanelState {
    view: PanelView,
    current: Option<Arc<Exercise>>,
}

/// Exercise panel of the TUI
#[derive(Default)]
pub struct ExercisePanel {
    state: Mutex<PanelState>,
}

impl ExercisePanel {
    /// The exercise waiting for an answer, if any
    pub fn current(&self) -> Option<Arc<Exercise>> {
        self.state.lock().current.clone()
    }

    pub fn view(&self) -> PanelView {
        self.state.lock().view.clone()
    }
}

impl ExerciseProvider for ExercisePanel {
    fn begin_exam(&self) {
        let mut state = self.state.lock();
        state.view.exam_active = true;
        state.view.credits_earned = 0;
        state.view.credits_total = 0;
        state.view.log.clear();
    }

    fn end_exam(&self, canceled: bool) {
        let mut state = self.state.lock();
        state.view.exam_active = false;
        state.current = None;
        state.view.question = None;
        let line = if canceled {
            "Exam canceled".to_string()
        } else {
            format!(
                "Exam finished: {}/{} credits",
                state.view.credits_earned, state.view.credits_total
            )
        };
        state.view.log.push(line);
    }

    fn before_processing_exercise(&self, exercise: &Arc<Exercise>, _step: Option<StepId>) {
        let mut state = self.state.lock();
        state.current = Some(Arc::clone(exercise));
        state.view.question = Some(exercise.text().to_string());
        state.view.feedback = None;
    }

    fn after_processing_exercise(
        &self,
        exercise: &Arc<Exercise>,
        result: ExamResult,
        last_solution: &str,
    ) {
        let mut state = self.state.lock();
        state.current = None;
        state.view.question = None;
        state.view.credits_total += exercise.credits();
        if result.succeeded() {
            state.view.credits_earned += exercise.credits();
        }
        let answer = if exercise.is_given_up() {
            "given up"
        } else {
            last_solution
        };
        state.view.log.push(format!(
            "{} [{}] {:?}",
            exercise.text(),
            answer,
            result
        ));
    }

    fn after_solving_exercise(&self, _exercise: &Arc<Exercise>, succeeded: bool, solution: &str) {
        self.state.lock().view.feedback = Some((succeeded, solution.to_string()));
    }

    fn set_owner(&self, plugin: Option<&str>) {
        self.state.lock().view.owner = plugin.map(str::to_string);
    }

    fn is_visible(&self) -> bool {
        self.state.lock().view.visible
    }

    fn set_visible(&self, visible: bool) {
        self.state.lock().view.visible = visible;
    }
}
