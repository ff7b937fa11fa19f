// Shared fixtures for the runtime environment tests

#![allow(dead_code)]

use algovis::exercise::{ExamResult, Exercise, ExerciseLogic, ExerciseProvider};
use algovis::gui::{self, GuiHandle};
use algovis::rte::{
    Algorithm, AlgorithmRte, RteConfig, RteEvent, RteListener, SinglePluginHost, StepContext,
    StepError, View,
};
use algovis::state::{AlgorithmState, StateError, StateValue, StepId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const PLUGIN: &str = "counter";

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub fn wait(condition: impl FnMut() -> bool) -> bool {
    wait_until(Duration::from_secs(5), condition)
}

// ========== Algorithm ==========

/// What the counting algorithm did, shared with the test after the algorithm moved away
#[derive(Default)]
pub struct Journal {
    pub executed: Mutex<Vec<i32>>,
    pub rollbacks: Mutex<Vec<(i32, i32)>>,
    pub restored: Mutex<Vec<i64>>,
    pub adopted: Mutex<Vec<i64>>,
}

impl Journal {
    pub fn executed(&self) -> Vec<i32> {
        self.executed.lock().clone()
    }

    pub fn rollbacks(&self) -> Vec<(i32, i32)> {
        self.rollbacks.lock().clone()
    }

    pub fn last_restored(&self) -> Option<i64> {
        self.restored.lock().last().copied()
    }
}

/// Steps `0..steps`, each adding one to `value`
pub struct Counter {
    pub steps: i32,
    pub value: i64,
    pub sleep_ms: u64,
    pub fail_at: Option<i32>,
    pub panic_at: Option<i32>,
    /// Panic when capturing a state whose value equals this
    pub store_panic_at: Option<i64>,
    pub exercises: bool,
    pub exercise: Option<(i32, Arc<Exercise>)>,
    pub final_exercise: Option<Arc<Exercise>>,
    pub views: Vec<Arc<dyn View>>,
    pub journal: Arc<Journal>,
}

impl Counter {
    pub fn new(steps: i32) -> Self {
        Counter {
            steps,
            value: 0,
            sleep_ms: 0,
            fail_at: None,
            panic_at: None,
            store_panic_at: None,
            exercises: false,
            exercise: None,
            final_exercise: None,
            views: Vec::new(),
            journal: Arc::new(Journal::default()),
        }
    }

    pub fn journal(&self) -> Arc<Journal> {
        Arc::clone(&self.journal)
    }
}

impl Algorithm for Counter {
    fn first_step(&self) -> StepId {
        StepId::new(0)
    }

    fn execute_step(
        &mut self,
        step: StepId,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepId, StepError> {
        self.journal.executed.lock().push(step.get());
        if self.fail_at == Some(step.get()) {
            return Err(StepError::msg("counter overflow"));
        }
        if self.panic_at == Some(step.get()) {
            panic!("counter exploded at {}", step);
        }
        if self.sleep_ms > 0 {
            ctx.sleep(self.sleep_ms)?;
        }
        self.value += 1;
        let next = step.get() + 1;
        Ok(if next < self.steps {
            StepId::new(next)
        } else {
            StepId::NONE
        })
    }

    fn store_state(&self, state: &mut AlgorithmState) -> Result<(), StateError> {
        if self.store_panic_at == Some(self.value) {
            panic!("cannot capture counter value {}", self.value);
        }
        state.add("value", self.value)?;
        Ok(())
    }

    fn restore_state(&mut self, state: &AlgorithmState) {
        self.value = state.int("value").unwrap_or(0);
        self.journal.restored.lock().push(self.value);
    }

    fn roll_back_step(&mut self, step: StepId, next_step: StepId) {
        self.journal
            .rollbacks
            .lock()
            .push((step.get(), next_step.get()));
    }

    fn adopt_state(&mut self, _step: StepId, state: &AlgorithmState) {
        if let Some(value) = state.int("value") {
            self.value = value;
            self.journal.adopted.lock().push(value);
        }
    }

    fn views(&self) -> Vec<Arc<dyn View>> {
        self.views.clone()
    }

    fn supports_exercise_mode(&self) -> bool {
        self.exercises
    }

    fn exercise(&self, step: StepId) -> Option<Arc<Exercise>> {
        match &self.exercise {
            Some((at, exercise)) if *at == step.get() => Some(Arc::clone(exercise)),
            _ => None,
        }
    }

    fn final_exercise(&self) -> Option<Arc<Exercise>> {
        self.final_exercise.clone()
    }
}

// ========== Exercises ==========

/// "What is the counter value after this step?"
#[derive(Default)]
pub struct ValueQuestion {
    pub requests: Arc<AtomicUsize>,
    pub after_requests: Arc<Mutex<Vec<bool>>>,
}

impl ExerciseLogic for ValueQuestion {
    fn examine(&self, solutions: &[StateValue], state: &AlgorithmState) -> bool {
        match (solutions.first().and_then(StateValue::as_int), state.int("value")) {
            (Some(answer), Some(value)) => answer == value,
            _ => false,
        }
    }

    fn before_request(&self, _state: &AlgorithmState) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn after_request(&self, omitted: bool) {
        self.after_requests.lock().push(omitted);
    }
}

/// "Which value should the counter continue from?" applied before the step runs
#[derive(Default)]
pub struct SetValueQuestion {
    pub requests: Arc<AtomicUsize>,
}

impl ExerciseLogic for SetValueQuestion {
    fn examine(&self, solutions: &[StateValue], _state: &AlgorithmState) -> bool {
        solutions
            .first()
            .and_then(StateValue::as_int)
            .is_some_and(|value| value >= 0)
    }

    fn before_request(&self, _state: &AlgorithmState) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn applies_solution_before_execution(&self) -> bool {
        true
    }

    fn apply_solution(&self, solutions: &[StateValue], state: &mut AlgorithmState) {
        if let Some(value) = solutions.first().and_then(StateValue::as_int) {
            let _ = state.add("value", value);
        }
    }
}

/// An exercise plus handles on its logic's counters
pub struct Question {
    pub exercise: Arc<Exercise>,
    pub requests: Arc<AtomicUsize>,
    pub after_requests: Arc<Mutex<Vec<bool>>>,
}

impl Question {
    pub fn new(text: &str) -> Self {
        let logic = ValueQuestion::default();
        let requests = Arc::clone(&logic.requests);
        let after_requests = Arc::clone(&logic.after_requests);
        Question {
            exercise: Arc::new(Exercise::new(text, 2, logic)),
            requests,
            after_requests,
        }
    }

    /// Wait until the learner is asked for the `n`th time
    pub fn wait_for_request(&self, n: usize) -> bool {
        wait(|| self.requests.load(Ordering::SeqCst) >= n)
    }
}

// ========== Observers ==========

/// Listener recording every callback by name
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<&'static str>>,
    pub veto: AtomicBool,
}

impl Recorder {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }

    pub fn saw(&self, name: &str) -> bool {
        self.events.lock().iter().any(|e| *e == name)
    }

    fn record(&self, name: &'static str) {
        self.events.lock().push(name);
    }
}

impl RteListener for Recorder {
    fn before_start(&self, event: &mut RteEvent) {
        self.record("before_start");
        if self.veto.load(Ordering::SeqCst) {
            event.doit = false;
        }
    }

    fn before_resume(&self, _event: &mut RteEvent) {
        self.record("before_resume");
    }

    fn before_pause(&self, _event: &mut RteEvent) {
        self.record("before_pause");
    }

    fn on_running(&self, _event: &RteEvent) {
        self.record("running");
    }

    fn on_pause(&self, _event: &RteEvent) {
        self.record("pause");
    }

    fn on_stop(&self, _event: &RteEvent) {
        self.record("stop");
    }
}

/// View recording every repaint hint it receives
#[derive(Default)]
pub struct RepaintLog {
    pub hints: Mutex<Vec<bool>>,
}

impl RepaintLog {
    pub fn hints(&self) -> Vec<bool> {
        self.hints.lock().clone()
    }
}

impl View for RepaintLog {
    fn set_repaint_disabled(&self, disabled: bool) {
        self.hints.lock().push(disabled);
    }
}

/// Exercise provider recording every callback
#[derive(Default)]
pub struct ProviderLog {
    pub calls: Mutex<Vec<String>>,
    pub results: Mutex<Vec<ExamResult>>,
    pub solved: Mutex<Vec<(bool, String)>>,
    pub visible: AtomicBool,
    pub owner: Mutex<Option<String>>,
}

impl ProviderLog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn results(&self) -> Vec<ExamResult> {
        self.results.lock().clone()
    }

    pub fn solved(&self) -> Vec<(bool, String)> {
        self.solved.lock().clone()
    }
}

impl ExerciseProvider for ProviderLog {
    fn begin_exam(&self) {
        self.calls.lock().push("begin_exam".to_string());
    }

    fn end_exam(&self, canceled: bool) {
        self.calls.lock().push(format!("end_exam({})", canceled));
    }

    fn before_processing_exercise(&self, _exercise: &Arc<Exercise>, step: Option<StepId>) {
        self.calls
            .lock()
            .push(format!("before_processing({:?})", step.map(StepId::get)));
    }

    fn after_processing_exercise(
        &self,
        _exercise: &Arc<Exercise>,
        result: ExamResult,
        _last_solution: &str,
    ) {
        self.results.lock().push(result);
    }

    fn after_solving_exercise(&self, _exercise: &Arc<Exercise>, succeeded: bool, solution: &str) {
        self.solved.lock().push((succeeded, solution.to_string()));
    }

    fn set_owner(&self, plugin: Option<&str>) {
        *self.owner.lock() = plugin.map(str::to_string);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

// ========== Runtime setup ==========

/// A runtime environment under test, with its observers
pub struct Harness {
    pub rte: AlgorithmRte,
    pub host: Arc<SinglePluginHost>,
    pub owner: Arc<Recorder>,
    pub journal: Arc<Journal>,
    pub gui: GuiHandle,
}

impl Harness {
    /// Wrap `counter` with no dwell time, so steps run back to back
    pub fn new(counter: Counter) -> Self {
        let config = RteConfig {
            min_step_dwell_time_ms: 0,
            ..RteConfig::default()
        };
        Self::with_config(counter, &config)
    }

    pub fn with_config(counter: Counter, config: &RteConfig) -> Self {
        let gui = gui::spawn("test-gui").expect("GUI thread");
        let host = Arc::new(SinglePluginHost::new(PLUGIN));
        let owner = Arc::new(Recorder::default());
        let journal = counter.journal();
        let rte = AlgorithmRte::with_config(
            PLUGIN,
            counter,
            owner.clone(),
            host.clone(),
            gui.clone(),
            config,
        )
        .expect("runtime environment");
        Harness {
            rte,
            host,
            owner,
            journal,
            gui,
        }
    }

    /// Wait for the current run to end and its thread to exit
    pub fn wait_stopped(&self) -> bool {
        let stopped = wait(|| !self.rte.is_started());
        self.rte.join();
        stopped
    }
}
