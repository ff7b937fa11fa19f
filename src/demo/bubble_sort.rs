// Bubble sort plugin

use crate::exercise::{Exercise, ExerciseLogic};
use crate::rte::{Algorithm, StepContext, StepError, View};
use crate::state::{AlgorithmState, StateError, StateValue, StepId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "bubble-sort";

// ========== Steps ==========

const INIT: StepId = StepId::new(0);
const COMPARE: StepId = StepId::new(1);
const SWAP: StepId = StepId::new(2);
const ADVANCE: StepId = StepId::new(3);
const DONE: StepId = StepId::new(4);

/// Pacing sleep after each visible change, in milliseconds at speed 1.0
const STEP_DELAY_MS: u64 = 400;

/// Human-readable name of a bubble sort step
pub fn step_name(step: StepId) -> &'static str {
    match step {
        INIT => "init",
        COMPARE => "compare",
        SWAP => "swap",
        ADVANCE => "advance",
        DONE => "done",
        _ => "-",
    }
}

// ========== View model ==========

/// What the array pane draws
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSnapshot {
    pub values: Vec<i64>,
    /// Pair of indices being compared or swapped
    pub highlight: Option<(usize, usize)>,
    /// Indices from here on are in their final position
    pub sorted_from: usize,
    pub swaps: i64,
}

#[derive(Default)]
struct ModelInner {
    latest: SortSnapshot,
    shown: SortSnapshot,
}

/// View model shared between the algorithm and the host's array pane.
///
/// While repaints are disabled updates are recorded but not shown; re-enabling shows the
/// latest one.
#[derive(Default)]
pub struct SortModel {
    inner: Mutex<ModelInner>,
    repaint_disabled: AtomicBool,
}

impl SortModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot to draw
    pub fn snapshot(&self) -> SortSnapshot {
        self.inner.lock().shown.clone()
    }

    pub fn is_repaint_disabled(&self) -> bool {
        self.repaint_disabled.load(Ordering::SeqCst)
    }

    fn publish(&self, snapshot: SortSnapshot) {
        let mut inner = self.inner.lock();
        if !self.is_repaint_disabled() {
            inner.shown = snapshot.clone();
        }
        inner.latest = snapshot;
    }
}

impl View for SortModel {
    fn set_repaint_disabled(&self, disabled: bool) {
        let mut inner = self.inner.lock();
        self.repaint_disabled.store(disabled, Ordering::SeqCst);
        if !disabled {
            inner.shown = inner.latest.clone();
        }
    }
}

// ========== Exercises ==========

/// "Will the two highlighted values be swapped?" answered with a boolean
struct SwapQuestion;

impl ExerciseLogic for SwapQuestion {
    fn examine(&self, solutions: &[StateValue], state: &AlgorithmState) -> bool {
        match (solutions.first().and_then(StateValue::as_bool), state.bool("swap")) {
            (Some(answer), Some(swap)) => answer == swap,
            _ => false,
        }
    }

    fn solution_to_string(&self, solutions: &[StateValue]) -> String {
        match solutions.first().and_then(StateValue::as_bool) {
            Some(true) => "yes".to_string(),
            Some(false) => "no".to_string(),
            None => "-".to_string(),
        }
    }
}

/// "How many swaps did the sort take?" answered with an integer
struct SwapCountQuestion;

impl ExerciseLogic for SwapCountQuestion {
    fn examine(&self, solutions: &[StateValue], state: &AlgorithmState) -> bool {
        match (solutions.first().and_then(StateValue::as_int), state.int("swaps")) {
            (Some(answer), Some(swaps)) => answer == swaps,
            _ => false,
        }
    }
}

// ========== Algorithm ==========

/// Bubble sort over a list of integers.
///
/// Steps: `init → compare → (swap) → advance → compare … → done`.
pub struct BubbleSort {
    values: Vec<i64>,
    /// Exclusive end of the unsorted prefix
    limit: usize,
    j: usize,
    swap: bool,
    swaps: i64,
    model: Arc<SortModel>,
    compare_exercise: Arc<Exercise>,
    final_exercise: Arc<Exercise>,
}

impl BubbleSort {
    pub fn new(values: Vec<i64>) -> Self {
        let limit = values.len();
        BubbleSort {
            values,
            limit,
            j: 0,
            swap: false,
            swaps: 0,
            model: Arc::new(SortModel::new()),
            compare_exercise: Arc::new(Exercise::new(
                "Will the two highlighted values be swapped?",
                1,
                SwapQuestion,
            )),
            final_exercise: Arc::new(Exercise::new(
                "How many swaps did the sort need?",
                3,
                SwapCountQuestion,
            )),
        }
    }

    /// View model to hand to the host
    pub fn model(&self) -> Arc<SortModel> {
        Arc::clone(&self.model)
    }

    fn publish(&self, highlight: Option<(usize, usize)>) {
        self.model.publish(SortSnapshot {
            values: self.values.clone(),
            highlight,
            sorted_from: self.limit,
            swaps: self.swaps,
        });
    }

    fn pair(&self) -> Option<(usize, usize)> {
        (self.j + 1 < self.values.len()).then_some((self.j, self.j + 1))
    }
}

impl Algorithm for BubbleSort {
    fn first_step(&self) -> StepId {
        INIT
    }

    fn execute_step(
        &mut self,
        step: StepId,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepId, StepError> {
        match step {
            INIT => {
                self.limit = self.values.len();
                self.j = 0;
                self.swap = false;
                self.swaps = 0;
                self.publish(None);
                ctx.sleep(STEP_DELAY_MS)?;
                Ok(if self.values.len() < 2 { DONE } else { COMPARE })
            }
            COMPARE => {
                let (a, b) = self
                    .pair()
                    .ok_or_else(|| StepError::msg(format!("no pair at index {}", self.j)))?;
                self.swap = self.values[a] > self.values[b];
                self.publish(Some((a, b)));
                ctx.sleep(STEP_DELAY_MS)?;
                Ok(if self.swap { SWAP } else { ADVANCE })
            }
            SWAP => {
                let (a, b) = self
                    .pair()
                    .ok_or_else(|| StepError::msg(format!("no pair at index {}", self.j)))?;
                self.values.swap(a, b);
                self.swaps += 1;
                self.publish(Some((a, b)));
                ctx.sleep(STEP_DELAY_MS)?;
                Ok(ADVANCE)
            }
            ADVANCE => {
                self.j += 1;
                if self.j + 1 >= self.limit {
                    self.limit -= 1;
                    self.j = 0;
                }
                self.swap = false;
                self.publish(None);
                Ok(if self.limit < 2 { DONE } else { COMPARE })
            }
            DONE => {
                self.limit = 0;
                self.publish(None);
                Ok(StepId::NONE)
            }
            _ => Err(StepError::msg(format!("unknown step {}", step))),
        }
    }

    fn store_state(&self, state: &mut AlgorithmState) -> Result<(), StateError> {
        state
            .add("values", self.values.clone())?
            .add("limit", self.limit)?
            .add("j", self.j)?
            .add("swap", self.swap)?
            .add("swaps", self.swaps)?;
        Ok(())
    }

    fn restore_state(&mut self, state: &AlgorithmState) {
        if let Some(values) = state.int_list("values") {
            self.values = values;
        }
        let index = |key: &str| state.int(key).map(|v| v.max(0) as usize);
        self.limit = index("limit").unwrap_or(self.values.len());
        self.j = index("j").unwrap_or(0);
        self.swap = state.bool("swap").unwrap_or(false);
        self.swaps = state.int("swaps").unwrap_or(0);
        self.publish(None);
    }

    fn roll_back_step(&mut self, step: StepId, _next_step: StepId) {
        // Only the comparison highlight outlives a step
        if step == COMPARE || step == SWAP {
            self.publish(None);
        }
    }

    fn views(&self) -> Vec<Arc<dyn View>> {
        vec![self.model() as Arc<dyn View>]
    }

    fn supports_exercise_mode(&self) -> bool {
        true
    }

    fn exercise(&self, step: StepId) -> Option<Arc<Exercise>> {
        (step == COMPARE).then(|| Arc::clone(&self.compare_exercise))
    }

    fn final_exercise(&self) -> Option<Arc<Exercise>> {
        Some(Arc::clone(&self.final_exercise))
    }
}
