// Step scheduler of the runtime environment

use super::algorithm::{Algorithm, StepContext};
use super::config::{validate_dwell_time, validate_speed_factor, RteConfig};
use super::errors::{Interrupted, RteError, StepError};
use super::events::{EventBus, Notification, RteListener};
use super::host::{Host, View};
use crate::exercise::{ExamResult, Exercise, ExerciseController, ExerciseProvider};
use crate::gui::{panic_message, GuiHandle};
use crate::state::{AlgorithmState, StateHistory, StepId};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use rustc_hash::FxHashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How a run proceeds after `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartOption {
    /// Run continuously at the configured speed
    #[default]
    Normal,
    /// Pause before every step after the first one
    PlayAndPause,
    /// Skip all pacing until the end
    RunToFinish,
}

/// Control block guarded by the scheduler monitor
struct Control {
    started: bool,
    paused: bool,
    /// `on_pause` was delivered for the current pause
    pause_announced: bool,
    skip_curr_step: bool,
    go_step_back: bool,
    terminating: bool,
    interrupted: bool,
    exercise_mode: bool,
    start_option: StartOption,
    executing_step: StepId,
    history: StateHistory,
    /// Reciprocal of the execution speed factor
    sleep_factor: f64,
    min_dwell: Duration,
    skip_breakpoints: bool,
    pause_before_stop: bool,
    breakpoints: FxHashSet<StepId>,
}

/// Runs an algorithm step by step on a dedicated thread
///
/// The scheduler owns the step cursor, the state history and every control flag. All of
/// them live in one control block guarded by a single monitor; the runtime thread waits on
/// it while paced, paused or blocked on an exercise, and every control operation notifies
/// it.
pub struct RuntimeEnvironment {
    plugin: String,
    control: Mutex<Control>,
    monitor: Condvar,
    /// Locked by the runtime thread for the whole run
    algorithm: Mutex<Box<dyn Algorithm>>,
    /// Frozen once at construction, never pushed onto the history
    initial_state: Mutex<AlgorithmState>,
    views: RwLock<Vec<Arc<dyn View>>>,
    provider: RwLock<Option<Arc<dyn ExerciseProvider>>>,
    pub(crate) events: EventBus,
    gui: GuiHandle,
    host: Arc<dyn Host>,
    this: Weak<RuntimeEnvironment>,
}

impl RuntimeEnvironment {
    pub(crate) fn new(
        plugin: &str,
        mut algorithm: Box<dyn Algorithm>,
        owner: Arc<dyn RteListener>,
        host: Arc<dyn Host>,
        gui: GuiHandle,
        config: &RteConfig,
    ) -> Arc<Self> {
        let mut initial = AlgorithmState::new(plugin, StepId::NONE);
        if let Err(e) = algorithm.create_initial_state(&mut initial) {
            warn!("Initial state of {} is incomplete: {}", plugin, e);
        }
        initial.freeze();

        let control = Control {
            started: false,
            paused: false,
            pause_announced: false,
            skip_curr_step: false,
            go_step_back: false,
            terminating: false,
            interrupted: false,
            exercise_mode: false,
            start_option: StartOption::Normal,
            executing_step: StepId::NONE,
            history: StateHistory::new(),
            sleep_factor: 1.0 / config.execution_speed_factor as f64,
            min_dwell: Duration::from_millis(config.min_step_dwell_time_ms.max(0) as u64),
            skip_breakpoints: config.skip_breakpoints,
            pause_before_stop: config.pause_before_stop,
            breakpoints: FxHashSet::default(),
        };

        Arc::new_cyclic(|this| RuntimeEnvironment {
            plugin: plugin.to_string(),
            control: Mutex::new(control),
            monitor: Condvar::new(),
            algorithm: Mutex::new(algorithm),
            initial_state: Mutex::new(initial),
            views: RwLock::new(Vec::new()),
            provider: RwLock::new(None),
            events: EventBus::new(plugin, gui.clone(), owner),
            gui,
            host,
            this: this.clone(),
        })
    }

    // ========== State queries ==========

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn is_started(&self) -> bool {
        self.control.lock().started
    }

    pub fn is_paused(&self) -> bool {
        let c = self.control.lock();
        c.started && c.paused
    }

    pub fn is_exercise_mode_enabled(&self) -> bool {
        self.control.lock().exercise_mode
    }

    pub fn is_skipping(&self) -> bool {
        self.control.lock().skip_curr_step
    }

    /// Step currently executing, or [`StepId::NONE`] outside a run
    pub fn executing_step(&self) -> StepId {
        self.control.lock().executing_step
    }

    pub fn history_len(&self) -> usize {
        self.control.lock().history.len()
    }

    pub fn execution_speed_factor(&self) -> f32 {
        (1.0 / self.control.lock().sleep_factor) as f32
    }

    pub fn min_step_dwell_time(&self) -> Duration {
        self.control.lock().min_dwell
    }

    pub fn is_breakpoint(&self, step: StepId) -> bool {
        self.control.lock().breakpoints.contains(&step)
    }

    pub fn pauses_before_stop(&self) -> bool {
        self.control.lock().pause_before_stop
    }

    fn is_terminating(&self) -> bool {
        self.control.lock().terminating
    }

    // ========== Configuration ==========

    pub(crate) fn set_execution_speed_factor(&self, factor: f32) -> Result<(), RteError> {
        validate_speed_factor(factor)?;
        self.control.lock().sleep_factor = 1.0 / factor as f64;
        Ok(())
    }

    pub(crate) fn set_min_step_dwell_time(&self, millis: i64) -> Result<(), RteError> {
        validate_dwell_time(millis)?;
        self.control.lock().min_dwell = Duration::from_millis(millis as u64);
        Ok(())
    }

    pub(crate) fn set_skip_breakpoints(&self, skip: bool) {
        self.control.lock().skip_breakpoints = skip;
    }

    pub(crate) fn set_pause_before_stop(&self, pause: bool) {
        self.control.lock().pause_before_stop = pause;
    }

    pub(crate) fn set_breakpoint(&self, step: StepId, enabled: bool) {
        let mut c = self.control.lock();
        if enabled {
            c.breakpoints.insert(step);
        } else {
            c.breakpoints.remove(&step);
        }
    }

    pub(crate) fn set_exercise_provider(&self, provider: Option<Arc<dyn ExerciseProvider>>) {
        *self.provider.write() = provider;
    }

    /// Switch exercise mode. Returns whether the mode changed.
    pub(crate) fn set_exercise_mode_enabled(&self, enabled: bool) -> Result<bool, RteError> {
        {
            let mut c = self.control.lock();
            if c.started {
                return Err(RteError::AlreadyStarted);
            }
            if c.exercise_mode == enabled {
                return Ok(false);
            }
            c.exercise_mode = enabled;
        }
        info!(
            "Exercise mode of {} {}",
            self.plugin,
            if enabled { "enabled" } else { "disabled" }
        );

        let provider = self.exercise_provider();
        let host = Arc::clone(&self.host);
        let plugin = self.plugin.clone();
        self.on_gui(move || {
            if let Some(provider) = provider {
                provider.set_owner(enabled.then_some(plugin.as_str()));
                provider.set_visible(enabled);
            }
            host.exercise_mode_changed(&plugin, enabled);
        });
        Ok(true)
    }

    // ========== Control operations ==========

    /// Prepare a new run. No-op if already started.
    pub(crate) fn restart(&self, option: StartOption) -> bool {
        let mut c = self.control.lock();
        if c.started {
            return false;
        }
        c.started = true;
        c.paused = false;
        c.pause_announced = false;
        c.skip_curr_step = false;
        c.go_step_back = false;
        c.terminating = false;
        c.interrupted = false;
        c.start_option = option;
        c.executing_step = StepId::NONE;
        c.history.clear();
        true
    }

    /// Leave a pause. No-op if not started or in exercise mode.
    pub(crate) fn resume(&self, option: StartOption) -> bool {
        let mut c = self.control.lock();
        if !c.started || c.exercise_mode {
            return false;
        }
        c.paused = false;
        c.start_option = option;
        self.monitor.notify_all();
        true
    }

    /// Request a pause at the next checkpoint. No-op in exercise mode.
    pub(crate) fn pause(&self) -> bool {
        let mut c = self.control.lock();
        if !c.started || c.exercise_mode || c.paused {
            return false;
        }
        c.paused = true;
        true
    }

    /// Finish the current step without further pacing or pausing
    pub(crate) fn skip_step(&self) -> bool {
        if self.control.lock().exercise_mode {
            return false;
        }
        self.set_skip(true);
        true
    }

    /// Undo the current step once it has finished
    pub(crate) fn go_step_back(&self) -> bool {
        {
            let mut c = self.control.lock();
            if !c.started || c.exercise_mode {
                return false;
            }
            c.go_step_back = true;
        }
        self.skip_step()
    }

    /// Ask the runtime thread to stop
    pub(crate) fn interrupt(&self) -> bool {
        let mut c = self.control.lock();
        if !c.started {
            return false;
        }
        c.interrupted = true;
        self.monitor.notify_all();
        true
    }

    /// Pacing sleep of the running step, scaled by the execution speed
    pub fn sleep(&self, millis: u64) -> Result<(), Interrupted> {
        let factor = self.control.lock().sleep_factor;
        self.wait_for(Duration::from_secs_f64(millis as f64 * factor / 1000.0))
    }

    // ========== Runtime thread ==========

    /// Body of the runtime thread: one complete run.
    ///
    /// A panic in any algorithm hook ends the run like a failed step.
    pub(crate) fn run(self: Arc<Self>) {
        let exercise_mode = self.control.lock().exercise_mode;
        if exercise_mode {
            self.with_provider(|provider| provider.begin_exam());
        }

        let outcome = {
            let mut guard = self.algorithm.lock();
            let algorithm: &mut dyn Algorithm = &mut **guard;
            panic::catch_unwind(AssertUnwindSafe(|| self.run_algorithm(algorithm, exercise_mode)))
        };
        if let Err(payload) = outcome {
            error!(
                "Runtime environment of {} panicked: {}",
                self.plugin,
                panic_message(payload.as_ref())
            );
            self.control.lock().terminating = true;
        }

        self.finish(exercise_mode);
    }

    fn run_algorithm(&self, algorithm: &mut dyn Algorithm, exercise_mode: bool) {
        {
            let mut initial = self.initial_state.lock();
            initial.unfreeze();
            algorithm.restore_state(&initial);
        }
        *self.views.write() = algorithm.views();

        info!("Runtime environment of {} started", self.plugin);
        self.events.notify(Notification::Running);

        let mut step = algorithm.first_step();
        loop {
            let last = match self.execute_steps(algorithm, step) {
                Ok(last) => last,
                Err(Interrupted) => break,
            };
            if self.is_terminating() {
                break;
            }
            if exercise_mode {
                if let Some(exercise) = algorithm.final_exercise() {
                    if self.process_exercise(algorithm, None, &exercise).is_err() {
                        debug!("Final exercise of {} interrupted", self.plugin);
                    }
                }
                break;
            }
            if !self.pauses_before_stop() {
                break;
            }
            self.pause_now();
            if self.check_pause().is_err() || !self.take_step_back() {
                break;
            }
            step = self.step_back(algorithm, last, StepId::NONE);
        }
    }

    /// Execute steps from `start` until the algorithm ends; returns the last executed step
    fn execute_steps(
        &self,
        algorithm: &mut dyn Algorithm,
        start: StepId,
    ) -> Result<StepId, Interrupted> {
        let mut step = start;
        let mut last = StepId::NONE;
        let mut first = true;

        while step.is_valid() {
            let mut pre_state = AlgorithmState::new(&self.plugin, step);
            if let Err(e) = algorithm.store_state(&mut pre_state) {
                warn!("State before step {} of {} is incomplete: {}", step, self.plugin, e);
            }
            pre_state.freeze();

            let (breakpoint, option, exercise_mode) = {
                let mut c = self.control.lock();
                if c.interrupted || c.terminating {
                    return Err(self.on_interrupt(c));
                }
                c.executing_step = step;
                c.history.push(pre_state);
                (
                    !c.exercise_mode && !c.skip_breakpoints && c.breakpoints.contains(&step),
                    c.start_option,
                    c.exercise_mode,
                )
            };

            if breakpoint {
                debug!("Breakpoint at step {} of {}", step, self.plugin);
                self.pause_now();
            }
            if option == StartOption::PlayAndPause && !first && !exercise_mode {
                self.pause_now();
            }
            self.check_pause()?;
            if option == StartOption::RunToFinish {
                self.set_skip(true);
            }

            let exercise = if exercise_mode {
                algorithm.exercise(step)
            } else {
                None
            };
            let next = match exercise {
                Some(exercise) => self.process_exercise(algorithm, Some(step), &exercise),
                None => self.execute_paced(algorithm, step),
            };
            self.set_skip(false);
            let next = next?;
            first = false;
            last = step;

            if !next.is_valid() || self.is_terminating() {
                break;
            }
            self.check_pause()?;
            step = if self.take_step_back() {
                self.step_back(algorithm, step, next)
            } else {
                next
            };
        }
        Ok(last)
    }

    /// Execute a step and hold it until the minimum dwell time elapsed
    fn execute_paced(
        &self,
        algorithm: &mut dyn Algorithm,
        step: StepId,
    ) -> Result<StepId, Interrupted> {
        let started = Instant::now();
        let next = self.execute(algorithm, step)?;
        let dwell = self.control.lock().min_dwell;
        if let Some(remaining) = dwell.checked_sub(started.elapsed()) {
            if !remaining.is_zero() {
                self.wait_for(remaining)?;
            }
        }
        Ok(next)
    }

    /// Call the execution hook. Failures are logged and end the run.
    fn execute(&self, algorithm: &mut dyn Algorithm, step: StepId) -> Result<StepId, Interrupted> {
        let mut attachments = self
            .control
            .lock()
            .history
            .top_mut()
            .filter(|state| state.step() == step)
            .map(AlgorithmState::take_attachments)
            .unwrap_or_default();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut ctx = StepContext::new(self, &mut attachments);
            algorithm.execute_step(step, &mut ctx)
        }));

        if let Some(top) = self
            .control
            .lock()
            .history
            .top_mut()
            .filter(|state| state.step() == step)
        {
            top.set_attachments(attachments);
        }

        match result {
            Ok(Ok(next)) => Ok(next),
            Ok(Err(StepError::Interrupted)) => {
                self.control.lock().terminating = true;
                Err(Interrupted)
            }
            Ok(Err(StepError::Failed(e))) => {
                error!("Step {} of {} failed: {:#}", step, self.plugin, e);
                self.control.lock().terminating = true;
                Ok(StepId::NONE)
            }
            Err(payload) => {
                error!(
                    "Step {} of {} panicked: {}",
                    step,
                    self.plugin,
                    panic_message(payload.as_ref())
                );
                self.control.lock().terminating = true;
                Ok(StepId::NONE)
            }
        }
    }

    /// Pop states back to the predecessor of `current` and restore it.
    ///
    /// Every popped step is rolled back, newest first, together with the step that
    /// followed it. Returns the step to continue from.
    fn step_back(&self, algorithm: &mut dyn Algorithm, current: StepId, next: StepId) -> StepId {
        let mut following = next;
        loop {
            let (popped, remaining) = {
                let mut c = self.control.lock();
                let popped = c.history.pop();
                (popped, c.history.len())
            };
            let Some(mut state) = popped else {
                let mut initial = self.initial_state.lock();
                initial.unfreeze();
                algorithm.restore_state(&initial);
                return algorithm.first_step();
            };

            let undone = state.step();
            algorithm.roll_back_step(undone, following);
            following = undone;

            if undone != current || remaining == 0 {
                state.unfreeze();
                algorithm.restore_state(&state);
                debug!("{} stepped back to step {}", self.plugin, undone);
                return undone;
            }
        }
    }

    /// Clear the per-run state and report the stop
    fn finish(&self, exercise_mode: bool) {
        let canceled = {
            let mut c = self.control.lock();
            let canceled = c.terminating || c.interrupted;
            c.paused = false;
            c.pause_announced = false;
            c.go_step_back = false;
            c.terminating = false;
            c.interrupted = false;
            c.start_option = StartOption::Normal;
            c.executing_step = StepId::NONE;
            c.history.clear();
            canceled
        };
        self.set_skip(false);

        if exercise_mode {
            self.with_provider(move |provider| provider.end_exam(canceled));
        }
        info!(
            "Runtime environment of {} {}",
            self.plugin,
            if canceled { "stopped" } else { "finished" }
        );
        self.events.notify(Notification::Stop);

        self.views.write().clear();
        self.control.lock().started = false;
    }

    // ========== Suspension points ==========

    fn pause_now(&self) {
        self.control.lock().paused = true;
    }

    fn take_step_back(&self) -> bool {
        std::mem::take(&mut self.control.lock().go_step_back)
    }

    /// Turn an observed interruption into termination of the run
    fn on_interrupt(&self, mut c: MutexGuard<'_, Control>) -> Interrupted {
        c.terminating = true;
        drop(c);
        self.set_skip(true);
        Interrupted
    }

    fn set_skip(&self, skip: bool) {
        let changed = {
            let mut c = self.control.lock();
            let changed = c.skip_curr_step != skip;
            c.skip_curr_step = skip;
            if skip {
                self.monitor.notify_all();
            }
            changed
        };
        if changed {
            for view in self.views.read().iter() {
                let hinted =
                    panic::catch_unwind(AssertUnwindSafe(|| view.set_repaint_disabled(skip)));
                if let Err(payload) = hinted {
                    warn!(
                        "View of {} panicked on repaint hint: {}",
                        self.plugin,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    /// Block while paused, unless the step is skipped or a step back is pending
    fn check_pause(&self) -> Result<(), Interrupted> {
        let mut c = self.control.lock();
        loop {
            if c.interrupted {
                return Err(self.on_interrupt(c));
            }
            if !c.paused || c.skip_curr_step || c.go_step_back || c.terminating {
                break;
            }
            if !c.pause_announced {
                c.pause_announced = true;
                debug!("{} paused at step {}", self.plugin, c.executing_step);
                MutexGuard::unlocked(&mut c, || self.events.notify(Notification::Pause));
                continue;
            }
            self.monitor.wait(&mut c);
        }
        if c.pause_announced && !c.paused {
            c.pause_announced = false;
            debug!("{} resumed at step {}", self.plugin, c.executing_step);
            MutexGuard::unlocked(&mut c, || self.events.notify(Notification::Running));
        }
        Ok(())
    }

    /// Wait up to `duration`, then honor a pending pause
    fn wait_for(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now() + duration;
        let mut c = self.control.lock();
        loop {
            if c.interrupted {
                return Err(self.on_interrupt(c));
            }
            if c.skip_curr_step || c.terminating {
                return Ok(());
            }
            if self.monitor.wait_until(&mut c, deadline).timed_out() {
                break;
            }
        }
        drop(c);
        self.check_pause()
    }

    /// Block until the learner answers or gives up
    fn await_solution(&self, exercise: &Exercise) -> Result<(), Interrupted> {
        let mut c = self.control.lock();
        loop {
            if c.interrupted {
                return Err(self.on_interrupt(c));
            }
            if exercise.has_submission() {
                return Ok(());
            }
            self.monitor.wait(&mut c);
        }
    }

    // ========== Exercise processing ==========

    /// Run `step` (or, with `None`, the final check) gated by `exercise`
    fn process_exercise(
        &self,
        algorithm: &mut dyn Algorithm,
        step: Option<StepId>,
        exercise: &Arc<Exercise>,
    ) -> Result<StepId, Interrupted> {
        let entered = match self.this.upgrade() {
            Some(env) => exercise.enter(env, step),
            None => false,
        };
        if !entered {
            warn!("Exercise '{}' is already being processed", exercise.text());
            return match step {
                Some(step) => self.execute(algorithm, step),
                None => Ok(StepId::NONE),
            };
        }

        let mut result = ExamResult::Failed;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.exercise_attempts(algorithm, step, exercise, &mut result)
        }));
        exercise.exit(result);
        outcome.unwrap_or_else(|payload| panic::resume_unwind(payload))
    }

    fn exercise_attempts(
        &self,
        algorithm: &mut dyn Algorithm,
        step: Option<StepId>,
        exercise: &Arc<Exercise>,
        result: &mut ExamResult,
    ) -> Result<StepId, Interrupted> {
        loop {
            let mut before = self.state_before(algorithm, step);
            before.unfreeze();
            {
                let exercise = Arc::clone(exercise);
                let state = before.clone();
                self.on_gui(move || exercise.logic().before_request(&state));
            }

            let submitted = self.await_solution(exercise);
            let omitted = exercise.is_omitted();
            if !omitted {
                self.set_skip(true);
            }
            {
                let exercise = Arc::clone(exercise);
                self.on_gui(move || exercise.logic().after_request(omitted));
            }
            submitted?;

            let next = match step {
                None => {
                    let current = self.capture(algorithm, StepId::NONE);
                    *result = exercise.examine(&current);
                    StepId::NONE
                }
                Some(step) if exercise.logic().applies_solution_before_execution() => {
                    *result = exercise.examine(&before);
                    if result.succeeded() {
                        let mut adopted = AlgorithmState::new(&self.plugin, step);
                        exercise.transfer_solution(&mut adopted);
                        algorithm.adopt_state(step, &adopted);
                    }
                    let next = self.execute(algorithm, step)?;
                    if !result.succeeded() && !omitted {
                        Self::roll_back_attempt(algorithm, &mut before, step, next);
                    }
                    next
                }
                Some(step) => {
                    let next = self.execute(algorithm, step)?;
                    let after = self.capture(algorithm, step);
                    *result = exercise.examine(&after);
                    if !result.succeeded() && !omitted {
                        Self::roll_back_attempt(algorithm, &mut before, step, next);
                    }
                    next
                }
            };
            self.set_skip(false);

            if !omitted {
                if let Some(provider) = self.exercise_provider() {
                    let exercise = Arc::clone(exercise);
                    let succeeded = result.succeeded();
                    let solution = exercise.last_solution();
                    self.on_gui(move || {
                        provider.after_solving_exercise(&exercise, succeeded, &solution)
                    });
                }
            }

            if result.succeeded() || omitted || self.is_terminating() {
                return Ok(next);
            }
            debug!("Wrong answer to '{}', asking again", exercise.text());
            exercise.reset_solution();
        }
    }

    /// Undo a step whose exercise was answered wrongly
    fn roll_back_attempt(
        algorithm: &mut dyn Algorithm,
        before: &mut AlgorithmState,
        step: StepId,
        next: StepId,
    ) {
        before.unfreeze();
        algorithm.restore_state(before);
        algorithm.roll_back_step(step, next);
    }

    /// The state an exercise starts from: the latest history entry of `step`
    fn state_before(&self, algorithm: &dyn Algorithm, step: Option<StepId>) -> AlgorithmState {
        if let Some(step) = step {
            let c = self.control.lock();
            if let Some(top) = c.history.top().filter(|state| state.step() == step) {
                return top.clone();
            }
        }
        self.capture(algorithm, step.unwrap_or(StepId::NONE))
    }

    fn capture(&self, algorithm: &dyn Algorithm, step: StepId) -> AlgorithmState {
        let mut state = AlgorithmState::new(&self.plugin, step);
        if let Err(e) = algorithm.store_state(&mut state) {
            warn!("State of step {} of {} is incomplete: {}", step, self.plugin, e);
        }
        state
    }

    // ========== GUI thread ==========

    fn on_gui<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.gui.invoke_and_wait(job) {
            warn!("GUI callback of {} dropped: {}", self.plugin, e);
        }
    }

    fn with_provider<F>(&self, job: F)
    where
        F: FnOnce(&dyn ExerciseProvider) + Send + 'static,
    {
        if let Some(provider) = self.exercise_provider() {
            self.on_gui(move || job(provider.as_ref()));
        }
    }
}

impl ExerciseController for RuntimeEnvironment {
    fn wake_up(&self) {
        let _c = self.control.lock();
        self.monitor.notify_all();
    }

    fn exercise_provider(&self) -> Option<Arc<dyn ExerciseProvider>> {
        self.provider.read().clone()
    }

    fn gui(&self) -> GuiHandle {
        self.gui.clone()
    }
}
