// Public control surface of one plugin's runtime environment

use super::algorithm::Algorithm;
use super::config::RteConfig;
use super::errors::RteError;
use super::events::{RteListener, Transition};
use super::host::Host;
use super::scheduler::{RuntimeEnvironment, StartOption};
use crate::exercise::ExerciseProvider;
use crate::gui::GuiHandle;
use crate::state::StepId;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Runtime environment of one algorithm plugin
///
/// Every control operation is only honored while the owning plugin is the host's active
/// plugin; otherwise it is logged and ignored. Start, resume and pause are first offered to
/// the registered [`RteListener`]s, any of which may cancel them.
pub struct AlgorithmRte {
    env: Arc<RuntimeEnvironment>,
    host: Arc<dyn Host>,
    thread: Mutex<Option<JoinHandle<()>>>,
    supports_exercise_mode: bool,
}

impl AlgorithmRte {
    /// Create the runtime environment of `plugin` with the default configuration.
    ///
    /// `owner` is the plugin's own listener; it always receives events first and can never
    /// be removed.
    pub fn new(
        plugin: &str,
        algorithm: impl Algorithm,
        owner: Arc<dyn RteListener>,
        host: Arc<dyn Host>,
        gui: GuiHandle,
    ) -> Result<Self, RteError> {
        Self::with_config(plugin, algorithm, owner, host, gui, &RteConfig::default())
    }

    pub fn with_config(
        plugin: &str,
        algorithm: impl Algorithm,
        owner: Arc<dyn RteListener>,
        host: Arc<dyn Host>,
        gui: GuiHandle,
        config: &RteConfig,
    ) -> Result<Self, RteError> {
        if plugin.is_empty() {
            return Err(RteError::EmptyPluginName);
        }
        config.validate()?;

        let supports_exercise_mode = algorithm.supports_exercise_mode();
        let env = RuntimeEnvironment::new(
            plugin,
            Box::new(algorithm),
            owner,
            Arc::clone(&host),
            gui,
            config,
        );
        Ok(AlgorithmRte {
            env,
            host,
            thread: Mutex::new(None),
            supports_exercise_mode,
        })
    }

    pub fn plugin(&self) -> &str {
        self.env.plugin()
    }

    fn permitted(&self, operation: &str) -> bool {
        if self.host.is_active_plugin(self.env.plugin()) {
            true
        } else {
            warn!(
                "{} of {} refused: plugin is not active",
                operation,
                self.env.plugin()
            );
            false
        }
    }

    // ========== Control ==========

    /// Start a run, or resume a paused one.
    ///
    /// Returns whether a run was started or resumed.
    pub fn start(&self, option: StartOption) -> Result<bool, RteError> {
        if !self.permitted("start") {
            return Ok(false);
        }

        if !self.env.is_started() {
            if !self.env.events.request(Transition::Start) || !self.env.restart(option) {
                return Ok(false);
            }
            let mut thread = self.thread.lock();
            if let Some(previous) = thread.take() {
                // The previous run already reported its stop; this only reaps the thread.
                let _ = previous.join();
            }
            let env = Arc::clone(&self.env);
            let handle = thread::Builder::new()
                .name(format!("rte-{}", self.env.plugin()))
                .spawn(move || env.run())
                .map_err(|e| {
                    self.env.interrupt();
                    RteError::Spawn(e)
                })?;
            *thread = Some(handle);
            debug!("Runtime thread of {} spawned", self.env.plugin());
            return Ok(true);
        }

        if self.env.is_paused() && !self.env.is_exercise_mode_enabled() {
            if !self.env.events.request(Transition::Resume) {
                return Ok(false);
            }
            return Ok(self.env.resume(option));
        }
        Ok(false)
    }

    /// Pause the run at its next checkpoint
    pub fn pause(&self) -> bool {
        if !self.permitted("pause") {
            return false;
        }
        if !self.env.is_started() || self.env.is_paused() || self.env.is_exercise_mode_enabled()
        {
            return false;
        }
        self.env.events.request(Transition::Pause) && self.env.pause()
    }

    /// Stop the run. Returns immediately; the stop is reported through `on_stop`.
    pub fn stop(&self) -> bool {
        self.permitted("stop") && self.env.interrupt()
    }

    /// Finish the current step without pacing
    pub fn next_step(&self) -> bool {
        self.permitted("next step") && self.env.is_started() && self.env.skip_step()
    }

    /// Undo the current step and return to its predecessor
    pub fn prev_step(&self) -> bool {
        self.permitted("previous step") && self.env.go_step_back()
    }

    /// Wait for the runtime thread of the last run to exit
    pub fn join(&self) {
        let handle = self.thread.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Runtime thread of {} panicked", self.env.plugin());
            }
        }
    }

    // ========== Settings ==========

    pub fn set_execution_speed_factor(&self, factor: f32) -> Result<(), RteError> {
        self.env.set_execution_speed_factor(factor)
    }

    pub fn execution_speed_factor(&self) -> f32 {
        self.env.execution_speed_factor()
    }

    pub fn set_min_step_dwell_time(&self, millis: i64) -> Result<(), RteError> {
        self.env.set_min_step_dwell_time(millis)
    }

    pub fn min_step_dwell_time(&self) -> Duration {
        self.env.min_step_dwell_time()
    }

    pub fn set_breakpoint(&self, step: StepId, enabled: bool) {
        self.env.set_breakpoint(step, enabled);
    }

    /// Flip the breakpoint of `step`; returns whether it is now set
    pub fn toggle_breakpoint(&self, step: StepId) -> bool {
        let enabled = !self.env.is_breakpoint(step);
        self.env.set_breakpoint(step, enabled);
        enabled
    }

    pub fn is_breakpoint(&self, step: StepId) -> bool {
        self.env.is_breakpoint(step)
    }

    pub fn set_skip_breakpoints(&self, skip: bool) {
        self.env.set_skip_breakpoints(skip);
    }

    pub fn set_pause_before_stop(&self, pause: bool) {
        self.env.set_pause_before_stop(pause);
    }

    // ========== Exercise mode ==========

    pub fn supports_exercise_mode(&self) -> bool {
        self.supports_exercise_mode
    }

    /// Switch exercise mode.
    ///
    /// Ignored for algorithms without exercises. Fails while the algorithm is started.
    pub fn set_exercise_mode_enabled(&self, enabled: bool) -> Result<bool, RteError> {
        if !self.supports_exercise_mode {
            debug!("{} has no exercise mode", self.env.plugin());
            return Ok(false);
        }
        self.env.set_exercise_mode_enabled(enabled)
    }

    pub fn is_exercise_mode_enabled(&self) -> bool {
        self.env.is_exercise_mode_enabled()
    }

    pub fn set_exercise_provider(&self, provider: Option<Arc<dyn ExerciseProvider>>) {
        self.env.set_exercise_provider(provider);
    }

    // ========== Listeners ==========

    pub fn add_listener(&self, listener: Arc<dyn RteListener>) {
        self.env.events.add(listener);
    }

    /// Remove a listener. The owner listener stays.
    pub fn remove_listener(&self, listener: &Arc<dyn RteListener>) -> bool {
        self.env.events.remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.env.events.len()
    }

    // ========== Queries ==========

    pub fn is_started(&self) -> bool {
        self.env.is_started()
    }

    pub fn is_paused(&self) -> bool {
        self.env.is_paused()
    }

    pub fn executing_step(&self) -> StepId {
        self.env.executing_step()
    }

    pub fn history_len(&self) -> usize {
        self.env.history_len()
    }
}

impl Drop for AlgorithmRte {
    fn drop(&mut self) {
        self.env.interrupt();
    }
}
