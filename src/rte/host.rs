//! Host application contracts
//!
//! - [`Host`]: the application hosting algorithm plugins
//! - [`View`]: a visualization surface the runtime can ask to stop repainting
//! - [`SinglePluginHost`]: a host that tracks one active plugin, enough for headless use

use parking_lot::RwLock;

/// The application hosting algorithm plugins
pub trait Host: Send + Sync {
    /// Whether `plugin` is the plugin currently in front.
    ///
    /// Only the active plugin may control its runtime environment.
    fn is_active_plugin(&self, plugin: &str) -> bool;

    /// Exercise mode of `plugin` changed. Called on the GUI thread.
    fn exercise_mode_changed(&self, _plugin: &str, _enabled: bool) {}
}

/// A visualization surface of an algorithm
pub trait View: Send + Sync {
    /// Suppress (or allow again) repaints while steps are skipped.
    ///
    /// Must not call back into the runtime environment.
    fn set_repaint_disabled(&self, disabled: bool);
}

/// Host with a single switchable active plugin
#[derive(Debug, Default)]
pub struct SinglePluginHost {
    active: RwLock<Option<String>>,
    exercise_mode: RwLock<Option<(String, bool)>>,
}

impl SinglePluginHost {
    /// Create a host where `plugin` is active
    pub fn new(plugin: impl Into<String>) -> Self {
        SinglePluginHost {
            active: RwLock::new(Some(plugin.into())),
            exercise_mode: RwLock::new(None),
        }
    }

    /// Bring another plugin to the front (or none)
    pub fn activate(&self, plugin: Option<&str>) {
        *self.active.write() = plugin.map(str::to_string);
    }

    /// Last reported exercise-mode change
    pub fn last_exercise_mode(&self) -> Option<(String, bool)> {
        self.exercise_mode.read().clone()
    }
}

impl Host for SinglePluginHost {
    fn is_active_plugin(&self, plugin: &str) -> bool {
        self.active.read().as_deref() == Some(plugin)
    }

    fn exercise_mode_changed(&self, plugin: &str, enabled: bool) {
        *self.exercise_mode.write() = Some((plugin.to_string(), enabled));
    }
}
