//! Runtime lifecycle events
//!
//! Listeners are notified synchronously on the GUI thread, whichever thread triggers the
//! transition. `before_*` events carry a `doit` flag; if any listener clears it the
//! transition is not carried out. Every listener is still invoked.

use crate::gui::GuiHandle;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Event passed to [`RteListener`] callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RteEvent {
    plugin: String,
    /// Cleared by a listener to cancel a `before_*` transition
    pub doit: bool,
}

impl RteEvent {
    pub fn new(plugin: impl Into<String>) -> Self {
        RteEvent {
            plugin: plugin.into(),
            doit: true,
        }
    }

    /// Plugin whose runtime environment fired the event
    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

/// Observer of a runtime environment's lifecycle
pub trait RteListener: Send + Sync {
    fn before_start(&self, _event: &mut RteEvent) {}

    fn before_resume(&self, _event: &mut RteEvent) {}

    fn before_pause(&self, _event: &mut RteEvent) {}

    fn on_running(&self, _event: &RteEvent) {}

    fn on_pause(&self, _event: &RteEvent) {}

    fn on_stop(&self, _event: &RteEvent) {}
}

/// Cancelable transitions requested through the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Start,
    Resume,
    Pause,
}

/// Transitions that already happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    Running,
    Pause,
    Stop,
}

/// Listener registry with GUI-thread fan-out
pub(crate) struct EventBus {
    plugin: String,
    gui: GuiHandle,
    /// The plugin's own listener is always at index 0
    listeners: RwLock<Vec<Arc<dyn RteListener>>>,
}

impl EventBus {
    pub(crate) fn new(plugin: &str, gui: GuiHandle, owner: Arc<dyn RteListener>) -> Self {
        EventBus {
            plugin: plugin.to_string(),
            gui,
            listeners: RwLock::new(vec![owner]),
        }
    }

    pub(crate) fn add(&self, listener: Arc<dyn RteListener>) {
        self.listeners.write().push(listener);
    }

    /// Remove a listener; the owner cannot be removed
    pub(crate) fn remove(&self, listener: &Arc<dyn RteListener>) -> bool {
        let mut listeners = self.listeners.write();
        let target = Arc::as_ptr(listener) as *const ();
        match listeners
            .iter()
            .skip(1)
            .position(|l| Arc::as_ptr(l) as *const () == target)
        {
            Some(index) => {
                listeners.remove(index + 1);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Ask every listener whether `transition` may happen
    pub(crate) fn request(&self, transition: Transition) -> bool {
        let listeners = self.listeners.read().clone();
        let plugin = self.plugin.clone();
        let outcome = self.gui.invoke_and_wait(move || {
            let mut event = RteEvent::new(plugin);
            for listener in &listeners {
                match transition {
                    Transition::Start => listener.before_start(&mut event),
                    Transition::Resume => listener.before_resume(&mut event),
                    Transition::Pause => listener.before_pause(&mut event),
                }
            }
            event.doit
        });
        match outcome {
            Ok(doit) => {
                if !doit {
                    debug!("{:?} of {} canceled by a listener", transition, self.plugin);
                }
                doit
            }
            Err(e) => {
                warn!("{:?} of {} not delivered: {}", transition, self.plugin, e);
                false
            }
        }
    }

    /// Tell every listener that `notification` happened
    pub(crate) fn notify(&self, notification: Notification) {
        let listeners = self.listeners.read().clone();
        let plugin = self.plugin.clone();
        let delivered = self.gui.invoke_and_wait(move || {
            let event = RteEvent::new(plugin);
            for listener in &listeners {
                match notification {
                    Notification::Running => listener.on_running(&event),
                    Notification::Pause => listener.on_pause(&event),
                    Notification::Stop => listener.on_stop(&event),
                }
            }
        });
        if let Err(e) = delivered {
            warn!("{:?} of {} not delivered: {}", notification, self.plugin, e);
        }
    }
}
