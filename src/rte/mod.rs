//! # Runtime environment
//!
//! Executes an [`Algorithm`] step by step on a dedicated thread, with pacing, pausing,
//! breakpoints, skipping, stepping backward through a history of frozen states, and an
//! exercise mode that gates steps behind learner questions.
//!
//! - [`AlgorithmRte`]: the control surface a plugin exposes to its host
//! - [`RuntimeEnvironment`]: the scheduler behind it
//! - [`Algorithm`] / [`StepContext`]: what a concrete algorithm implements and receives
//! - [`RteListener`]: lifecycle observers, invoked on the GUI thread
//!
//! ## Threads
//!
//! The runtime thread is the only one calling algorithm hooks. Control operations come
//! from any thread and only flip flags in the scheduler's control block. Listener, view and
//! exercise-provider callbacks are marshalled onto the GUI thread through a
//! [`GuiHandle`](crate::gui::GuiHandle).

pub mod algorithm;
pub mod config;
pub mod errors;
pub mod events;
pub mod facade;
pub mod host;
pub mod scheduler;

pub use algorithm::{Algorithm, StepContext};
pub use config::{RteConfig, DEFAULT_MIN_STEP_DWELL_TIME_MS};
pub use errors::{Interrupted, RteError, StepError};
pub use events::{RteEvent, RteListener};
pub use facade::AlgorithmRte;
pub use host::{Host, SinglePluginHost, View};
pub use scheduler::{RuntimeEnvironment, StartOption};
