//! # Introduction
//!
//! algovis runs algorithm visualizations step by step. An algorithm plugin implements
//! [`rte::Algorithm`]; its [`rte::AlgorithmRte`] executes the steps on a dedicated thread
//! and lets the host pause, resume, skip, step backward and stop the run. Before every step
//! the state of the algorithm is captured and frozen, so stepping backward restores it
//! exactly.
//!
//! ## Execution pipeline
//!
//! ```text
//! Host keys → AlgorithmRte → RuntimeEnvironment thread → Algorithm hooks
//!                                  │                         │
//!                                  ├─ StateHistory ◄─ frozen AlgorithmState
//!                                  └─ GUI queue → listeners, views, exercise provider
//! ```
//!
//! 1. [`state`] — step ids, the freezable [`state::AlgorithmState`] snapshot and the
//!    [`state::StateHistory`] used for stepping backward.
//! 2. [`rte`] — the scheduler, its control facade, configuration and lifecycle events.
//! 3. [`exercise`] — exercise mode: questions gating steps, examined against the
//!    algorithm's state.
//! 4. [`gui`] — the single-thread dispatcher every host callback runs on.
//! 5. [`demo`] — a bubble sort plugin.
//! 6. [`ui`] — ratatui-based TUI host; not part of the stable library API.
//!
//! ## Control model
//!
//! Control operations never block: they flip flags and wake the runtime thread, which
//! honors them at its next checkpoint. Start, resume and pause can be vetoed by any
//! registered listener. Every operation is refused unless the plugin is the host's active
//! plugin.

pub mod demo;
pub mod exercise;
pub mod gui;
pub mod rte;
pub mod state;
pub mod ui;
