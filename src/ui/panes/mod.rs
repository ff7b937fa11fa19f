//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`array`]: The array being sorted, with the compared pair and the sorted suffix
//! - [`exercise`]: The exercise panel: open question, typed answer, feedback and credits
//! - [`status`]: Status bar with run state, current step and keybindings
//!
//! Each pane module exports a `render_*` function taking the frame, its area and a plain
//! render-data value; none of them touches the runtime environment.

pub mod array;
pub mod exercise;
pub mod status;

pub use array::render_array_pane;
pub use exercise::{render_exercise_pane, ExerciseRenderData};
pub use status::{render_status_bar, StatusRenderData};
