//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]** — application state, keyboard event loop, GUI queue pumping
//! - **[`observers`]** — the runtime listener and exercise provider the panes read from
//! - **[`panes`]** — stateless render functions for each visible pane (array, exercise,
//!   status bar)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the values to sort and
//! call [`App::run`] to start the event loop. The thread running the loop is the GUI
//! thread of the runtime environment.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod observers;
pub mod panes;
pub mod theme;

pub use app::App;
