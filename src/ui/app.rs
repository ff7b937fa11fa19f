//! Main TUI application state and logic

use crate::demo::{bubble_sort::step_name, BubbleSort, SortModel, PLUGIN_NAME};
use crate::exercise::ExerciseProvider;
use crate::gui::GuiQueue;
use crate::rte::{AlgorithmRte, RteConfig, RteError, SinglePluginHost, StartOption};
use crate::state::StateValue;
use crate::ui::observers::{ExercisePanel, RunStatus};
use crate::ui::panes::{self, ExerciseRenderData, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Speed factor change per `+` / `-` press
const SPEED_STEP: f32 = 1.25;

/// The main application state
pub struct App {
    /// Runtime environment of the sorting plugin
    rte: AlgorithmRte,

    /// GUI queue of this thread; listener and exercise callbacks run while it is pumped
    queue: GuiQueue,

    model: Arc<SortModel>,
    status: Arc<RunStatus>,
    panel: Arc<ExercisePanel>,

    /// Digits typed for a numeric answer
    answer: String,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create the app around a bubble sort of `values`.
    ///
    /// Must be called on the thread that will call [`App::run`]; that thread becomes the
    /// GUI thread.
    pub fn new(
        values: Vec<i64>,
        config: &RteConfig,
        exercise_mode: bool,
    ) -> Result<Self, RteError> {
        let (queue, gui) = GuiQueue::new();
        queue.pump();

        let sort = BubbleSort::new(values);
        let model = sort.model();
        let status = Arc::new(RunStatus::default());
        let panel = Arc::new(ExercisePanel::default());
        let host = Arc::new(SinglePluginHost::new(PLUGIN_NAME));

        let rte =
            AlgorithmRte::with_config(PLUGIN_NAME, sort, status.clone(), host, gui, config)?;
        rte.set_exercise_provider(Some(panel.clone() as Arc<dyn ExerciseProvider>));
        if exercise_mode {
            rte.set_exercise_mode_enabled(true)?;
        }

        Ok(App {
            rte,
            queue,
            model,
            status,
            panel,
            answer: String::new(),
            should_quit: false,
            status_message: String::from("Ready!"),
        })
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.queue.pump();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(30))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Stop a running algorithm and wait for its thread
    fn shutdown(&mut self) {
        if self.rte.stop() {
            info!("Stopping the running algorithm before exit");
        }
        // The runtime thread reports its stop through this queue
        while self.rte.is_started() {
            self.queue.pump();
            thread::sleep(Duration::from_millis(5));
        }
        self.queue.pump();
        self.rte.join();
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(9),
                Constraint::Length(1),
            ])
            .split(size);

        panes::render_array_pane(
            frame,
            chunks[0],
            &self.model.snapshot(),
            self.model.is_repaint_disabled(),
        );

        let panel = self.panel.view();
        panes::render_exercise_pane(
            frame,
            chunks[1],
            ExerciseRenderData {
                panel: &panel,
                exercise_mode: self.rte.is_exercise_mode_enabled(),
                answer: &self.answer,
            },
        );

        let step = self.rte.executing_step();
        panes::render_status_bar(
            frame,
            chunks[2],
            StatusRenderData {
                message: &self.status_message,
                step_name: step_name(step),
                on_breakpoint: step.is_valid() && self.rte.is_breakpoint(step),
                history_len: self.rte.history_len(),
                speed: self.rte.execution_speed_factor(),
                run_state: self.status.state(),
                exercise_mode: self.rte.is_exercise_mode_enabled(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.start(StartOption::Normal),
            KeyCode::Char('a') => self.start(StartOption::PlayAndPause),
            KeyCode::Char('f') => self.start(StartOption::RunToFinish),
            KeyCode::Char('p') => {
                self.status_message = if self.rte.pause() {
                    "Pausing...".to_string()
                } else {
                    "Cannot pause now".to_string()
                };
            }
            KeyCode::Right => {
                if self.rte.next_step() {
                    self.status_message = "Next step".to_string();
                }
            }
            KeyCode::Left => {
                if self.rte.prev_step() {
                    self.status_message = "Stepping back".to_string();
                }
            }
            KeyCode::Char('s') => {
                if self.rte.stop() {
                    self.status_message = "Stopping...".to_string();
                }
            }
            KeyCode::Char('b') => self.toggle_breakpoint(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_speed(SPEED_STEP),
            KeyCode::Char('-') => self.change_speed(1.0 / SPEED_STEP),
            KeyCode::Char('e') => self.toggle_exercise_mode(),
            KeyCode::Char('y') => self.submit(StateValue::Bool(true)),
            KeyCode::Char('n') => self.submit(StateValue::Bool(false)),
            KeyCode::Char(c @ '0'..='9') => {
                if self.panel.current().is_some() {
                    self.answer.push(c);
                }
            }
            KeyCode::Backspace => {
                self.answer.pop();
            }
            KeyCode::Enter => match self.answer.parse::<i64>() {
                Ok(number) => self.submit(StateValue::Int(number)),
                Err(_) => self.status_message = "Type a number first".to_string(),
            },
            KeyCode::Char('g') => {
                if let Some(exercise) = self.panel.current() {
                    exercise.give_up();
                    self.answer.clear();
                    self.status_message = "Gave up".to_string();
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, option: StartOption) {
        match self.rte.start(option) {
            Ok(true) => self.status_message = format!("{:?}", option),
            Ok(false) => {}
            Err(e) => {
                warn!("Start failed: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    fn toggle_breakpoint(&mut self) {
        let step = self.rte.executing_step();
        if !step.is_valid() {
            self.status_message = "No step to break on".to_string();
            return;
        }
        let enabled = self.rte.toggle_breakpoint(step);
        self.status_message = format!(
            "Breakpoint {} on {}",
            if enabled { "set" } else { "cleared" },
            step_name(step)
        );
    }

    fn change_speed(&mut self, ratio: f32) {
        let speed = self.rte.execution_speed_factor() * ratio;
        match self.rte.set_execution_speed_factor(speed) {
            Ok(()) => self.status_message = format!("Speed ×{:.2}", speed),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    fn toggle_exercise_mode(&mut self) {
        let enabled = !self.rte.is_exercise_mode_enabled();
        match self.rte.set_exercise_mode_enabled(enabled) {
            Ok(_) => {
                self.status_message = format!(
                    "Exercise mode {}",
                    if enabled { "on" } else { "off" }
                );
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    fn submit(&mut self, solution: StateValue) {
        let Some(exercise) = self.panel.current() else {
            return;
        };
        if exercise.solve(vec![solution]) {
            self.answer.clear();
            self.status_message = "Answer submitted".to_string();
        }
    }
}

