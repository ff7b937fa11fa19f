// algovis: step-by-step algorithm visualization in the terminal

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use algovis::rte::RteConfig;
use algovis::ui::App;

#[derive(Parser, Debug)]
#[command(name = "algovis", version, about = "Step through a bubble sort in the terminal")]
struct Args {
    /// Values to sort
    #[arg(value_name = "VALUE", allow_negative_numbers = true)]
    values: Vec<i64>,

    /// JSON runtime configuration; command-line flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Execution speed factor (2.0 runs twice as fast)
    #[arg(short, long)]
    speed: Option<f32>,

    /// Minimum time each step stays visible, in milliseconds
    #[arg(short, long, value_name = "MS")]
    dwell: Option<i64>,

    /// Start in exercise mode
    #[arg(short, long)]
    exercise: bool,

    /// Pause once more after the last step
    #[arg(long)]
    pause_before_stop: bool,

    /// Ignore breakpoints
    #[arg(long)]
    skip_breakpoints: bool,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

const DEFAULT_VALUES: [i64; 8] = [5, 1, 4, 2, 8, 7, 3, 6];

fn init_logging(path: &PathBuf) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("algovis=debug")),
        )
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<RteConfig> {
    let mut config = match &args.config {
        Some(path) => RteConfig::load(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => RteConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.execution_speed_factor = speed;
    }
    if let Some(dwell) = args.dwell {
        config.min_step_dwell_time_ms = dwell;
    }
    config.pause_before_stop |= args.pause_before_stop;
    config.skip_breakpoints |= args.skip_breakpoints;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = build_config(&args)?;
    let values = if args.values.is_empty() {
        DEFAULT_VALUES.to_vec()
    } else {
        args.values.clone()
    };
    tracing::info!("Sorting {:?} with {:?}", values, config);

    let mut app = App::new(values, &config, args.exercise)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
