//! Error types for the runtime environment
//!
//! - [`RteError`]: rejected configuration or control operations, returned to the caller
//! - [`StepError`]: why an algorithm step did not produce a next step
//! - [`Interrupted`]: the run is being stopped; raised by every suspension point
//!
//! Step failures never leave the runtime thread: they are logged and end the run.

use std::io;

/// The runtime environment is being stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("runtime environment interrupted")]
pub struct Interrupted;

/// Error returned by `Algorithm::execute_step`
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Legitimate termination signal, not logged as a failure
    #[error("step interrupted")]
    Interrupted,

    /// Unexpected algorithm failure
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl StepError {
    /// Build a failure from a message
    pub fn msg(message: impl std::fmt::Display) -> Self {
        StepError::Failed(anyhow::anyhow!("{}", message))
    }
}

impl From<Interrupted> for StepError {
    fn from(_: Interrupted) -> Self {
        StepError::Interrupted
    }
}

/// Rejected configuration or control operations
#[derive(Debug, thiserror::Error)]
pub enum RteError {
    #[error("execution speed factor must be positive and finite, got {0}")]
    InvalidSpeedFactor(f32),

    #[error("minimum step dwell time must not be negative, got {0} ms")]
    InvalidDwellTime(i64),

    #[error("exercise mode cannot change while the algorithm is started")]
    AlreadyStarted,

    #[error("plugin name must not be empty")]
    EmptyPluginName,

    #[error("failed to spawn runtime thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
