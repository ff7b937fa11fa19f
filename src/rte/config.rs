// Runtime environment configuration

use super::errors::RteError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum time a step stays visible, in milliseconds
pub const DEFAULT_MIN_STEP_DWELL_TIME_MS: i64 = 500;

/// Settings of one runtime environment
///
/// Every plugin's runtime environment owns its own copy, so open plugins never share pacing
/// or breakpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RteConfig {
    /// 2.0 halves every pacing sleep, 0.5 doubles it
    pub execution_speed_factor: f32,
    /// Steps finishing faster than this are held until it elapses
    pub min_step_dwell_time_ms: i64,
    /// Ignore breakpoints
    pub skip_breakpoints: bool,
    /// Pause once more after the last step before stopping
    pub pause_before_stop: bool,
}

impl Default for RteConfig {
    fn default() -> Self {
        RteConfig {
            execution_speed_factor: 1.0,
            min_step_dwell_time_ms: DEFAULT_MIN_STEP_DWELL_TIME_MS,
            skip_breakpoints: false,
            pause_before_stop: false,
        }
    }
}

impl RteConfig {
    /// Parse a JSON configuration; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, RteError> {
        let config: RteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, RteError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), RteError> {
        validate_speed_factor(self.execution_speed_factor)?;
        validate_dwell_time(self.min_step_dwell_time_ms)?;
        Ok(())
    }
}

pub(crate) fn validate_speed_factor(factor: f32) -> Result<(), RteError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(RteError::InvalidSpeedFactor(factor))
    }
}

pub(crate) fn validate_dwell_time(millis: i64) -> Result<(), RteError> {
    if millis >= 0 {
        Ok(())
    } else {
        Err(RteError::InvalidDwellTime(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RteConfig::default();
        assert_eq!(config.execution_speed_factor, 1.0);
        assert_eq!(config.min_step_dwell_time_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = RteConfig::from_json(r#"{ "execution_speed_factor": 2.5 }"#).unwrap();
        assert_eq!(config.execution_speed_factor, 2.5);
        assert_eq!(config.min_step_dwell_time_ms, 500);
        assert!(!config.pause_before_stop);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RteConfig::from_json(r#"{ "execution_speed_factor": 0.0 }"#),
            Err(RteError::InvalidSpeedFactor(_))
        ));
        assert!(matches!(
            RteConfig::from_json(r#"{ "min_step_dwell_time_ms": -1 }"#),
            Err(RteError::InvalidDwellTime(-1))
        ));
        assert!(matches!(
            RteConfig::from_json("{ not json"),
            Err(RteError::Config(_))
        ));
    }
}
