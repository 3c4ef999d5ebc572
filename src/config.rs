use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_REPORT_INTERVAL_MS: u64 = 5_000;
/// One frame at 60fps.
pub const DEFAULT_THRESHOLD_MS: f64 = 16.0;

pub const ENV_REPORT_INTERVAL: &str = "RENDER_PULSE_REPORT_INTERVAL_MS";
pub const ENV_THRESHOLD: &str = "RENDER_PULSE_THRESHOLD_MS";

/// Effective profiler settings. Both values must be positive; the engine does not re-check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    pub report_interval_ms: u64,
    pub threshold_ms: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            threshold_ms: DEFAULT_THRESHOLD_MS,
        }
    }
}

/// Partial change to a running profiler's settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub report_interval_ms: Option<u64>,
    pub threshold_ms: Option<f64>,
}

impl ProfilerConfig {
    pub fn with_threshold(mut self, threshold_ms: f64) -> Self {
        self.threshold_ms = threshold_ms;
        self
    }

    pub fn with_report_interval(mut self, report_interval_ms: u64) -> Self {
        self.report_interval_ms = report_interval_ms;
        self
    }

    /// Returns the configuration that results from applying `update`; `self` is left untouched.
    pub fn apply(&self, update: ConfigUpdate) -> ProfilerConfig {
        ProfilerConfig {
            report_interval_ms: update.report_interval_ms.unwrap_or(self.report_interval_ms),
            threshold_ms: update.threshold_ms.unwrap_or(self.threshold_ms),
        }
    }

    /// Defaults overridden by `RENDER_PULSE_*` environment variables when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REPORT_INTERVAL) {
            let value: u64 = raw.trim().parse().map_err(|_| ConfigError::Unparsable {
                var: ENV_REPORT_INTERVAL,
                value: raw.clone(),
            })?;
            if value == 0 {
                return Err(ConfigError::NonPositive { var: ENV_REPORT_INTERVAL, value: raw });
            }
            config.report_interval_ms = value;
        }

        if let Some(raw) = lookup(ENV_THRESHOLD) {
            let value: f64 = raw.trim().parse().map_err(|_| ConfigError::Unparsable {
                var: ENV_THRESHOLD,
                value: raw.clone(),
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { var: ENV_THRESHOLD, value: raw });
            }
            config.threshold_ms = value;
        }

        Ok(config)
    }
}
