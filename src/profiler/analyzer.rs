use std::fmt;

use tracing::warn;

use super::recorder::SampleSeries;
use super::sample::Sample;

/// Arithmetic mean of `actual_duration`, or `None` for an empty window.
pub fn mean_duration(window: &[&Sample]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let total: f64 = window.iter().map(|s| s.actual_duration).sum();
    Some(total / window.len() as f64)
}

/// Raised when a key's rolling average goes over the frame budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub key: String,
    pub average_duration: f64,
    pub threshold_ms: f64,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} averages {:.2}ms over its last renders (budget {:.2}ms); consider memoizing it or trimming its render work",
            self.key, self.average_duration, self.threshold_ms
        )
    }
}

/// Rolling-window check run after every recorded sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAnalyzer {
    threshold_ms: f64,
}

impl WindowAnalyzer {
    pub fn new(threshold_ms: f64) -> Self {
        Self { threshold_ms }
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    /// Observational only: logs and returns an advisory, never touches the series.
    pub fn analyze(&self, key: &str, series: &SampleSeries) -> Option<Advisory> {
        let average_duration = mean_duration(&series.window())?;
        if average_duration <= self.threshold_ms {
            return None;
        }

        let advisory = Advisory {
            key: key.to_string(),
            average_duration,
            threshold_ms: self.threshold_ms,
        };
        warn!(
            key = %key,
            average_ms = average_duration,
            threshold_ms = self.threshold_ms,
            "render performance advisory: {}",
            advisory
        );
        Some(advisory)
    }
}
