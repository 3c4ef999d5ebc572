use serde::{Deserialize, Serialize};

use super::analyzer::mean_duration;
use super::recorder::SampleRecorder;
use super::suggest::suggest;

/// Point-in-time summary of one key. Recomputed every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub key: String,
    /// Mean over the most recent window, not the whole series.
    pub average_duration: f64,
    /// Length of the full retained series.
    pub sample_count: usize,
    pub suggestions: Vec<String>,
    /// Shared by every report in the same batch.
    pub generated_at: u64,
}

impl Report {
    pub fn exceeds(&self, threshold_ms: f64) -> bool {
        self.average_duration > threshold_ms
    }
}

/// One report per key with samples. Reads the store without modifying it.
pub fn generate_reports(recorder: &SampleRecorder, threshold_ms: f64, generated_at: u64) -> Vec<Report> {
    recorder
        .iter()
        .filter_map(|(key, series)| {
            let window = series.window();
            let average_duration = mean_duration(&window)?;
            Some(Report {
                key: key.to_string(),
                average_duration,
                sample_count: series.len(),
                suggestions: suggest(&window, threshold_ms)
                    .into_iter()
                    .map(|s| s.to_string())
                    .collect(),
                generated_at,
            })
        })
        .collect()
}
