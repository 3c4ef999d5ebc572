use std::collections::HashMap;
use std::fmt;

use ringbuf::traits::{Consumer, Observer, RingBuffer};
use ringbuf::HeapRb;
use tracing::debug;

use super::analyzer::{Advisory, WindowAnalyzer};
use super::sample::Sample;
use crate::error::SampleError;

/// Most samples kept per key before the oldest is evicted.
pub const SERIES_CAPACITY: usize = 100;
/// Most recent samples considered when averaging.
pub const WINDOW_SIZE: usize = 10;

/// Bounded, insertion-ordered history of one key.
pub struct SampleSeries {
    ring: HeapRb<Sample>,
}

impl SampleSeries {
    pub fn new() -> Self {
        Self {
            ring: HeapRb::new(SERIES_CAPACITY),
        }
    }

    /// Appends a sample, returning the evicted one when the series was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        self.ring.push_overwrite(sample)
    }

    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.ring.iter()
    }

    /// The last `min(WINDOW_SIZE, len)` samples, oldest first.
    pub fn window(&self) -> Vec<&Sample> {
        let skip = self.len().saturating_sub(WINDOW_SIZE);
        self.iter().skip(skip).collect()
    }
}

impl Default for SampleSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SampleSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleSeries")
            .field("len", &self.len())
            .field("capacity", &SERIES_CAPACITY)
            .finish()
    }
}

/// Owns the per-key sample store. Nothing else mutates it.
#[derive(Debug, Default)]
pub struct SampleRecorder {
    store: HashMap<String, SampleSeries>,
}

impl SampleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `sample` under its key and runs the window check for that key.
    pub fn record(
        &mut self,
        sample: Sample,
        analyzer: &WindowAnalyzer,
    ) -> Result<Option<Advisory>, SampleError> {
        sample.validate()?;

        let key = sample.key.clone();
        let series = self.store.entry(key.clone()).or_default();
        if let Some(evicted) = series.push(sample) {
            debug!(key = %key, commit_time = evicted.commit_time, "evicted oldest sample");
        }

        Ok(analyzer.analyze(&key, series))
    }

    pub fn series(&self, key: &str) -> Option<&SampleSeries> {
        self.store.get(key)
    }

    /// All tracked keys with their series. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleSeries)> + '_ {
        self.store.iter().map(|(key, series)| (key.as_str(), series))
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::sample::Phase;

    fn sample(key: &str, actual: f64) -> Sample {
        Sample::new(key, Phase::Update, actual, actual)
    }

    #[test]
    fn series_never_exceeds_capacity() {
        let mut series = SampleSeries::new();
        for i in 0..(SERIES_CAPACITY + 25) {
            series.push(sample("a", i as f64));
            assert!(series.len() <= SERIES_CAPACITY);
        }
        assert_eq!(series.len(), SERIES_CAPACITY);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut series = SampleSeries::new();
        for i in 0..SERIES_CAPACITY {
            assert!(series.push(sample("a", i as f64)).is_none());
        }
        let evicted = series.push(sample("a", 1000.0)).expect("full series evicts");
        assert_eq!(evicted.actual_duration, 0.0);

        let durations: Vec<f64> = series.iter().map(|s| s.actual_duration).collect();
        assert_eq!(durations.first().copied(), Some(1.0));
        assert_eq!(durations.last().copied(), Some(1000.0));
    }

    #[test]
    fn window_is_most_recent_ten() {
        let mut series = SampleSeries::new();
        for i in 0..25 {
            series.push(sample("a", i as f64));
        }
        let window: Vec<f64> = series.window().iter().map(|s| s.actual_duration).collect();
        assert_eq!(window, (15..25).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn short_series_window_is_whole_series() {
        let mut series = SampleSeries::new();
        series.push(sample("a", 3.0));
        series.push(sample("a", 4.0));
        assert_eq!(series.window().len(), 2);
    }

    #[test]
    fn record_partitions_by_key() {
        let analyzer = WindowAnalyzer::new(16.0);
        let mut recorder = SampleRecorder::new();
        recorder.record(sample("a", 1.0), &analyzer).unwrap();
        recorder.record(sample("b", 2.0), &analyzer).unwrap();
        recorder.record(sample("a", 3.0), &analyzer).unwrap();

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.series("a").map(SampleSeries::len), Some(2));
        assert_eq!(recorder.series("b").map(SampleSeries::len), Some(1));
    }

    #[test]
    fn record_rejects_malformed_sample_without_touching_store() {
        let analyzer = WindowAnalyzer::new(16.0);
        let mut recorder = SampleRecorder::new();
        let result = recorder.record(sample("", 1.0), &analyzer);
        assert_eq!(result, Err(SampleError::MissingKey));
        assert!(recorder.is_empty());
    }

    #[test]
    fn record_reports_advisory_when_window_is_slow() {
        let analyzer = WindowAnalyzer::new(16.0);
        let mut recorder = SampleRecorder::new();
        let advisory = recorder.record(sample("slow", 40.0), &analyzer).unwrap();
        assert_eq!(advisory.map(|a| a.average_duration), Some(40.0));
    }
}
