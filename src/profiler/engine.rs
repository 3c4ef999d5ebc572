use std::time::Duration;

use tracing::{debug, info, warn};

use super::analyzer::{Advisory, WindowAnalyzer};
use super::recorder::SampleRecorder;
use super::report::{generate_reports, Report};
use super::sample::Sample;
use super::schedule::ReportSchedule;
use super::sink::ReportSink;
use super::time::{Clock, SystemClock};
use crate::config::{ConfigUpdate, ProfilerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed or stopped; no tick pending, samples are refused.
    Idle,
    /// Ticking and accepting samples.
    Active,
}

/// A render profiler instance. Owns its store, schedule and report consumer.
pub struct Profiler {
    config: ProfilerConfig,
    analyzer: WindowAnalyzer,
    recorder: SampleRecorder,
    schedule: ReportSchedule,
    state: EngineState,
    clock: Box<dyn Clock>,
    sink: Option<Box<dyn ReportSink>>,
    last_report_at: Option<u64>,
    dropped_samples: u64,
}

impl Profiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(config: ProfilerConfig, clock: C) -> Self {
        Self {
            config,
            analyzer: WindowAnalyzer::new(config.threshold_ms),
            recorder: SampleRecorder::new(),
            schedule: ReportSchedule::new(config.report_interval_ms),
            state: EngineState::Idle,
            clock: Box::new(clock),
            sink: None,
            last_report_at: None,
            dropped_samples: 0,
        }
    }

    /// Registers the consumer for periodic batches, replacing any previous one.
    pub fn on_report<S: ReportSink + 'static>(&mut self, sink: S) {
        self.sink = Some(Box::new(sink));
    }

    pub fn config(&self) -> ProfilerConfig {
        self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EngineState::Active
    }

    /// Read-only view of the store.
    pub fn recorder(&self) -> &SampleRecorder {
        &self.recorder
    }

    pub fn last_report_at(&self) -> Option<u64> {
        self.last_report_at
    }

    /// Samples refused since the last reset, malformed or received while idle.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    /// Idle -> Active. Returns false if already active.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.schedule.arm(self.clock.now_ms());
        self.state = EngineState::Active;
        info!(
            interval_ms = self.config.report_interval_ms,
            threshold_ms = self.config.threshold_ms,
            "profiler started"
        );
        true
    }

    /// Active -> Idle: cancels the pending tick and clears the store. No-op when idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.schedule.cancel();
        self.recorder.clear();
        self.last_report_at = None;
        self.state = EngineState::Idle;
        info!("profiler stopped");
        true
    }

    /// Empties every series without touching the lifecycle.
    pub fn reset(&mut self) {
        self.recorder.clear();
        self.last_report_at = None;
        self.dropped_samples = 0;
        debug!("profiler store reset");
    }

    /// Ingests one render sample. Never fails toward the caller.
    pub fn record(&mut self, sample: Sample) -> Option<Advisory> {
        if !self.is_active() {
            self.dropped_samples += 1;
            debug!(key = %sample.key, "profiler idle, dropping sample");
            return None;
        }

        match self.recorder.record(sample, &self.analyzer) {
            Ok(advisory) => advisory,
            Err(e) => {
                self.dropped_samples += 1;
                warn!("dropping malformed render sample: {}", e);
                None
            }
        }
    }

    /// Snapshot of every tracked key, stamped with the current clock.
    pub fn generate_report(&mut self) -> Vec<Report> {
        let now = self.clock.now_ms();
        let reports = generate_reports(&self.recorder, self.config.threshold_ms, now);
        self.last_report_at = Some(now);
        reports
    }

    /// Fires a tick if one is due at the clock's current time.
    pub fn advance(&mut self) -> bool {
        if !self.schedule.poll(self.clock.now_ms()) {
            return false;
        }
        let reports = self.generate_report();
        debug!(reports = reports.len(), "report tick");
        if let Some(sink) = self.sink.as_mut() {
            sink.deliver(reports);
        }
        true
    }

    /// Time left before the next tick, `None` while idle.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.schedule
            .remaining(self.clock.now_ms())
            .map(Duration::from_millis)
    }

    /// Applies `update` from now on and returns the new effective configuration.
    pub fn reconfigure(&mut self, update: ConfigUpdate) -> ProfilerConfig {
        let next = self.config.apply(update);
        if next.threshold_ms != self.config.threshold_ms {
            self.analyzer = WindowAnalyzer::new(next.threshold_ms);
        }
        if next.report_interval_ms != self.config.report_interval_ms {
            self.schedule
                .set_interval(next.report_interval_ms, self.clock.now_ms());
        }
        info!(
            interval_ms = next.report_interval_ms,
            threshold_ms = next.threshold_ms,
            "profiler reconfigured"
        );
        self.config = next;
        next
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        self.stop();
    }
}
