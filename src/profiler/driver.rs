use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::engine::Profiler;
use super::report::Report;
use super::sample::Sample;
use crate::config::ConfigUpdate;

pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Everything the driver task reacts to besides its own timer.
#[derive(Debug)]
pub enum ProfilerEvent {
    Render(Sample),
    Reconfigure(ConfigUpdate),
    Reset,
    Snapshot(oneshot::Sender<Vec<Report>>),
}

/// Host-side handle to a spawned profiler.
///
/// Cloning is cheap. When every handle is dropped the driver stops on its own.
#[derive(Debug, Clone)]
pub struct ProfilerHandle {
    tx: mpsc::Sender<ProfilerEvent>,
    cancel: CancellationToken,
}

impl ProfilerHandle {
    /// Never blocks the render path. Returns false if the sample was not queued.
    pub fn on_render(&self, sample: Sample) -> bool {
        match self.tx.try_send(ProfilerEvent::Render(sample)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("profiler event queue full, dropping render sample");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub async fn reconfigure(&self, update: ConfigUpdate) -> bool {
        self.tx.send(ProfilerEvent::Reconfigure(update)).await.is_ok()
    }

    pub async fn reset(&self) -> bool {
        self.tx.send(ProfilerEvent::Reset).await.is_ok()
    }

    /// On-demand report outside the regular cadence. Empty if the driver is gone.
    pub async fn snapshot(&self) -> Vec<Report> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(ProfilerEvent::Snapshot(reply)).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    /// Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }
}

impl Profiler {
    /// Moves the profiler onto its own task. The task hands the stopped
    /// profiler back when it finishes.
    pub fn spawn(self) -> (ProfilerHandle, JoinHandle<Profiler>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let handle = ProfilerHandle {
            tx,
            cancel: cancel.clone(),
        };

        let task = tokio::spawn(async move {
            let mut profiler = self;
            profiler.run(rx, cancel).await;
            profiler
        });

        (handle, task)
    }

    /// Driver loop: sleeps to the next deadline, drains events in between,
    /// and stops the engine on cancellation or when all senders are gone.
    pub async fn run(&mut self, mut events: mpsc::Receiver<ProfilerEvent>, cancel: CancellationToken) {
        self.start();
        info!("profiler driver running");

        loop {
            let wait = self
                .time_until_next_tick()
                .unwrap_or_else(|| Duration::from_millis(self.config().report_interval_ms));

            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {
                    self.advance();
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        debug!("all profiler handles dropped");
                        break;
                    }
                },
            }
        }

        self.stop();
        info!("profiler driver exited");
    }

    fn handle_event(&mut self, event: ProfilerEvent) {
        match event {
            ProfilerEvent::Render(sample) => {
                self.record(sample);
            }
            ProfilerEvent::Reconfigure(update) => {
                self.reconfigure(update);
            }
            ProfilerEvent::Reset => self.reset(),
            ProfilerEvent::Snapshot(reply) => {
                let _ = reply.send(self.generate_report());
            }
        }
    }
}
