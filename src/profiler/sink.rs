use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::report::Report;

/// Receives each report batch. Called inline on the profiler's context, so
/// implementations should hand work off rather than block.
pub trait ReportSink: Send {
    fn deliver(&mut self, reports: Vec<Report>);
}

impl<F> ReportSink for F
where
    F: FnMut(Vec<Report>) + Send,
{
    fn deliver(&mut self, reports: Vec<Report>) {
        self(reports)
    }
}

/// Forwards batches into a bounded channel. A full channel drops the batch.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Vec<Report>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Vec<Report>>) -> Self {
        Self { tx }
    }
}

impl ReportSink for ChannelSink {
    fn deliver(&mut self, reports: Vec<Report>) {
        match self.tx.try_send(reports) {
            Ok(()) => {}
            Err(TrySendError::Full(batch)) => {
                warn!(reports = batch.len(), "report consumer is behind, dropping batch");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("report consumer has gone away");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(key: &str) -> Vec<Report> {
        vec![Report {
            key: key.to_string(),
            average_duration: 1.0,
            sample_count: 1,
            suggestions: Vec::new(),
            generated_at: 0,
        }]
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |reports: Vec<Report>| seen.push(reports.len());
            sink.deliver(batch("a"));
            sink.deliver(Vec::new());
        }
        assert_eq!(seen, vec![1, 0]);
    }

    #[test]
    fn channel_sink_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx);
        sink.deliver(batch("first"));
        sink.deliver(batch("second"));

        let received = rx.try_recv().expect("first batch queued");
        assert_eq!(received[0].key, "first");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_sink_tolerates_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        ChannelSink::new(tx).deliver(batch("orphan"));
    }
}
