use tracing::debug;

/// Deadline bookkeeping for periodic report ticks.
///
/// Holds no timer itself: a driver feeds it the current time and fires a tick
/// whenever `poll` says one is due. Ticks that were missed while the driver
/// was busy are skipped rather than queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    interval_ms: u64,
    next_due: Option<u64>,
}

impl ReportSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_due
    }

    /// First tick lands one full interval after `now`.
    pub fn arm(&mut self, now_ms: u64) {
        self.next_due = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Milliseconds until the next tick, zero when overdue, `None` when not armed.
    pub fn remaining(&self, now_ms: u64) -> Option<u64> {
        self.next_due.map(|due| due.saturating_sub(now_ms))
    }

    /// True at most once per call when a tick is due; moves the deadline past `now`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now_ms < due {
            return false;
        }

        let missed = (now_ms - due) / self.interval_ms;
        if missed > 0 {
            debug!(missed, "skipping missed report ticks");
        }
        self.next_due = Some(due.saturating_add(self.interval_ms.saturating_mul(missed + 1)));
        true
    }

    /// New interval, measured from `now` when armed.
    pub fn set_interval(&mut self, interval_ms: u64, now_ms: u64) {
        self.interval_ms = interval_ms.max(1);
        if self.is_armed() {
            self.arm(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_schedule_never_fires() {
        let mut schedule = ReportSchedule::new(100);
        assert!(!schedule.poll(1_000_000));
        assert_eq!(schedule.remaining(0), None);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut schedule = ReportSchedule::new(100);
        schedule.arm(0);
        assert!(!schedule.poll(99));
        assert!(schedule.poll(100));
        assert!(!schedule.poll(100));
        assert!(!schedule.poll(199));
        assert!(schedule.poll(200));
        assert_eq!(schedule.next_due(), Some(300));
    }

    #[test]
    fn missed_ticks_are_skipped_not_queued() {
        let mut schedule = ReportSchedule::new(100);
        schedule.arm(0);
        assert!(schedule.poll(450));
        assert!(!schedule.poll(450));
        assert_eq!(schedule.next_due(), Some(500));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut schedule = ReportSchedule::new(100);
        schedule.arm(0);
        assert!(schedule.cancel());
        assert!(!schedule.cancel());
        assert!(!schedule.poll(1_000));
    }

    #[test]
    fn interval_change_rearms_from_now() {
        let mut schedule = ReportSchedule::new(100);
        schedule.arm(0);
        schedule.set_interval(1_000, 50);
        assert_eq!(schedule.next_due(), Some(1_050));

        let mut idle = ReportSchedule::new(100);
        idle.set_interval(1_000, 50);
        assert!(!idle.is_armed());
    }
}
