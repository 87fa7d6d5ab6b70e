use crate::refresh_clock::interface::RefreshClock;
use std::time::{Duration, Instant};

/// Fixed-rate ticker. A tick that is already overdue fires immediately, and
/// the schedule restarts from there instead of bursting to catch up.
pub struct RefreshClockInterval {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl RefreshClockInterval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
        }
    }
}

impl RefreshClock for RefreshClockInterval {
    fn wait_next(&mut self) -> Instant {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);

        let fired_at = if deadline > now {
            std::thread::sleep(deadline - now);
            Instant::now()
        } else {
            now
        };

        self.next_deadline = Some(fired_at + self.period);
        fired_at
    }
}
