use crate::library::cancellation::CancellationToken;
use crate::refresh_clock::interface::RefreshClock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Ticks immediately and counts how often it was asked to. Can cancel a
/// session once a given number of ticks has been handed out.
#[derive(Debug, Clone, Default)]
pub struct RefreshClockFake {
    ticks: Arc<AtomicUsize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RefreshClockFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(mut self, ticks: usize, cancel: CancellationToken) -> Self {
        self.cancel_after = Some((ticks, cancel));
        self
    }

    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl RefreshClock for RefreshClockFake {
    fn wait_next(&mut self) -> Instant {
        let ticks = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, cancel)) = &self.cancel_after {
            if ticks > *limit {
                cancel.cancel();
            }
        }
        Instant::now()
    }
}
