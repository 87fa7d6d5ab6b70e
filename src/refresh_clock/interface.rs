use std::time::Instant;

/// The display-refresh signal the prediction loop schedules on.
pub trait RefreshClock: Send {
    /// Blocks until the next refresh opportunity and returns when it fired.
    fn wait_next(&mut self) -> Instant;
}
