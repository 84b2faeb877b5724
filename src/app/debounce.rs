use std::time::Duration;
use tokio::time::Instant;

/// Default quiet period for search input.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debounce: only the latest scheduled value is kept, and it
/// becomes due `delay` after it was scheduled.
///
/// Scheduling again replaces the pending value and restarts the delay, so a
/// superseded value is dropped rather than queued. Uses tokio's clock so
/// tests can drive it with paused time.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `value`, cancelling any pending one.
    ///
    /// Returns true if a pending value was superseded.
    pub fn schedule(&mut self, value: T) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some((Instant::now() + self.delay, value));
        superseded
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
