use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct PendingValue<T> {
    due_at: Instant,
    value: T,
}

/// Holds back a changing value until it has been stable for `delay`.
///
/// Every `push` replaces the pending value and restarts the timer; there is
/// never more than one timer. The caller drives time through `poll`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<PendingValue<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(PendingValue {
            due_at: now + self.delay,
            value,
        });
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Emits the settled value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        match self.deadline() {
            Some(due_at) => due_at.saturating_duration_since(now).min(default_timeout),
            None => default_timeout,
        }
    }
}
