use crate::catalog::SearchService;
use crate::core::suggestion::Suggestion;
use crate::error::SearchError;
use crate::task::CancelToken;
use std::thread;
use std::time::{Duration, Instant};

const LATENCY_STEP: Duration = Duration::from_millis(10);

/// In-memory catalog: case-insensitive substring match, source order kept.
#[derive(Debug, Clone)]
pub struct StaticCatalog<T> {
    entries: Vec<Suggestion<T>>,
    latency: Duration,
}

impl<T> StaticCatalog<T> {
    pub fn new(entries: Vec<Suggestion<T>>) -> Self {
        Self {
            entries,
            latency: Duration::ZERO,
        }
    }

    /// Simulates a slow backend; the wait observes cancellation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn wait_latency(&self, cancel: &CancelToken) -> Result<(), SearchError> {
        let until = Instant::now() + self.latency;
        loop {
            cancel.check()?;
            let remaining = until.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            thread::sleep(remaining.min(LATENCY_STEP));
        }
    }
}

impl<T> SearchService for StaticCatalog<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn search(
        &self,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Suggestion<T>>, SearchError> {
        self.wait_latency(cancel)?;

        let needle = query.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.label.to_lowercase().contains(needle.as_str()))
            .cloned()
            .collect())
    }
}
