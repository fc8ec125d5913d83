use crate::catalog::SearchService;
use crate::core::state::LookupStatus;
use crate::core::suggestion::Suggestion;
use crate::error::SearchError;
use crate::task::{CancelToken, Completion, SearchExecutor};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// The one lookup currently allowed to change visible state.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    generation: u64,
    query: String,
    cancel: CancelToken,
}

impl RequestHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    pub fn abort(&self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Matches(Vec<Suggestion<T>>),
    NoMatches,
    Failed(String),
}

/// An outcome that passed the generation check and may be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<T> {
    pub generation: u64,
    pub query: String,
    pub outcome: Outcome<T>,
}

/// Issues one cancellable lookup per settled query and lets only the most
/// recently issued one resolve.
pub struct RequestCoordinator<T> {
    service: Arc<dyn SearchService<Item = T>>,
    executor: SearchExecutor<T>,
    generation: u64,
    current: Option<RequestHandle>,
    latest_query: Option<String>,
    status: LookupStatus,
    last_failure: Option<String>,
}

impl<T: Send + 'static> RequestCoordinator<T> {
    pub fn new(service: impl SearchService<Item = T>) -> Self {
        Self::from_arc(Arc::new(service))
    }

    pub fn from_arc(service: Arc<dyn SearchService<Item = T>>) -> Self {
        Self {
            service,
            executor: SearchExecutor::new(),
            generation: 0,
            current: None,
            latest_query: None,
            status: LookupStatus::Idle,
            last_failure: None,
        }
    }

    /// Aborts whatever is in flight and starts a lookup for `query`.
    pub fn search(&mut self, query: &str) -> u64 {
        if let Some(previous) = self.current.take() {
            debug!(
                generation = previous.generation,
                query = previous.query.as_str(),
                "superseding in-flight search"
            );
            previous.abort();
        }

        self.generation = self.generation.saturating_add(1);
        let generation = self.generation;
        let cancel = CancelToken::new();
        self.current = Some(RequestHandle {
            generation,
            query: query.to_string(),
            cancel: cancel.clone(),
        });
        self.latest_query = Some(query.to_string());
        self.status = LookupStatus::Pending;
        self.last_failure = None;

        debug!(generation, query, "issuing search");
        let service = Arc::clone(&self.service);
        let owned_query = query.to_string();
        self.executor.spawn(generation, move || {
            cancel.check()?;
            service.search(owned_query.as_str(), &cancel)
        });
        generation
    }

    /// Aborts the in-flight lookup, if any; its result will be ignored.
    pub fn cancel(&mut self) -> bool {
        let Some(handle) = self.current.take() else {
            return false;
        };
        debug!(generation = handle.generation, "cancelling search");
        handle.abort();
        if self.status == LookupStatus::Pending {
            self.status = LookupStatus::Idle;
        }
        true
    }

    /// Cancels and forgets the last outcome.
    pub fn reset(&mut self) {
        self.cancel();
        self.latest_query = None;
        self.status = LookupStatus::Idle;
        self.last_failure = None;
    }

    pub fn current(&self) -> Option<&RequestHandle> {
        self.current.as_ref()
    }

    /// Query of the most recently issued lookup, pending or resolved.
    pub fn latest_query(&self) -> Option<&str> {
        self.latest_query.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> LookupStatus {
        self.status
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Drains finished lookups without blocking.
    pub fn poll(&mut self) -> Option<Resolution<T>> {
        let mut applied = None;
        for completion in self.executor.drain_ready() {
            if let Some(resolution) = self.accept(completion) {
                applied = Some(resolution);
            }
        }
        applied
    }

    /// Blocks up to `timeout` for the current lookup to resolve. Stale
    /// completions arriving meanwhile are dropped.
    pub fn wait(&mut self, timeout: Duration) -> Option<Resolution<T>> {
        let deadline = Instant::now() + timeout;
        while self.current.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let completion = self.executor.recv_timeout(remaining)?;
            if let Some(resolution) = self.accept(completion) {
                return Some(resolution);
            }
        }
        None
    }

    fn accept(&mut self, completion: Completion<T>) -> Option<Resolution<T>> {
        let is_current = self
            .current
            .as_ref()
            .is_some_and(|handle| handle.generation == completion.generation);
        if !is_current {
            trace!(
                generation = completion.generation,
                latest = self.generation,
                "dropping stale search result"
            );
            return None;
        }
        let handle = self.current.take()?;

        let outcome = match completion.result {
            Ok(items) if items.is_empty() => Outcome::NoMatches,
            Ok(items) => Outcome::Matches(items),
            Err(SearchError::Cancelled) => {
                debug!(generation = handle.generation, "search cancelled by transport");
                self.status = LookupStatus::Idle;
                return None;
            }
            Err(SearchError::Failed { reason }) => {
                warn!(generation = handle.generation, reason = reason.as_str(), "search failed");
                Outcome::Failed(reason)
            }
        };

        match &outcome {
            Outcome::Matches(items) => {
                debug!(generation = handle.generation, count = items.len(), "search resolved");
                self.status = LookupStatus::Matched;
            }
            Outcome::NoMatches => {
                debug!(generation = handle.generation, "search found nothing");
                self.status = LookupStatus::NoMatches;
            }
            Outcome::Failed(reason) => {
                self.status = LookupStatus::Failed;
                self.last_failure = Some(reason.clone());
            }
        }

        Some(Resolution {
            generation: handle.generation,
            query: handle.query,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, RequestCoordinator};
    use crate::catalog::SearchService;
    use crate::core::state::LookupStatus;
    use crate::core::suggestion::Suggestion;
    use crate::error::SearchError;
    use crate::task::CancelToken;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::time::Duration;

    type Reply = Result<Vec<Suggestion<u32>>, SearchError>;

    /// Each query blocks until the test releases its reply.
    #[derive(Default)]
    struct GatedService {
        gates: Mutex<HashMap<String, Receiver<Reply>>>,
    }

    impl GatedService {
        fn gate(&self, query: &str) -> Sender<Reply> {
            let (tx, rx) = mpsc::channel();
            self.gates
                .lock()
                .expect("gates")
                .insert(query.to_string(), rx);
            tx
        }
    }

    impl SearchService for GatedService {
        type Item = u32;

        fn search(&self, query: &str, cancel: &CancelToken) -> Reply {
            let gate = self.gates.lock().expect("gates").remove(query);
            let Some(gate) = gate else {
                return Err(SearchError::failed("no gate"));
            };
            let reply = gate
                .recv()
                .unwrap_or_else(|_| Err(SearchError::failed("gate dropped")));
            cancel.check()?;
            reply
        }
    }

    fn setup() -> (Arc<GatedService>, RequestCoordinator<u32>) {
        let service = Arc::new(GatedService::default());
        let shared: Arc<dyn SearchService<Item = u32>> = service.clone();
        (service, RequestCoordinator::from_arc(shared))
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn late_response_for_older_generation_is_dropped() {
        let (service, mut coordinator) = setup();
        let de = service.gate("de");
        let fr = service.gate("fr");

        let first = coordinator.search("de");
        let second = coordinator.search("fr");
        assert!(second > first);

        fr.send(Ok(vec![Suggestion::new("France", 250)])).expect("send");
        let resolution = coordinator.wait(WAIT).expect("fr resolves");
        assert_eq!(resolution.generation, second);
        assert_eq!(resolution.query, "fr");

        de.send(Ok(vec![Suggestion::new("Germany", 276)])).expect("send");
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(coordinator.poll(), None);
        assert_eq!(coordinator.status(), LookupStatus::Matched);
    }

    #[test]
    fn only_one_handle_is_current() {
        let (service, mut coordinator) = setup();
        let _a = service.gate("ab");
        let _b = service.gate("abc");
        coordinator.search("ab");
        let latest = coordinator.search("abc");
        let current = coordinator.current().expect("current");
        assert_eq!(current.generation(), latest);
        assert_eq!(current.query(), "abc");
        assert_eq!(coordinator.status(), LookupStatus::Pending);
    }

    #[test]
    fn latest_query_survives_resolution_until_reset() {
        let (service, mut coordinator) = setup();
        let fr = service.gate("fr");
        assert_eq!(coordinator.latest_query(), None);
        coordinator.search("fr");
        fr.send(Ok(vec![Suggestion::new("France", 250)])).expect("send");
        coordinator.wait(WAIT).expect("resolves");
        assert_eq!(coordinator.latest_query(), Some("fr"));

        coordinator.reset();
        assert_eq!(coordinator.latest_query(), None);
    }

    #[test]
    fn empty_result_is_no_matches_not_failure() {
        let (service, mut coordinator) = setup();
        let zz = service.gate("zz");
        coordinator.search("zz");
        zz.send(Ok(Vec::new())).expect("send");
        let resolution = coordinator.wait(WAIT).expect("resolves");
        assert_eq!(resolution.outcome, Outcome::NoMatches);
        assert_eq!(coordinator.status(), LookupStatus::NoMatches);
        assert_eq!(coordinator.last_failure(), None);
    }

    #[test]
    fn failure_is_reported_with_reason() {
        let (service, mut coordinator) = setup();
        let fr = service.gate("fr");
        coordinator.search("fr");
        fr.send(Err(SearchError::failed("HTTP status 500"))).expect("send");
        let resolution = coordinator.wait(WAIT).expect("resolves");
        assert_eq!(resolution.outcome, Outcome::Failed("HTTP status 500".to_string()));
        assert_eq!(coordinator.status(), LookupStatus::Failed);
        assert_eq!(coordinator.last_failure(), Some("HTTP status 500"));
    }

    #[test]
    fn cancelled_search_is_silent() {
        let (service, mut coordinator) = setup();
        let fr = service.gate("fr");
        coordinator.search("fr");
        assert!(coordinator.cancel());
        assert_eq!(coordinator.status(), LookupStatus::Idle);

        fr.send(Ok(vec![Suggestion::new("France", 250)])).expect("send");
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(coordinator.poll(), None);
        assert_eq!(coordinator.status(), LookupStatus::Idle);
        assert_eq!(coordinator.last_failure(), None);
    }

    #[test]
    fn transport_cancellation_of_current_request_is_not_a_failure() {
        let (service, mut coordinator) = setup();
        let fr = service.gate("fr");
        coordinator.search("fr");
        fr.send(Err(SearchError::Cancelled)).expect("send");
        assert_eq!(coordinator.wait(WAIT), None);
        assert!(!coordinator.is_pending());
        assert_eq!(coordinator.status(), LookupStatus::Idle);
    }
}
