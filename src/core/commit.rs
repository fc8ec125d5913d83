use crate::core::candidates::CandidateList;
use crate::core::coordinator::RequestCoordinator;
use crate::core::debounce::Debouncer;
use crate::core::query::Query;
use crate::core::state::SearchStateMachine;
use crate::core::suggestion::Suggestion;
use tracing::info;

/// Mutable view of everything a commit tears down.
pub struct CommitScope<'a, T> {
    pub query: &'a mut Query,
    pub candidates: &'a mut CandidateList<T>,
    pub machine: &'a mut SearchStateMachine,
    pub debouncer: &'a mut Debouncer<String>,
    pub coordinator: &'a mut RequestCoordinator<T>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionCommitter;

impl SelectionCommitter {
    /// Finalizes the candidate at `index`.
    ///
    /// Returns `None` when there is nothing to commit, which is also what a
    /// second commit in the same tick sees: the list is already empty.
    pub fn commit<T: Send + 'static>(
        scope: CommitScope<'_, T>,
        index: usize,
    ) -> Option<Suggestion<T>> {
        let suggestion = scope.candidates.take(index)?;

        scope.machine.blur();
        scope.debouncer.cancel();
        scope.coordinator.reset();
        scope.query.set(suggestion.label.clone());

        info!(index, label = suggestion.label.as_str(), "selection committed");
        Some(suggestion)
    }
}
