use crate::core::query::Query;
use serde::Serialize;

/// Observable mode of the widget. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Idle,
    Gated,
    Searching,
    Results,
    Empty,
    Failed,
}

impl WidgetState {
    pub fn shows_candidates(self) -> bool {
        self == Self::Results
    }
}

/// Where the latest lookup stands, as reported by the request coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Pending,
    Matched,
    NoMatches,
    Failed,
}

/// What a query edit should do to the search pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// Query is empty: drop everything now, without waiting for the debounce.
    Reset,
    /// Query is too short (or the input is not focused): nothing may be searched.
    Gate,
    /// Query is searchable once it settles.
    Debounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStateMachine {
    focused: bool,
    min_query_length: usize,
}

impl SearchStateMachine {
    pub fn new(min_query_length: usize) -> Self {
        Self {
            focused: false,
            min_query_length: min_query_length.max(1),
        }
    }

    pub fn min_query_length(&self) -> usize {
        self.min_query_length
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) -> bool {
        let changed = !self.focused;
        self.focused = true;
        changed
    }

    pub fn blur(&mut self) -> bool {
        let changed = self.focused;
        self.focused = false;
        changed
    }

    pub fn classify(&self, query: &Query) -> QueryChange {
        if query.is_empty() {
            QueryChange::Reset
        } else if self.focused && query.is_effective(self.min_query_length) {
            QueryChange::Debounce
        } else {
            QueryChange::Gate
        }
    }

    /// Guards the moment a settled value is about to become a request.
    pub fn may_search(&self, text: &str) -> bool {
        self.focused && text.chars().count() >= self.min_query_length
    }

    pub fn state(&self, query: &Query, lookup: LookupStatus) -> WidgetState {
        if !self.focused {
            return WidgetState::Idle;
        }
        if !query.is_effective(self.min_query_length) {
            return WidgetState::Gated;
        }
        match lookup {
            LookupStatus::Idle => WidgetState::Gated,
            LookupStatus::Pending => WidgetState::Searching,
            LookupStatus::Matched => WidgetState::Results,
            LookupStatus::NoMatches => WidgetState::Empty,
            LookupStatus::Failed => WidgetState::Failed,
        }
    }
}
