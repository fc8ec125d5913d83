use crate::catalog::SearchService;
use crate::config::WidgetConfig;
use crate::core::candidates::CandidateList;
use crate::core::commit::{CommitScope, SelectionCommitter};
use crate::core::coordinator::{Outcome, RequestCoordinator, RequestHandle, Resolution};
use crate::core::debounce::Debouncer;
use crate::core::navigation::{NavCommand, NavOutcome, NavigationController};
use crate::core::query::{Query, QueryEdit};
use crate::core::state::{QueryChange, SearchStateMachine, WidgetState};
use crate::core::suggestion::Suggestion;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::aria::{self, ComboboxA11y};
use crate::ui::scroll::ScrollState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

type SelectCallback<T> = Box<dyn FnMut(&Suggestion<T>)>;
type ClearCallback = Box<dyn FnMut()>;

/// Type-ahead search widget: a text input backed by an asynchronous
/// lookup, with a keyboard and mouse navigable candidate list.
///
/// The widget is driven from one thread. Lookups run on worker threads and
/// only reach the widget through [`Autocomplete::poll_responses`] or
/// [`Autocomplete::wait_for_response`].
pub struct Autocomplete<T> {
    config: WidgetConfig,
    query: Query,
    debouncer: Debouncer<String>,
    machine: SearchStateMachine,
    coordinator: RequestCoordinator<T>,
    candidates: CandidateList<T>,
    scroll: ScrollState,
    pending_click: Option<usize>,
    selection: Option<Suggestion<T>>,
    on_select: Option<SelectCallback<T>>,
    on_clear: Option<ClearCallback>,
}

impl<T: Send + 'static> Autocomplete<T> {
    pub fn new(service: impl SearchService<Item = T>, config: WidgetConfig) -> Self {
        Self::from_arc(Arc::new(service), config)
    }

    pub fn from_arc(service: Arc<dyn SearchService<Item = T>>, config: WidgetConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce()),
            machine: SearchStateMachine::new(config.min_query_length),
            coordinator: RequestCoordinator::from_arc(service),
            candidates: CandidateList::new(),
            scroll: ScrollState::new(Some(config.max_visible.max(1))),
            query: Query::default(),
            pending_click: None,
            selection: None,
            on_select: None,
            on_clear: None,
            config,
        }
    }

    /// Pre-fills the input with the label of `initial` and makes it the
    /// current selection. No lookup is issued for it.
    pub fn with_initial_value(mut self, initial: Suggestion<T>) -> Self {
        self.query.set(initial.label.clone());
        self.selection = Some(initial);
        self
    }

    pub fn with_on_select(mut self, callback: impl FnMut(&Suggestion<T>) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn with_on_clear(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_clear = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn candidates(&self) -> &CandidateList<T> {
        &self.candidates
    }

    pub fn selection(&self) -> Option<&Suggestion<T>> {
        self.selection.as_ref()
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn is_focused(&self) -> bool {
        self.machine.is_focused()
    }

    pub fn pending_request(&self) -> Option<&RequestHandle> {
        self.coordinator.current()
    }

    pub fn latest_generation(&self) -> u64 {
        self.coordinator.latest_generation()
    }

    pub fn state(&self) -> WidgetState {
        self.machine.state(&self.query, self.coordinator.status())
    }

    /// Reason of the last failed lookup, while the widget shows it.
    pub fn failure_message(&self) -> Option<&str> {
        if self.state() == WidgetState::Failed {
            self.coordinator.last_failure()
        } else {
            None
        }
    }

    pub fn accessibility(&self) -> ComboboxA11y {
        aria::describe(self.config.id_prefix.as_str(), self.state(), &self.candidates)
    }

    /// How long the host may sleep before [`Autocomplete::tick`] has work.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.debouncer.poll_timeout(now, default_timeout)
    }

    pub fn focus(&mut self, _now: Instant) -> bool {
        if !self.machine.focus() {
            return false;
        }
        self.pending_click = None;
        if self.machine.may_search(self.query.as_str()) {
            self.coordinator.search(self.query.as_str());
        }
        true
    }

    /// Focus left the widget. A pending candidate click commits first; any
    /// other blur discards transient search state.
    pub fn blur(&mut self) -> bool {
        if let Some(index) = self.pending_click.take() {
            return self.commit(index);
        }
        if !self.machine.blur() {
            return false;
        }
        debug!("blurred, discarding search state");
        self.discard_results();
        true
    }

    /// Replaces the whole query text.
    pub fn set_query(&mut self, text: impl Into<String>, now: Instant) {
        self.query.set(text);
        self.query_changed(now);
    }

    pub fn edit(&mut self, edit: QueryEdit, now: Instant) -> bool {
        if !self.query.apply(edit) {
            return false;
        }
        if edit.changes_text() {
            self.query_changed(now);
        }
        true
    }

    pub fn delete_word_left(&mut self, now: Instant) -> bool {
        self.edit(QueryEdit::DeleteWordLeft, now)
    }

    /// Text editing keys for the input. Navigation keys are resolved
    /// elsewhere into [`NavCommand`]s.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if !self.machine.is_focused() {
            return false;
        }
        let Some(edit) = edit_for_key(key) else {
            return false;
        };
        self.edit(edit, now)
    }

    /// Fires the debouncer. Returns true when a lookup was issued.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(settled) = self.debouncer.poll(now) else {
            return false;
        };
        if !self.machine.may_search(settled.as_str()) || settled != self.query.as_str() {
            return false;
        }
        self.coordinator.search(settled.as_str());
        true
    }

    /// Applies whatever lookup finished since the last call.
    pub fn poll_responses(&mut self) -> bool {
        match self.coordinator.poll() {
            Some(resolution) => {
                self.apply(resolution);
                true
            }
            None => false,
        }
    }

    /// Blocks up to `timeout` for the current lookup.
    pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
        match self.coordinator.wait(timeout) {
            Some(resolution) => {
                self.apply(resolution);
                true
            }
            None => false,
        }
    }

    pub fn navigate(&mut self, command: NavCommand) -> NavOutcome {
        if !self.machine.is_focused() {
            return NavOutcome::Unchanged;
        }
        let outcome = NavigationController::apply(command, &mut self.candidates, &mut self.scroll);
        match outcome {
            NavOutcome::Commit(index) => {
                self.commit(index);
            }
            NavOutcome::Cancel => self.clear(),
            NavOutcome::Unchanged | NavOutcome::Highlighted(_) => {}
        }
        outcome
    }

    /// Pointer went down on a candidate. The commit happens on the blur that
    /// follows, so the press must be recorded before focus moves.
    pub fn press_candidate(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() {
            return false;
        }
        self.pending_click = Some(index);
        true
    }

    pub fn click_candidate(&mut self, index: usize) -> bool {
        self.pending_click = None;
        self.commit(index)
    }

    /// Empties the input and forgets the selection.
    pub fn clear(&mut self) {
        self.query.clear();
        self.discard_results();
        self.selection = None;
        info!("selection cleared");
        if let Some(callback) = self.on_clear.as_mut() {
            callback();
        }
    }

    fn query_changed(&mut self, now: Instant) {
        self.pending_click = None;
        match self.machine.classify(&self.query) {
            QueryChange::Reset | QueryChange::Gate => self.discard_results(),
            QueryChange::Debounce => {
                // Results for another query must not stay navigable while this one settles.
                if self.coordinator.latest_query() != Some(self.query.as_str()) {
                    self.discard_results();
                }
                self.debouncer.push(self.query.as_str().to_string(), now);
            }
        }
    }

    fn discard_results(&mut self) {
        self.debouncer.cancel();
        self.coordinator.reset();
        self.candidates.clear();
        self.scroll.reset();
        self.pending_click = None;
    }

    fn apply(&mut self, resolution: Resolution<T>) {
        self.pending_click = None;
        self.scroll.reset();
        match resolution.outcome {
            Outcome::Matches(items) => self.candidates.replace(items),
            Outcome::NoMatches | Outcome::Failed(_) => self.candidates.clear(),
        }
    }

    fn commit(&mut self, index: usize) -> bool {
        let scope = CommitScope {
            query: &mut self.query,
            candidates: &mut self.candidates,
            machine: &mut self.machine,
            debouncer: &mut self.debouncer,
            coordinator: &mut self.coordinator,
        };
        let Some(suggestion) = SelectionCommitter::commit(scope, index) else {
            return false;
        };
        self.scroll.reset();
        self.pending_click = None;
        if let Some(callback) = self.on_select.as_mut() {
            callback(&suggestion);
        }
        self.selection = Some(suggestion);
        true
    }
}

fn edit_for_key(key: KeyEvent) -> Option<QueryEdit> {
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) if !ch.is_control() => Some(QueryEdit::Insert(ch)),
        KeyCode::Backspace => Some(QueryEdit::Backspace),
        KeyCode::Delete => Some(QueryEdit::Delete),
        KeyCode::Left => Some(QueryEdit::Left),
        KeyCode::Right => Some(QueryEdit::Right),
        KeyCode::Home => Some(QueryEdit::Home),
        KeyCode::End => Some(QueryEdit::End),
        _ => None,
    }
}
