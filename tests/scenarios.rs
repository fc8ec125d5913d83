use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use typeahead::catalog::SearchService;
use typeahead::config::WidgetConfig;
use typeahead::core::{NavCommand, NavOutcome, Suggestion, WidgetState};
use typeahead::error::SearchError;
use typeahead::task::CancelToken;
use typeahead::widgets::Autocomplete;

type Reply = Result<Vec<Suggestion<String>>, SearchError>;

const WAIT: Duration = Duration::from_secs(5);

/// Lookups block until the test releases a reply for their query, so the
/// order in which responses arrive is chosen by the test.
#[derive(Default)]
struct ScriptedService {
    gates: Mutex<HashMap<String, Receiver<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn gate(&self, query: &str) -> Sender<Reply> {
        let (tx, rx) = mpsc::channel();
        self.gates
            .lock()
            .expect("gates")
            .insert(query.to_string(), rx);
        tx
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls").clone()
    }
}

impl SearchService for ScriptedService {
    type Item = String;

    fn search(&self, query: &str, _cancel: &CancelToken) -> Reply {
        self.calls.lock().expect("calls").push(query.to_string());
        let gate = self.gates.lock().expect("gates").remove(query);
        match gate {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(SearchError::failed("gate dropped"))),
            None => Ok(Vec::new()),
        }
    }
}

fn country(label: &str) -> Suggestion<String> {
    Suggestion::new(label, label.to_lowercase())
}

fn setup(config: WidgetConfig) -> (Arc<ScriptedService>, Autocomplete<String>) {
    let service = Arc::new(ScriptedService::default());
    let shared: Arc<dyn SearchService<Item = String>> = service.clone();
    (service, Autocomplete::from_arc(shared, config))
}

/// Waits until the service has seen `count` calls.
fn await_calls(service: &ScriptedService, count: usize) {
    let deadline = Instant::now() + WAIT;
    while service.calls().len() < count {
        assert!(Instant::now() < deadline, "service never called");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn france_is_found_highlighted_and_committed() {
    let (service, widget) = setup(WidgetConfig::default());
    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&selected);
    let mut widget = widget.with_on_select(move |suggestion: &Suggestion<String>| {
        sink.borrow_mut().push(suggestion.clone());
    });
    let release = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(!widget.tick(start + Duration::from_millis(499)));
    assert!(widget.tick(start + Duration::from_millis(500)));
    assert_eq!(widget.state(), WidgetState::Searching);

    release.send(Ok(vec![country("France")])).expect("release");
    assert!(widget.wait_for_response(WAIT));

    assert_eq!(widget.state(), WidgetState::Results);
    assert_eq!(widget.candidates().len(), 1);
    assert_eq!(widget.candidates().highlighted(), None);

    assert_eq!(widget.navigate(NavCommand::MoveDown), NavOutcome::Highlighted(0));
    assert_eq!(widget.navigate(NavCommand::Commit), NavOutcome::Commit(0));

    assert_eq!(*selected.borrow(), vec![country("France")]);
    assert_eq!(widget.state(), WidgetState::Idle);
    assert_eq!(widget.query().as_str(), "France");
    assert_eq!(service.calls(), vec!["fr".to_string()]);
}

#[test]
fn fast_typing_issues_one_search_for_the_last_value() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release = service.gate("fra");

    let start = Instant::now();
    widget.focus(start);
    for (offset, text) in [(0, "f"), (100, "fr"), (200, "fra")] {
        let now = start + Duration::from_millis(offset);
        assert!(!widget.tick(now));
        widget.set_query(text, now);
    }
    assert!(!widget.tick(start + Duration::from_millis(650)));
    assert!(widget.tick(start + Duration::from_millis(700)));
    assert!(!widget.tick(start + Duration::from_millis(2000)));

    release.send(Ok(vec![country("France")])).expect("release");
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(service.calls(), vec!["fra".to_string()]);
    assert_eq!(widget.latest_generation(), 1);
}

#[test]
fn late_response_for_an_older_query_is_ignored() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release_de = service.gate("de");
    let release_fr = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("de", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    await_calls(&service, 1);

    let later = start + Duration::from_millis(600);
    widget.set_query("fr", later);
    assert!(widget.tick(later + Duration::from_millis(500)));
    await_calls(&service, 2);

    release_fr.send(Ok(vec![country("France")])).expect("release fr");
    assert!(widget.wait_for_response(WAIT));
    release_de
        .send(Ok(vec![country("Denmark"), country("Germany")]))
        .expect("release de");

    thread::sleep(Duration::from_millis(50));
    assert!(!widget.poll_responses());
    assert_eq!(widget.state(), WidgetState::Results);
    let labels: Vec<&str> = widget
        .candidates()
        .items()
        .iter()
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(labels, vec!["France"]);
}

#[test]
fn committing_the_first_candidate_works() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release = service.gate("ge");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("ge", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    release
        .send(Ok(vec![country("Georgia"), country("Germany")]))
        .expect("release");
    assert!(widget.wait_for_response(WAIT));

    widget.navigate(NavCommand::MoveDown);
    widget.navigate(NavCommand::MoveDown);
    assert_eq!(widget.navigate(NavCommand::MoveDown), NavOutcome::Highlighted(0));
    assert_eq!(widget.navigate(NavCommand::Commit), NavOutcome::Commit(0));
    assert_eq!(widget.selection().map(|s| s.label.as_str()), Some("Georgia"));
}

#[test]
fn short_queries_never_search() {
    let (service, mut widget) = setup(WidgetConfig::default().with_min_query_length(3));

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(!widget.tick(start + Duration::from_secs(5)));
    assert_eq!(widget.state(), WidgetState::Gated);
    assert!(service.calls().is_empty());
}

#[test]
fn clearing_the_query_empties_candidates_at_once() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    release.send(Ok(vec![country("France")])).expect("release");
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(widget.candidates().len(), 1);

    widget.set_query("", start + Duration::from_millis(600));
    assert!(widget.candidates().is_empty());
    assert_ne!(widget.state(), WidgetState::Results);
}

#[test]
fn failure_and_no_matches_are_distinct() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release_fail = service.gate("xx");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("xx", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    release_fail
        .send(Err(SearchError::failed("HTTP status 503")))
        .expect("release");
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(widget.state(), WidgetState::Failed);
    assert_eq!(widget.failure_message(), Some("HTTP status 503"));

    let later = start + Duration::from_secs(1);
    widget.set_query("zz", later);
    assert!(widget.tick(later + Duration::from_millis(500)));
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(widget.state(), WidgetState::Empty);
    assert_eq!(widget.failure_message(), None);
}

#[test]
fn blur_during_search_drops_the_response() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    await_calls(&service, 1);

    assert!(widget.blur());
    release.send(Ok(vec![country("France")])).expect("release");
    thread::sleep(Duration::from_millis(50));
    assert!(!widget.poll_responses());
    assert_eq!(widget.state(), WidgetState::Idle);
    assert!(widget.candidates().is_empty());
}

#[test]
fn click_on_candidate_survives_the_blur_it_causes() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let release = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    release
        .send(Ok(vec![country("France"), country("French Guiana")]))
        .expect("release");
    assert!(widget.wait_for_response(WAIT));

    assert!(widget.press_candidate(1));
    assert!(widget.blur());
    assert_eq!(widget.query().as_str(), "French Guiana");
    assert_eq!(widget.selection().map(|s| s.value.as_str()), Some("french guiana"));
}

#[test]
fn refocus_after_blur_searches_again_without_old_candidates() {
    let (service, mut widget) = setup(WidgetConfig::default());
    let first = service.gate("fr");

    let start = Instant::now();
    widget.focus(start);
    widget.set_query("fr", start);
    assert!(widget.tick(start + Duration::from_millis(500)));
    first.send(Ok(vec![country("France")])).expect("release first");
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(widget.state(), WidgetState::Results);

    assert!(widget.blur());
    assert_eq!(widget.state(), WidgetState::Idle);
    assert!(widget.candidates().is_empty());
    assert_eq!(widget.query().as_str(), "fr");

    let second = service.gate("fr");
    assert!(widget.focus(start + Duration::from_secs(1)));
    assert_eq!(widget.state(), WidgetState::Searching);
    assert!(widget.candidates().is_empty());
    assert_eq!(widget.latest_generation(), 2);

    second
        .send(Ok(vec![country("France"), country("French Guiana")]))
        .expect("release second");
    assert!(widget.wait_for_response(WAIT));
    assert_eq!(widget.state(), WidgetState::Results);
    assert_eq!(widget.candidates().len(), 2);
    assert_eq!(service.calls(), vec!["fr".to_string(), "fr".to_string()]);
}
