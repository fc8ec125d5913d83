pub mod candidates;
pub mod commit;
pub mod coordinator;
pub mod debounce;
pub mod navigation;
pub mod query;
pub mod state;
pub mod suggestion;

pub use candidates::CandidateList;
pub use commit::{CommitScope, SelectionCommitter};
pub use coordinator::{Outcome, RequestCoordinator, RequestHandle, Resolution};
pub use debounce::Debouncer;
pub use navigation::{NavCommand, NavOutcome, NavigationController, Viewport};
pub use query::{Query, QueryEdit};
pub use state::{LookupStatus, QueryChange, SearchStateMachine, WidgetState};
pub use suggestion::Suggestion;
