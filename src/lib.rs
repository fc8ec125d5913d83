pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod task;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::catalog::SearchService;
pub use crate::config::{AppConfig, WidgetConfig};
pub use crate::core::{NavCommand, Suggestion, WidgetState};
pub use crate::error::SearchError;
pub use crate::widgets::Autocomplete;
