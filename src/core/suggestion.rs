use serde::{Deserialize, Serialize};

/// A selectable entry: a display label plus a payload the widget never inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion<T> {
    pub label: String,
    pub value: T,
}

impl<T> Suggestion<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}
