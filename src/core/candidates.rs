use crate::core::suggestion::Suggestion;

/// Suggestions in source order plus the highlighted position.
///
/// `highlighted` is always `None` or a valid index into `items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList<T> {
    items: Vec<Suggestion<T>>,
    highlighted: Option<usize>,
}

impl<T> Default for CandidateList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            highlighted: None,
        }
    }
}

impl<T> CandidateList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Suggestion<T>>) -> Self {
        Self {
            items,
            highlighted: None,
        }
    }

    /// Replaces the whole set; a fresh set never carries a highlight over.
    pub fn replace(&mut self, items: Vec<Suggestion<T>>) {
        self.items = items;
        self.highlighted = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.highlighted = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Suggestion<T>] {
        self.items.as_slice()
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion<T>> {
        self.items.get(index)
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&Suggestion<T>> {
        self.highlighted.and_then(|index| self.items.get(index))
    }

    /// Returns false (and leaves the highlight alone) for out-of-range indexes.
    pub fn set_highlight(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(index) if index >= self.items.len() => false,
            _ => {
                self.highlighted = index;
                true
            }
        }
    }

    /// Removes the entry at `index` and empties the list.
    pub fn take(&mut self, index: usize) -> Option<Suggestion<T>> {
        if index >= self.items.len() {
            return None;
        }
        self.highlighted = None;
        std::mem::take(&mut self.items).into_iter().nth(index)
    }
}
