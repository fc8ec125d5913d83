use crate::core::navigation::Viewport;

/// Window of candidate rows currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: usize,
    pub max_visible: Option<usize>,
}

impl ScrollState {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            offset: 0,
            max_visible,
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(limit) => {
                let start = self.offset.min(total);
                let end = (start + limit).min(total);
                (start, end)
            }
            None => (0, total),
        }
    }

    /// Maps a screen row inside the list back to a candidate index.
    pub fn index_at_row(&self, row: usize, total: usize) -> Option<usize> {
        let (start, end) = self.visible_range(total);
        let index = start + row;
        (index < end).then_some(index)
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        let can_up = start > 0;
        let can_down = end < total;
        let arrow = match (can_up, can_down) {
            (true, true) => " ↑↓",
            (true, false) => " ↑",
            (false, true) => " ↓",
            (false, false) => "",
        };
        Some(format!("[{}-{} of {}]{}", start + 1, end, total, arrow))
    }
}

impl Viewport for ScrollState {
    fn ensure_visible(&mut self, index: usize, total: usize) {
        let Some(max) = self.max_visible else {
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if index < self.offset {
            self.offset = index;
            return;
        }
        let last = self.offset.saturating_add(max).saturating_sub(1);
        if index > last {
            self.offset = index + 1 - max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollState;
    use crate::core::navigation::Viewport;

    #[test]
    fn scrolls_down_to_keep_index_visible() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(4, 10);
        assert_eq!(scroll.visible_range(10), (2, 5));
        assert_eq!(scroll.footer(10).as_deref(), Some("[3-5 of 10] ↑↓"));
    }

    #[test]
    fn wrap_to_top_resets_window() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(9, 10);
        assert_eq!(scroll.visible_range(10), (7, 10));
        scroll.ensure_visible(0, 10);
        assert_eq!(scroll.visible_range(10), (0, 3));
    }

    #[test]
    fn short_lists_need_no_footer() {
        let mut scroll = ScrollState::new(Some(5));
        scroll.ensure_visible(2, 3);
        assert_eq!(scroll.offset, 0);
        assert_eq!(scroll.footer(3), None);
    }

    #[test]
    fn row_maps_to_index_within_window() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(5, 10);
        assert_eq!(scroll.index_at_row(0, 10), Some(3));
        assert_eq!(scroll.index_at_row(2, 10), Some(5));
        assert_eq!(scroll.index_at_row(3, 10), None);
    }
}
