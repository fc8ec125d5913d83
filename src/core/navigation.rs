use crate::core::candidates::CandidateList;

/// Closed set of list commands; raw keys are resolved to these once, at the
/// input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    MoveDown,
    MoveUp,
    Commit,
    Cancel,
}

/// Host capability: make the row at `index` visible in the list viewport.
pub trait Viewport {
    fn ensure_visible(&mut self, index: usize, total: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Unchanged,
    Highlighted(usize),
    Commit(usize),
    Cancel,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationController;

impl NavigationController {
    pub fn apply<T>(
        command: NavCommand,
        candidates: &mut CandidateList<T>,
        viewport: &mut dyn Viewport,
    ) -> NavOutcome {
        match command {
            NavCommand::MoveDown => {
                let target = next_index(candidates.highlighted(), candidates.len());
                Self::move_to(target, candidates, viewport)
            }
            NavCommand::MoveUp => {
                let target = prev_index(candidates.highlighted(), candidates.len());
                Self::move_to(target, candidates, viewport)
            }
            NavCommand::Commit => match candidates.highlighted() {
                Some(index) => NavOutcome::Commit(index),
                None => NavOutcome::Unchanged,
            },
            NavCommand::Cancel => {
                candidates.clear();
                NavOutcome::Cancel
            }
        }
    }

    fn move_to<T>(
        target: Option<usize>,
        candidates: &mut CandidateList<T>,
        viewport: &mut dyn Viewport,
    ) -> NavOutcome {
        let Some(index) = target else {
            return NavOutcome::Unchanged;
        };
        if !candidates.set_highlight(Some(index)) {
            return NavOutcome::Unchanged;
        }
        viewport.ensure_visible(index, candidates.len());
        NavOutcome::Highlighted(index)
    }
}

pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(index) if index + 1 < len => Some(index + 1),
        _ => Some(0),
    }
}

pub fn prev_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(index) if index > 0 && index < len => Some(index - 1),
        _ => Some(len - 1),
    }
}
