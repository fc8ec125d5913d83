use crate::core::candidates::CandidateList;
use crate::core::state::WidgetState;
use serde::Serialize;

/// Accessibility tree of the combobox at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboboxA11y {
    pub role: &'static str,
    pub input_id: String,
    pub listbox_id: String,
    pub expanded: bool,
    pub active_descendant: Option<String>,
    pub options: Vec<OptionA11y>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionA11y {
    pub id: String,
    pub label: String,
    pub pos_in_set: usize,
    pub set_size: usize,
    pub selected: bool,
}

pub fn input_id(prefix: &str) -> String {
    format!("{prefix}__input")
}

pub fn listbox_id(prefix: &str) -> String {
    format!("{prefix}__listbox")
}

pub fn option_id(prefix: &str, index: usize) -> String {
    format!("{prefix}__option-{index}")
}

pub fn describe<T>(prefix: &str, state: WidgetState, candidates: &CandidateList<T>) -> ComboboxA11y {
    let expanded = state.shows_candidates();
    let highlighted = candidates.highlighted();
    let set_size = candidates.len();

    let options = if expanded {
        candidates
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| OptionA11y {
                id: option_id(prefix, index),
                label: item.label.clone(),
                pos_in_set: index + 1,
                set_size,
                selected: highlighted == Some(index),
            })
            .collect()
    } else {
        Vec::new()
    };

    ComboboxA11y {
        role: "combobox",
        input_id: input_id(prefix),
        listbox_id: listbox_id(prefix),
        expanded,
        active_descendant: highlighted
            .filter(|_| expanded)
            .map(|index| option_id(prefix, index)),
        options,
    }
}
