// src/app/navigation_helpers.rs
use ratatui::widgets::{ListState, TableState};

fn next_index(selected: Option<usize>, len: usize) -> usize {
    match selected {
        Some(i) if i >= len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    }
}

fn previous_index(selected: Option<usize>, len: usize) -> usize {
    match selected {
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => len.saturating_sub(1),
    }
}

pub fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    state.select(Some(next_index(state.selected(), list_len)));
}

pub fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    state.select(Some(previous_index(state.selected(), list_len)));
}

pub fn table_next(state: &mut TableState, table_len: usize) {
    if table_len == 0 {
        return;
    }
    state.select(Some(next_index(state.selected(), table_len)));
}

pub fn table_previous(state: &mut TableState, table_len: usize) {
    if table_len == 0 {
        return;
    }
    state.select(Some(previous_index(state.selected(), table_len)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        let mut state = ListState::default();
        list_previous(&mut state, 3);
        assert_eq!(state.selected(), Some(2));
        list_next(&mut state, 3);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn empty_table_keeps_no_selection() {
        let mut state = TableState::default();
        table_next(&mut state, 0);
        assert_eq!(state.selected(), None);
    }
}
