// src/app/actions.rs
use super::navigation_helpers::{list_next, list_previous, table_next, table_previous};
use super::state::{ActiveModal, App, LogFocus};
use lift_log_lib::{DeleteAction, EntryField};

impl App {
    pub(crate) fn select_day(&mut self, day: usize) {
        if day >= self.view.days.len() || day == self.selected_day {
            return;
        }
        self.selected_day = day;
        self.log_focus = LogFocus::ExerciseList;
        self.exercise_list_state.select(Some(0));
        self.entry_table_state.select(None);
        self.clamp_selection();
    }

    pub(crate) fn next_day(&mut self) {
        let days = self.view.days.len();
        if days > 0 {
            self.select_day((self.selected_day + 1) % days);
        }
    }

    pub(crate) fn previous_day(&mut self) {
        let days = self.view.days.len();
        if days > 0 {
            self.select_day((self.selected_day + days - 1) % days);
        }
    }

    pub(crate) fn exercise_next(&mut self) {
        let len = self.card_count();
        list_next(&mut self.exercise_list_state, len);
        self.entry_table_state.select(None);
    }

    pub(crate) fn exercise_previous(&mut self) {
        let len = self.card_count();
        list_previous(&mut self.exercise_list_state, len);
        self.entry_table_state.select(None);
    }

    pub(crate) fn entry_next(&mut self) {
        let len = self.row_count();
        table_next(&mut self.entry_table_state, len);
    }

    pub(crate) fn entry_previous(&mut self) {
        let len = self.row_count();
        table_previous(&mut self.entry_table_state, len);
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.log_focus = match self.log_focus {
            LogFocus::ExerciseList => LogFocus::EntryTable,
            LogFocus::EntryTable => LogFocus::ExerciseList,
        };
        self.clamp_selection();
    }

    /// Re-renders every card from the store, picking up changes made by
    /// another front end. Typed but unsubmitted form text is lost.
    pub(crate) fn reload(&mut self) {
        self.view = self.service.render();
        if self.selected_day >= self.view.days.len() {
            self.selected_day = 0;
        }
        self.clamp_selection();
    }

    pub(crate) fn open_add_entry_modal(&mut self) {
        let Some(card) = self.selected_card() else {
            self.set_error("No exercise selected");
            return;
        };
        self.active_modal = ActiveModal::AddEntry {
            id: card.id,
            exercise_name: card.exercise.name.clone(),
            focused_field: EntryField::Week,
            error_message: None,
        };
    }

    pub(crate) fn open_delete_confirmation_modal(&mut self) {
        let Some(card) = self.selected_card() else {
            self.set_error("No exercise selected");
            return;
        };
        let exercise_name = card.exercise.name.clone();
        let Some(row) = self.selected_row() else {
            self.set_error("No entry selected");
            return;
        };
        self.active_modal = ActiveModal::ConfirmDelete {
            action: row.delete,
            exercise_name,
        };
    }

    /// Runs a row's delete action against the store and rebuilds that
    /// card's table.
    pub(crate) fn delete_entry(&mut self, action: DeleteAction) {
        let Some(card) = self.view.card_mut(action.id) else {
            self.set_error(format!("Exercise {} is not on screen", action.id));
            return;
        };
        match card.list.delete(&mut self.service.store, action) {
            Ok(Some(entry)) => {
                tracing::info!(id = %action.id, index = action.index, week = %entry.week, "deleted entry");
            }
            Ok(None) => self.set_error("Entry was already gone"),
            Err(e) => self.set_error(format!("Delete failed: {e}")),
        }
        self.view.refresh_slot(&self.service.store, action.id);
        self.clamp_selection();
    }
}
