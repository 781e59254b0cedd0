// src/app/modals.rs
use super::state::{ActiveModal, App};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use lift_log_lib::{EntryField, ExerciseId, InputKind, SubmitError, ValidationError};

pub fn handle_add_entry_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::AddEntry {
        id, focused_field, ..
    } = app.active_modal
    else {
        return Ok(());
    };

    match key.code {
        // Typed text stays in the card's form until it is submitted
        KeyCode::Esc => app.active_modal = ActiveModal::None,
        KeyCode::Tab => focus_field(app, focused_field.next()),
        KeyCode::BackTab => focus_field(app, focused_field.previous()),
        KeyCode::Up => {
            if !step_field(app, id, focused_field, 1.0) {
                focus_field(app, focused_field.previous());
            }
        }
        KeyCode::Down => {
            if !step_field(app, id, focused_field, -1.0) {
                focus_field(app, focused_field.next());
            }
        }
        KeyCode::Enter => {
            if focused_field == EntryField::Notes {
                submit_add_entry(app, id);
            } else {
                focus_field(app, focused_field.next());
            }
        }
        KeyCode::Backspace => {
            if let Some(card) = app.view.card_mut(id) {
                card.form.field_mut(focused_field).pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(card) = app.view.card_mut(id) {
                let value = card.form.field_mut(focused_field);
                if focused_field.input_kind().accepts(value, c) {
                    value.push(c);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_confirm_delete_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let ActiveModal::ConfirmDelete { action, .. } = app.active_modal else {
        return Ok(());
    };
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
            app.active_modal = ActiveModal::None;
            app.delete_entry(action);
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.active_modal = ActiveModal::None,
        _ => {}
    }
    Ok(())
}

fn focus_field(app: &mut App, field: EntryField) {
    if let ActiveModal::AddEntry {
        focused_field,
        error_message,
        ..
    } = &mut app.active_modal
    {
        *focused_field = field;
        *error_message = None;
    }
}

fn set_modal_error(app: &mut App, message: String) {
    if let ActiveModal::AddEntry { error_message, .. } = &mut app.active_modal {
        *error_message = Some(message);
    }
}

/// Nudges a numeric field up or down by its step. Returns false for text
/// fields so the caller can treat the key as navigation instead.
fn step_field(app: &mut App, id: ExerciseId, field: EntryField, direction: f64) -> bool {
    let Some(card) = app.view.card_mut(id) else {
        return false;
    };
    let value = card.form.field_mut(field);
    match field.input_kind() {
        InputKind::Whole { min } => {
            let current: i64 = value.trim().parse().unwrap_or(0);
            let floor = min.map_or(0, i64::from);
            *value = (current + direction as i64).max(floor).to_string();
            true
        }
        InputKind::Decimal { step } => {
            let current: f64 = value.trim().parse().unwrap_or(0.0);
            let next = (current + step * direction).max(0.0);
            // Keep whatever precision the user already typed
            let decimals_of = |text: &str| text.trim().split('.').nth(1).map_or(0, str::len);
            let decimals = decimals_of(&step.to_string()).max(decimals_of(value));
            *value = format!("{next:.decimals$}");
            true
        }
        InputKind::Text => false,
    }
}

fn submit_add_entry(app: &mut App, id: ExerciseId) {
    let Some(card) = app.view.card_mut(id) else {
        app.active_modal = ActiveModal::None;
        app.set_error(format!("Exercise {id} is not on screen"));
        return;
    };

    match card.form.submit(&mut app.service.store, &mut card.list) {
        Ok(entry) => {
            tracing::info!(%id, week = %entry.week, "logged entry from tui");
            app.view.refresh_slot(&app.service.store, id);
            let last_row = app
                .view
                .card(id)
                .and_then(|card| card.list.rows().len().checked_sub(1));
            app.active_modal = ActiveModal::None;
            app.entry_table_state.select(last_row);
        }
        Err(SubmitError::Validation(e)) => {
            let ValidationError::MissingRequiredField(field) = e;
            let message = e.to_string();
            focus_field(app, field);
            set_modal_error(app, message);
        }
        Err(e) => {
            tracing::error!(%id, error = %e, "failed to log entry");
            set_modal_error(app, e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_log_lib::{
        AppService, Config, EntryStore, MemoryStorage, Program, ProgramSource,
    };
    use std::path::PathBuf;

    fn test_app() -> App {
        let service = AppService {
            config: Config::default(),
            store: EntryStore::new(MemoryStorage::new(), "workoutEntries"),
            program: Program::builtin().unwrap(),
            program_source: ProgramSource::Builtin,
            storage_path: PathBuf::from(":memory:"),
            config_path: PathBuf::from("config.toml"),
        };
        App::new(service)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_add_entry_modal_input(app, KeyEvent::from(code)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_filters_by_field_kind() {
        let mut app = test_app();
        app.open_add_entry_modal();
        type_text(&mut app, "1a2");
        let id = app.selected_card().unwrap().id;
        assert_eq!(app.view.card(id).unwrap().form.week, "12");
    }

    #[test]
    fn missing_field_keeps_modal_open_with_error() {
        let mut app = test_app();
        app.open_add_entry_modal();
        type_text(&mut app, "1");
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        match &app.active_modal {
            ActiveModal::AddEntry {
                focused_field,
                error_message,
                ..
            } => {
                assert_eq!(*focused_field, EntryField::Weight);
                assert!(error_message.is_some());
            }
            other => panic!("modal closed unexpectedly: {other:?}"),
        }
        assert!(app.service.store.load().is_empty());
    }

    #[test]
    fn complete_form_logs_and_closes() {
        let mut app = test_app();
        app.open_add_entry_modal();
        let id = app.selected_card().unwrap().id;
        for value in ["2", "100.5", "8", "3", "ok"] {
            type_text(&mut app, value);
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.active_modal, ActiveModal::None);
        let card = app.view.card(id).unwrap();
        assert_eq!(card.list.rows().len(), 1);
        assert_eq!(card.form.week, "");
        assert_eq!(app.service.entries(id)[0].weight, "100.5");
    }

    #[test]
    fn arrows_step_numeric_fields() {
        let mut app = test_app();
        app.open_add_entry_modal();
        let id = app.selected_card().unwrap().id;
        press(&mut app, KeyCode::Down);
        assert_eq!(app.view.card(id).unwrap().form.week, "1");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.view.card(id).unwrap().form.weight, "0.2");
    }

    #[test]
    fn stepping_keeps_typed_precision() {
        let mut app = test_app();
        app.open_add_entry_modal();
        let id = app.selected_card().unwrap().id;
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "102.55");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.view.card(id).unwrap().form.weight, "102.65");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.view.card(id).unwrap().form.weight, "102.45");
    }

    #[test]
    fn confirmed_delete_removes_the_bound_row() {
        let mut app = test_app();
        let id = app.selected_card().unwrap().id;
        for week in ["1", "2"] {
            app.open_add_entry_modal();
            for value in [week, "100", "5", "5", ""] {
                type_text(&mut app, value);
                press(&mut app, KeyCode::Enter);
            }
        }
        app.entry_table_state.select(Some(0));
        app.open_delete_confirmation_modal();
        handle_confirm_delete_modal_input(&mut app, KeyEvent::from(KeyCode::Char('y'))).unwrap();

        let weeks: Vec<String> = app.service.entries(id).into_iter().map(|e| e.week).collect();
        assert_eq!(weeks, vec!["2".to_string()]);
        assert_eq!(app.view.card(id).unwrap().list.rows().len(), 1);
    }
}
