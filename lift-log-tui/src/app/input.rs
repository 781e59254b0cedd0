// src/app/input.rs
use super::{
    modals::{handle_add_entry_modal_input, handle_confirm_delete_modal_input},
    state::{ActiveModal, App, LogFocus},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            return self.handle_modal_input(key);
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('h') | KeyCode::Left => self.previous_day(),
            KeyCode::Char('l') | KeyCode::Right => self.next_day(),
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(day) = c.to_digit(10) {
                    self.select_day(day as usize - 1);
                }
            }
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            KeyCode::Char('a') => self.open_add_entry_modal(),
            _ => self.handle_log_input(key),
        }
        Ok(())
    }

    // --- Modal Input Handling ---
    fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_modal {
            ActiveModal::Help => self.handle_help_modal_input(key),
            ActiveModal::AddEntry { .. } => handle_add_entry_modal_input(self, key)?,
            ActiveModal::ConfirmDelete { .. } => handle_confirm_delete_modal_input(self, key)?,
            ActiveModal::None => {}
        }
        Ok(())
    }

    fn handle_help_modal_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | '?') | KeyCode::Enter => {
                self.active_modal = ActiveModal::None;
            }
            _ => {} // Ignore other keys in help
        }
    }

    fn handle_log_input(&mut self, key: KeyEvent) {
        match self.log_focus {
            LogFocus::ExerciseList => match key.code {
                KeyCode::Char('k') | KeyCode::Up => self.exercise_previous(),
                KeyCode::Char('j') | KeyCode::Down => self.exercise_next(),
                KeyCode::Enter => self.open_add_entry_modal(),
                _ => {}
            },
            LogFocus::EntryTable => match key.code {
                KeyCode::Char('k') | KeyCode::Up => self.entry_previous(),
                KeyCode::Char('j') | KeyCode::Down => self.entry_next(),
                KeyCode::Char('d') | KeyCode::Delete => self.open_delete_confirmation_modal(),
                KeyCode::Esc => self.toggle_focus(),
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_log_lib::{
        AppService, Config, Entry, EntryStore, ExerciseId, MemoryStorage, Program, ProgramSource,
    };
    use std::path::PathBuf;

    fn app_with_entries(id: ExerciseId, weeks: &[&str]) -> App {
        app_with_store(EntryStore::new(MemoryStorage::new(), "workoutEntries"), id, weeks)
    }

    fn app_with_store(mut store: EntryStore, id: ExerciseId, weeks: &[&str]) -> App {
        for week in weeks {
            let entry = Entry {
                week: (*week).to_string(),
                weight: "60".into(),
                reps: "10".into(),
                sets: "3".into(),
                notes: String::new(),
            };
            store.append(&id, entry).unwrap();
        }
        App::new(AppService {
            config: Config::default(),
            store,
            program: Program::builtin().unwrap(),
            program_source: ProgramSource::Builtin,
            storage_path: PathBuf::from(":memory:"),
            config_path: PathBuf::from("config.toml"),
        })
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code)).unwrap();
    }

    #[test]
    fn day_keys_switch_and_wrap() {
        let mut app = app_with_entries(ExerciseId::new(0, 0, 0), &[]);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected_day, 2);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_day, 0);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.selected_day, 0);
    }

    #[test]
    fn delete_flow_goes_through_confirmation() {
        let id = ExerciseId::new(0, 0, 0);
        let mut app = app_with_entries(id, &["1", "2", "3"]);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.active_modal, ActiveModal::ConfirmDelete { .. }));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.service.entries(id).len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        let weeks: Vec<String> = app.service.entries(id).into_iter().map(|e| e.week).collect();
        assert_eq!(weeks, vec!["1".to_string(), "3".to_string()]);
    }

    fn card_weeks(app: &App, id: ExerciseId) -> Vec<String> {
        app.view
            .card(id)
            .unwrap()
            .list
            .rows()
            .iter()
            .map(|row| row.entry.week.clone())
            .collect()
    }

    #[test]
    fn flat_delete_updates_every_card_on_screen() {
        let first = ExerciseId::new(0, 0, 0);
        let other = ExerciseId::new(0, 1, 0);
        let store = EntryStore::flat(MemoryStorage::new(), "workoutEntriesFlat");
        let mut app = app_with_store(store, first, &["1", "2", "3"]);
        assert_eq!(card_weeks(&app, other).len(), 3);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(card_weeks(&app, other), vec!["1".to_string(), "3".to_string()]);

        // The other card's bindings point into the shrunken slot
        let action = app.view.card(other).unwrap().list.rows()[1].delete;
        app.delete_entry(action);
        assert!(app.last_error.is_none());
        assert_eq!(card_weeks(&app, first), vec!["1".to_string()]);
        assert_eq!(card_weeks(&app, other), vec!["1".to_string()]);
    }

    #[test]
    fn flat_add_updates_every_card_on_screen() {
        let other = ExerciseId::new(0, 1, 0);
        let store = EntryStore::flat(MemoryStorage::new(), "workoutEntriesFlat");
        let mut app = app_with_store(store, ExerciseId::new(0, 0, 0), &[]);

        press(&mut app, KeyCode::Char('a'));
        for field in ["1", "60", "5", "3", ""] {
            for c in field.chars() {
                press(&mut app, KeyCode::Char(c));
            }
            press(&mut app, KeyCode::Enter);
        }

        assert!(matches!(app.active_modal, ActiveModal::None));
        assert_eq!(card_weeks(&app, other), vec!["1".to_string()]);
    }

    #[test]
    fn quit_is_ignored_while_a_modal_is_open() {
        let mut app = app_with_entries(ExerciseId::new(0, 0, 0), &[]);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
