// lift-log-tui/src/app/state.rs
use lift_log_lib::{
    AppService, DayView, DeleteAction, EntryField, EntryRow, ExerciseCard, ExerciseId, ProgramView,
};
use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

// Represents which pane has focus on the log screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFocus {
    ExerciseList,
    EntryTable,
}

// Represents the state of active modals
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveModal {
    None,
    Help,
    AddEntry {
        // The text being typed lives in the card's own form
        id: ExerciseId,
        exercise_name: String,
        focused_field: EntryField,
        error_message: Option<String>,
    },
    ConfirmDelete {
        action: DeleteAction,
        exercise_name: String,
    },
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub view: ProgramView,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    // === Log Screen State ===
    pub selected_day: usize,
    pub log_focus: LogFocus,
    pub exercise_list_state: ListState,
    pub entry_table_state: TableState,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let view = service.render();
        let mut app = Self {
            view,
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            error_clear_time: None,
            selected_day: 0,
            log_focus: LogFocus::ExerciseList,
            exercise_list_state: ListState::default(),
            entry_table_state: TableState::default(),
            service,
        };
        app.exercise_list_state.select(Some(0));
        app
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!(%msg, "status bar error");
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
    }

    // Called once per frame from the main loop
    pub(crate) fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub fn current_day(&self) -> Option<&DayView> {
        self.view.days.get(self.selected_day)
    }

    pub fn selected_card(&self) -> Option<&ExerciseCard> {
        let index = self.exercise_list_state.selected()?;
        self.current_day()?.cards().nth(index)
    }

    pub fn selected_row(&self) -> Option<&EntryRow> {
        let index = self.entry_table_state.selected()?;
        self.selected_card()?.list.rows().get(index)
    }

    pub(crate) fn card_count(&self) -> usize {
        self.current_day().map_or(0, |day| day.cards().count())
    }

    pub(crate) fn row_count(&self) -> usize {
        self.selected_card().map_or(0, |card| card.list.rows().len())
    }

    /// Keeps both selections inside their lists after the lists changed.
    pub(crate) fn clamp_selection(&mut self) {
        let cards = self.card_count();
        match self.exercise_list_state.selected() {
            _ if cards == 0 => self.exercise_list_state.select(None),
            Some(i) if i >= cards => self.exercise_list_state.select(Some(cards - 1)),
            None => self.exercise_list_state.select(Some(0)),
            Some(_) => {}
        }

        let rows = self.row_count();
        match self.entry_table_state.selected() {
            _ if rows == 0 => self.entry_table_state.select(None),
            Some(i) if i >= rows => self.entry_table_state.select(Some(rows - 1)),
            None if self.log_focus == LogFocus::EntryTable => {
                self.entry_table_state.select(Some(0));
            }
            _ => {}
        }
    }
}
