//src/form.rs
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::debug;

use crate::program::ExerciseId;
use crate::store::{self, Entry, EntryStore};
use crate::view::EntryListView;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill out all required fields (week, weight, reps, sets). Missing: {}", .0.label())]
    MissingRequiredField(EntryField),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to save entry: {0}")]
    Store(#[from] store::Error),
}

/// What a field's input widget accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    Whole { min: Option<u32> },
    Decimal { step: f64 },
    Text,
}

impl InputKind {
    /// Whether a typed character may go into a field of this kind, given the
    /// text already there.
    pub fn accepts(self, current: &str, c: char) -> bool {
        match self {
            Self::Whole { .. } => c.is_ascii_digit(),
            Self::Decimal { .. } => c.is_ascii_digit() || (c == '.' && !current.contains('.')),
            Self::Text => !c.is_control(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum EntryField {
    Week,
    Weight,
    Reps,
    Sets,
    Notes,
}

impl EntryField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Weight => "Weight",
            Self::Reps => "Reps",
            Self::Sets => "Sets",
            Self::Notes => "Notes",
        }
    }

    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Week => InputKind::Whole { min: Some(1) },
            Self::Weight => InputKind::Decimal { step: 0.1 },
            Self::Reps | Self::Sets => InputKind::Whole { min: None },
            Self::Notes => InputKind::Text,
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Notes)
    }

    pub fn next(self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let pos = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn previous(self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let pos = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(pos + all.len() - 1) % all.len()]
    }
}

/// Raw input of one exercise's "log an entry" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub week: String,
    pub weight: String,
    pub reps: String,
    pub sets: String,
    pub notes: String,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Week => &self.week,
            EntryField::Weight => &self.weight,
            EntryField::Reps => &self.reps,
            EntryField::Sets => &self.sets,
            EntryField::Notes => &self.notes,
        }
    }

    pub fn field_mut(&mut self, field: EntryField) -> &mut String {
        match field {
            EntryField::Week => &mut self.week,
            EntryField::Weight => &mut self.weight,
            EntryField::Reps => &mut self.reps,
            EntryField::Sets => &mut self.sets,
            EntryField::Notes => &mut self.notes,
        }
    }

    pub fn set(&mut self, field: EntryField, value: impl Into<String>) -> &mut Self {
        *self.field_mut(field) = value.into();
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trims every field and checks that the required ones are present.
    /// # Errors
    /// `ValidationError::MissingRequiredField` naming the first empty field.
    pub fn validate(&self) -> Result<Entry, ValidationError> {
        if let Some(missing) = EntryField::iter()
            .filter(|f| f.is_required())
            .find(|f| self.field(*f).trim().is_empty())
        {
            return Err(ValidationError::MissingRequiredField(missing));
        }
        Ok(Entry {
            week: self.week.trim().to_string(),
            weight: self.weight.trim().to_string(),
            reps: self.reps.trim().to_string(),
            sets: self.sets.trim().to_string(),
            notes: self.notes.trim().to_string(),
        })
    }

    /// Validates, appends to the list's exercise, clears the inputs and
    /// refreshes the list. Nothing changes when validation fails.
    /// # Errors
    /// - `SubmitError::Validation` if a required field is empty.
    /// - `SubmitError::Store` if the entry cannot be persisted.
    pub fn submit(
        &mut self,
        store: &mut EntryStore,
        list: &mut EntryListView,
    ) -> Result<Entry, SubmitError> {
        let id: ExerciseId = list.id();
        let entry = self.validate()?;
        store.append(&id, entry.clone())?;
        debug!(%id, week = %entry.week, "logged entry");
        self.clear();
        list.refresh(store);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn first_missing_required_field_is_reported() {
        let mut form = EntryForm::new();
        form.set(EntryField::Week, "1")
            .set(EntryField::Weight, "  ")
            .set(EntryField::Reps, "8");
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingRequiredField(EntryField::Weight))
        );
    }

    #[test]
    fn notes_are_optional_and_values_trimmed() {
        let mut form = EntryForm::new();
        form.set(EntryField::Week, " 2 ")
            .set(EntryField::Weight, "102.5")
            .set(EntryField::Reps, "8 ")
            .set(EntryField::Sets, "3")
            .set(EntryField::Notes, "  felt easy ");
        let entry = form.validate().unwrap();
        assert_eq!(entry.week, "2");
        assert_eq!(entry.reps, "8");
        assert_eq!(entry.notes, "felt easy");
    }

    #[test]
    fn failed_submit_keeps_input_and_store() {
        let id = ExerciseId::new(0, 0, 0);
        let mut store = EntryStore::new(MemoryStorage::new(), "k");
        let mut list = EntryListView::new(id);
        let mut form = EntryForm::new();
        form.set(EntryField::Weight, "135");

        let err = form.submit(&mut store, &mut list).unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(form.weight, "135");
        assert_eq!(store.raw_document().unwrap(), None);
    }

    #[test]
    fn input_kinds_filter_keystrokes() {
        let weight = EntryField::Weight.input_kind();
        assert!(weight.accepts("10", '.'));
        assert!(!weight.accepts("10.5", '.'));
        assert!(!EntryField::Reps.input_kind().accepts("", 'x'));
        assert!(EntryField::Notes.input_kind().accepts("", 'x'));
    }

    #[test]
    fn focus_cycles_through_fields() {
        assert_eq!(EntryField::Notes.next(), EntryField::Week);
        assert_eq!(EntryField::Week.previous(), EntryField::Notes);
        assert_eq!(EntryField::Weight.next(), EntryField::Reps);
    }
}
