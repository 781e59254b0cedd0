//src/view.rs
use crate::program::ExerciseId;
use crate::store::{self, Entry, EntryStore};

pub const NO_ENTRIES_PLACEHOLDER: &str = "No entries yet.";

/// Delete handle for one displayed row.
///
/// The index is the row's position when the table was last rebuilt and is
/// only meaningful until the next mutation of the same exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAction {
    pub id: ExerciseId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub entry: Entry,
    pub delete: DeleteAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Placeholder(&'static str),
    Table(Vec<EntryRow>),
}

/// The logged entries of one exercise, rebuilt from the store on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListView {
    id: ExerciseId,
    body: ListBody,
}

impl EntryListView {
    /// A view that has not been refreshed yet shows the placeholder.
    pub const fn new(id: ExerciseId) -> Self {
        Self {
            id,
            body: ListBody::Placeholder(NO_ENTRIES_PLACEHOLDER),
        }
    }

    pub const fn id(&self) -> ExerciseId {
        self.id
    }

    pub const fn body(&self) -> &ListBody {
        &self.body
    }

    pub fn rows(&self) -> &[EntryRow] {
        match &self.body {
            ListBody::Table(rows) => rows,
            ListBody::Placeholder(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Replaces every row with the store's current collection, rebinding
    /// each delete action to its fresh position.
    pub fn refresh(&mut self, store: &EntryStore) {
        let entries = store.entries(&self.id);
        self.body = if entries.is_empty() {
            ListBody::Placeholder(NO_ENTRIES_PLACEHOLDER)
        } else {
            let id = self.id;
            ListBody::Table(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| EntryRow {
                        entry,
                        delete: DeleteAction { id, index },
                    })
                    .collect(),
            )
        };
    }

    /// Runs a row's delete action, then rebuilds the table.
    /// # Errors
    /// Returns `store::Error` if the store cannot be written.
    pub fn delete(
        &mut self,
        store: &mut EntryStore,
        action: DeleteAction,
    ) -> Result<Option<Entry>, store::Error> {
        let removed = store.remove_at(&action.id, action.index)?;
        self.refresh(store);
        Ok(removed)
    }
}
