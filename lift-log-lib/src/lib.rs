// src/lib.rs
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// --- Declare modules ---
mod config;
pub mod form;
pub mod program;
pub mod render;
pub mod storage;
pub mod store;
pub mod view;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, StandardColor, Theme, Units,
    DEFAULT_FLAT_STORAGE_KEY, DEFAULT_STORAGE_KEY,
};
pub use form::{EntryField, EntryForm, InputKind, SubmitError, ValidationError};
pub use program::{Day, Error as ProgramError, Exercise, ExerciseId, Program, Section};
pub use render::{DayView, ExerciseCard, ProgramView, SectionView};
pub use storage::{
    get_storage_path as get_storage_path_util, Error as StorageError, MemoryStorage,
    SqliteStorage, Storage,
};
pub use store::{Entry, EntryStore, Error as StoreError, Layout, Snapshot};
pub use view::{DeleteAction, EntryListView, EntryRow, ListBody};

/// Where the rendered program came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    Builtin,
    File(PathBuf),
}

pub struct AppService {
    pub config: Config,
    pub store: EntryStore,
    pub program: Program,
    pub program_source: ProgramSource,
    pub storage_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/storage path determination, loading,
    /// or program parsing fails.
    pub fn initialize() -> Result<Self> {
        Self::initialize_with_program(None)
    }

    /// Like `initialize`, but `program_override` wins over `program_path`
    /// from the config file.
    /// # Errors
    /// See `initialize`.
    pub fn initialize_with_program(program_override: Option<&Path>) -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let storage_path =
            storage::get_storage_path().context("Failed to determine storage path")?;
        let storage = SqliteStorage::open(&storage_path)
            .with_context(|| format!("Failed to open storage at {storage_path:?}"))?;

        let program_path = program_override
            .map(Path::to_path_buf)
            .or_else(|| config.program_path.clone());
        let (program, program_source) = load_program(program_path)?;

        tracing::debug!(?storage_path, ?program_source, "initialized service");
        Ok(Self {
            store: EntryStore::with_layout(
                storage,
                config.active_storage_key(),
                config.layout,
            ),
            config,
            program,
            program_source,
            storage_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Renders the whole program against the current store.
    pub fn render(&self) -> ProgramView {
        let mut view = ProgramView::new();
        view.render(&self.program, &self.store);
        view
    }

    /// Resolves a textual identifier (e.g. `d0_s1_e0`) to an exercise of the
    /// loaded program.
    /// # Errors
    /// Returns `anyhow::Error` if the identifier is malformed or not part of
    /// the program.
    pub fn resolve_exercise(&self, identifier: &str) -> Result<(ExerciseId, &Exercise)> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            bail!("Exercise identifier cannot be empty.");
        }
        let id: ExerciseId = trimmed.parse()?;
        match self.program.exercise(id) {
            Some(exercise) => Ok((id, exercise)),
            None => bail!("Exercise '{id}' is not part of the current program."),
        }
    }

    pub fn entries(&self, id: ExerciseId) -> Vec<Entry> {
        self.store.entries(&id)
    }

    /// Number of logged entries per program exercise, read from one snapshot
    /// through the store's slot mapping.
    pub fn entry_counts(&self) -> BTreeMap<ExerciseId, usize> {
        let snapshot = self.store.load();
        self.program
            .exercises()
            .map(|(id, _)| (id, snapshot.entries(&self.store.slot_key(&id)).len()))
            .collect()
    }

    /// Validates and logs one entry for `id`, clearing `form` on success.
    /// # Errors
    /// Returns `SubmitError` for missing fields or storage failures.
    pub fn log_entry(&mut self, id: ExerciseId, form: &mut EntryForm) -> Result<Entry, SubmitError> {
        let mut list = EntryListView::new(id);
        form.submit(&mut self.store, &mut list)
    }

    /// Deletes the entry shown at `index` of the exercise's current table.
    /// An index past the end is ignored.
    /// # Errors
    /// Returns `anyhow::Error` if the store cannot be written.
    pub fn delete_entry(&mut self, id: ExerciseId, index: usize) -> Result<Option<Entry>> {
        let mut list = EntryListView::new(id);
        list.refresh(&self.store);
        let Some(action) = list.rows().get(index).map(|row| row.delete) else {
            return Ok(None);
        };
        list.delete(&mut self.store, action)
            .with_context(|| format!("Failed to delete entry {index} of {id}"))
    }

    /// # Errors
    /// Returns `anyhow::Error` if encoding fails.
    pub fn export_entries(&self) -> Result<String> {
        self.store
            .export_json()
            .context("Failed to export entries")
    }

    /// Replaces all stored entries with the contents of an export.
    /// # Errors
    /// Returns `anyhow::Error` if the document is invalid or cannot be saved.
    pub fn import_entries(&mut self, text: &str) -> Result<usize> {
        self.store
            .import_json(text)
            .context("Failed to import entries")
    }

    /// # Errors
    /// Returns `anyhow::Error` if the storage key cannot be removed.
    pub fn clear_entries(&mut self) -> Result<()> {
        self.store.clear().context("Failed to clear entries")
    }
}

fn load_program(path: Option<PathBuf>) -> Result<(Program, ProgramSource)> {
    match path {
        Some(path) => {
            let program = Program::load(&path)
                .with_context(|| format!("Failed to load program from {path:?}"))?;
            Ok((program, ProgramSource::File(path)))
        }
        None => Ok((
            Program::builtin().context("Built-in program is invalid")?,
            ProgramSource::Builtin,
        )),
    }
}
