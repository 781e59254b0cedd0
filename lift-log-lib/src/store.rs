//src/store.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::program::ExerciseId;
use crate::storage::{self, Storage};

/// Slot used by the flat layout, where every identifier shares one log.
pub const IMPLICIT_KEY: &str = "entries";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::Error),
    #[error("Failed to serialize entries (JSON): {0}")]
    Serialize(serde_json::Error),
    #[error("Import document is not a valid snapshot (JSON): {0}")]
    InvalidImport(serde_json::Error),
    #[error("A flat entry list can only be imported into a flat store")]
    FlatDocumentInKeyedStore,
    #[error("Flat store '{storage_key}' cannot hold entries for other keys: {keys:?}")]
    FlatLayoutKeys {
        storage_key: String,
        keys: Vec<String>,
    },
}

// Entries written by older pages sometimes carry numbers instead of strings.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

/// One logged performance of an exercise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    #[serde(deserialize_with = "text_or_number")]
    pub week: String,
    #[serde(deserialize_with = "text_or_number")]
    pub weight: String,
    #[serde(deserialize_with = "text_or_number")]
    pub reps: String,
    #[serde(deserialize_with = "text_or_number")]
    pub sets: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub notes: String,
}

/// The complete persisted mapping of storage slots to entry collections.
///
/// Slots are kept as plain strings so entries logged against another program
/// survive a save untouched. A slot never holds an empty collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, Vec<Entry>>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, key: &str) -> &[Entry] {
        self.0.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn push(&mut self, key: &str, entry: Entry) {
        self.0.entry(key.to_string()).or_default().push(entry);
    }

    /// Removes one entry, dropping the slot once it is empty. Out of range
    /// indices are ignored.
    pub fn remove_at(&mut self, key: &str, index: usize) -> Option<Entry> {
        let collection = self.0.get_mut(key)?;
        if index >= collection.len() {
            return None;
        }
        let removed = collection.remove(index);
        if collection.is_empty() {
            self.0.remove(key);
        }
        Some(removed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of slots with at least one entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn total_entries(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    fn strip_empty(&mut self) {
        self.0.retain(|_, entries| !entries.is_empty());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `{ [exerciseId]: Entry[] }` under the storage key.
    #[default]
    Keyed,
    /// A bare `Entry[]` under the storage key.
    Flat,
}

#[derive(Serialize, Deserialize)]
struct ExportEnvelope {
    exported_at: DateTime<Utc>,
    storage_key: String,
    entries: Snapshot,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Envelope(ExportEnvelope),
    Keyed(Snapshot),
    Flat(Vec<Entry>),
}

/// Owns the persisted snapshot. Every operation reads the stored document,
/// applies its change in memory and writes the whole document back.
pub struct EntryStore {
    storage: Box<dyn Storage>,
    storage_key: String,
    layout: Layout,
}

impl EntryStore {
    pub fn new(storage: impl Storage + 'static, storage_key: impl Into<String>) -> Self {
        Self::with_layout(storage, storage_key, Layout::Keyed)
    }

    /// A store whose document is a single list shared by every identifier.
    pub fn flat(storage: impl Storage + 'static, storage_key: impl Into<String>) -> Self {
        Self::with_layout(storage, storage_key, Layout::Flat)
    }

    pub fn with_layout(
        storage: impl Storage + 'static,
        storage_key: impl Into<String>,
        layout: Layout,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            storage_key: storage_key.into(),
            layout,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// The snapshot slot `id` reads and writes. Every identifier shares
    /// one slot in the flat layout.
    pub fn slot_key(&self, id: &ExerciseId) -> String {
        match self.layout {
            Layout::Keyed => id.to_string(),
            Layout::Flat => IMPLICIT_KEY.to_string(),
        }
    }

    /// Reads the persisted snapshot. Absent, unreadable or malformed data
    /// yields an empty snapshot; this never fails.
    pub fn load(&self) -> Snapshot {
        let raw = match self.storage.get_item(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Snapshot::new(),
            Err(e) => {
                warn!(storage_key = %self.storage_key, error = %e, "could not read stored entries, using an empty snapshot");
                return Snapshot::new();
            }
        };

        match self.decode(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(storage_key = %self.storage_key, error = %e, "stored entries are not valid JSON, using an empty snapshot");
                Snapshot::new()
            }
        }
    }

    fn decode(&self, raw: &str) -> Result<Snapshot, serde_json::Error> {
        match self.layout {
            Layout::Flat => {
                let entries: Vec<Entry> = serde_json::from_str(raw)?;
                let mut snapshot = Snapshot::new();
                for entry in entries {
                    snapshot.push(IMPLICIT_KEY, entry);
                }
                Ok(snapshot)
            }
            Layout::Keyed => {
                let document: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
                let mut snapshot = Snapshot::new();
                for (key, value) in document {
                    // One broken exercise must not take the others down with it.
                    match serde_json::from_value::<Vec<Entry>>(value) {
                        Ok(entries) if !entries.is_empty() => {
                            snapshot.0.insert(key, entries);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(storage_key = %self.storage_key, slot = %key, error = %e, "dropping malformed entries for one exercise");
                        }
                    }
                }
                Ok(snapshot)
            }
        }
    }

    /// Serializes and writes the full snapshot in one storage write.
    /// # Errors
    /// - `Error::FlatLayoutKeys` if a flat store is given other slots.
    /// - `Error::Serialize` or `Error::Storage` if writing fails.
    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), Error> {
        let mut snapshot = snapshot.clone();
        snapshot.strip_empty();

        let document = match self.layout {
            Layout::Keyed => serde_json::to_string(&snapshot),
            Layout::Flat => {
                let foreign: Vec<String> = snapshot
                    .keys()
                    .filter(|k| *k != IMPLICIT_KEY)
                    .map(str::to_string)
                    .collect();
                if !foreign.is_empty() {
                    return Err(Error::FlatLayoutKeys {
                        storage_key: self.storage_key.clone(),
                        keys: foreign,
                    });
                }
                serde_json::to_string(snapshot.entries(IMPLICIT_KEY))
            }
        }
        .map_err(Error::Serialize)?;

        self.storage.set_item(&self.storage_key, &document)?;
        debug!(storage_key = %self.storage_key, slots = snapshot.len(), "saved entries");
        Ok(())
    }

    /// The current collection for `id`, empty if nothing is logged.
    pub fn entries(&self, id: &ExerciseId) -> Vec<Entry> {
        self.load().entries(&self.slot_key(id)).to_vec()
    }

    /// # Errors
    /// Returns `Error` if the snapshot cannot be written back.
    pub fn append(&mut self, id: &ExerciseId, entry: Entry) -> Result<(), Error> {
        let mut snapshot = self.load();
        snapshot.push(&self.slot_key(id), entry);
        self.save(&snapshot)
    }

    /// Removes the entry at `index`. An out of range index is a no-op that
    /// returns `Ok(None)` without writing.
    /// # Errors
    /// Returns `Error` if the snapshot cannot be written back.
    pub fn remove_at(&mut self, id: &ExerciseId, index: usize) -> Result<Option<Entry>, Error> {
        let mut snapshot = self.load();
        let Some(removed) = snapshot.remove_at(&self.slot_key(id), index) else {
            debug!(%id, index, "ignoring delete of a row that no longer exists");
            return Ok(None);
        };
        self.save(&snapshot)?;
        Ok(Some(removed))
    }

    /// Pretty-printed export of everything logged, with a timestamp.
    /// # Errors
    /// Returns `Error::Serialize` if encoding fails.
    pub fn export_json(&self) -> Result<String, Error> {
        let envelope = ExportEnvelope {
            exported_at: Utc::now(),
            storage_key: self.storage_key.clone(),
            entries: self.load(),
        };
        serde_json::to_string_pretty(&envelope).map_err(Error::Serialize)
    }

    /// Replaces the whole snapshot with an exported document, a bare keyed
    /// snapshot, or (for flat stores) a bare entry list. Returns the number
    /// of entries now stored.
    /// # Errors
    /// Returns `Error::InvalidImport` for documents that do not parse, and
    /// the `save` errors otherwise.
    pub fn import_json(&mut self, text: &str) -> Result<usize, Error> {
        let snapshot = match serde_json::from_str(text).map_err(Error::InvalidImport)? {
            ImportDocument::Envelope(envelope) => envelope.entries,
            ImportDocument::Keyed(snapshot) => snapshot,
            ImportDocument::Flat(entries) => {
                if self.layout != Layout::Flat {
                    return Err(Error::FlatDocumentInKeyedStore);
                }
                let mut snapshot = Snapshot::new();
                for entry in entries {
                    snapshot.push(IMPLICIT_KEY, entry);
                }
                snapshot
            }
        };
        self.save(&snapshot)?;
        Ok(snapshot.total_entries())
    }

    /// Removes the storage key entirely.
    /// # Errors
    /// Returns `Error::Storage` if the backend write fails.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.storage.remove_item(&self.storage_key)?;
        Ok(())
    }

    /// The document exactly as stored, for diagnostics.
    /// # Errors
    /// Returns `Error::Storage` if the backend read fails.
    pub fn raw_document(&self) -> Result<Option<String>, Error> {
        Ok(self.storage.get_item(&self.storage_key)?)
    }
}
