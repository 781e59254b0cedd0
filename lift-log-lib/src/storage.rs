//src/storage.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STORAGE_FILE_NAME: &str = "storage.sqlite3";
const APP_DATA_DIR: &str = "lift-log"; // Same dir name as config

// Custom Error type for storage backends
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage connection failed: {0}")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing storage file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage read failed for key '{key}': {source}")]
    ReadFailed {
        key: String,
        source: rusqlite::Error,
    },
    #[error("Storage write failed for key '{key}': {source}")]
    WriteFailed {
        key: String,
        source: rusqlite::Error,
    },
}

/// A string key/value store, the same contract a browser's local storage
/// offers: whole values are read and replaced, never patched.
pub trait Storage {
    /// # Errors
    /// Returns `Error` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;

    /// Replaces the whole value stored under `key`.
    /// # Errors
    /// Returns `Error` if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// # Errors
    /// Returns `Error` if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), Error>;
}

/// Durable backend: one row per key in a small SQLite file.
pub struct SqliteStorage {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStorage {
    /// Opens (creating if needed) the storage file and its table.
    /// # Errors
    /// Returns `Error::Connection` if the file cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let conn = Connection::open(path.as_ref()).map_err(Error::Connection)?;
        init(&conn)?;
        Ok(Self {
            conn,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// # Errors
    /// Returns `Error::Connection` if SQLite cannot create the database.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(Error::Connection)?;
        init(&conn)?;
        Ok(Self {
            conn,
            path: ":memory:".into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| Error::ReadFailed {
                key: key.to_string(),
                source,
            })
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // A single statement, so a failed write leaves the previous value intact.
        self.conn
            .execute(
                "INSERT OR REPLACE INTO local_storage (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|source| Error::WriteFailed {
                key: key.to_string(),
                source,
            })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .map(|_| ())
            .map_err(|source| Error::WriteFailed {
                key: key.to_string(),
                source,
            })
    }
}

/// Ephemeral backend for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a raw value, bypassing any serialization.
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.items.remove(key);
        Ok(())
    }
}

/// Determines the path to the storage file.
/// Exposed at crate root as `get_storage_path_util`
pub fn get_storage_path() -> Result<PathBuf, Error> {
    let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(STORAGE_FILE_NAME))
}

/// Initializes the key/value table if it doesn't exist.
fn init(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(Error::Connection)?;
    Ok(())
}
