//! File-backed session storage.
//!
//! All entries live in one JSON object, `session.json`, inside a storage
//! directory opened through a `cap_std` capability. Writes go to a staging
//! file first and are renamed into place.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{SessionStorage, SessionStorageError};

/// Name of the file holding the entries.
pub const SESSION_FILE: &str = "session.json";
const STAGING_FILE: &str = ".session.json.tmp";

/// Session storage persisted in a directory.
#[derive(Debug)]
pub struct FileSessionStorage {
    directory: Dir,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    /// Open (creating if needed) the storage directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let directory = Dir::open_ambient_dir(path, ambient_authority())?;
        debug!(path = %path.display(), "opened session storage");
        Ok(Self {
            directory,
            write_lock: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionStorageError> {
        let raw = match self.directory.read_to_string(SESSION_FILE) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(SessionStorageError::read(err.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|err| SessionStorageError::read(format!("{SESSION_FILE} is corrupt: {err}")))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionStorageError> {
        let encoded = serde_json::to_vec_pretty(entries)
            .map_err(|err| SessionStorageError::write(err.to_string()))?;
        self.directory
            .write(STAGING_FILE, encoded)
            .and_then(|()| {
                self.directory
                    .rename(STAGING_FILE, &self.directory, SESSION_FILE)
            })
            .map_err(|err| SessionStorageError::write(err.to_string()))
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), SessionStorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let mut entries = self.load()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionStorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
