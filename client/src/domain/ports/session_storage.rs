//! Driven port for persisted session entries.
//!
//! The storage is a flat string key/value store, the same contract a browser
//! offers through local storage. The session layer keeps exactly two entries
//! in it: the token under [`TOKEN_KEY`] and the JSON-serialised profile under
//! [`USER_KEY`].

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::define_port_error;

/// Storage key holding the raw authentication token.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key holding the JSON-serialised user profile.
pub const USER_KEY: &str = "user";

define_port_error! {
    /// Errors raised by persisted session storage.
    pub enum SessionStorageError {
        /// The backing medium could not be read.
        Read { message: String } => "session storage read failed: {message}",
        /// The backing medium could not be written.
        Write { message: String } => "session storage write failed: {message}",
    }
}

/// Port for persisted string entries.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Read one entry.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError>;

    /// Create or overwrite one entry.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStorageError>;

    /// Delete one entry. Removing a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<(), SessionStorageError>;
}

/// In-memory storage used by tests and short-lived tools.
///
/// # Examples
/// ```
/// use events_client::domain::ports::{FixtureSessionStorage, SessionStorage, TOKEN_KEY};
///
/// let storage = FixtureSessionStorage::default();
/// storage.set(TOKEN_KEY, "abc").unwrap();
/// assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Default)]
pub struct FixtureSessionStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl FixtureSessionStorage {
    /// Seed the storage with entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl SessionStorage for FixtureSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_missing_entry_succeeds() {
        let storage = FixtureSessionStorage::default();
        storage.remove(USER_KEY).expect("remove succeeds");
        assert!(storage.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let storage = FixtureSessionStorage::with_entries([(TOKEN_KEY, "old")]);
        storage.set(TOKEN_KEY, "new").expect("set succeeds");
        assert_eq!(
            storage.get(TOKEN_KEY).expect("get succeeds").as_deref(),
            Some("new")
        );
    }
}
