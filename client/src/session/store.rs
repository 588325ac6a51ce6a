//! Process-wide holder of the authenticated session.
//!
//! [`SessionStore`] owns the in-memory copy of the signed-in user and keeps
//! it in step with persisted storage. Every mutation runs under one mutex
//! that also guards the session generation, a counter bumped on each
//! teardown. Writes tagged with an older generation are refused, so a login
//! that raced a 401 cannot resurrect the session the 401 tore down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{SessionStorage, SessionStorageError, TOKEN_KEY, USER_KEY};
use crate::domain::{AuthToken, Route, UserProfile};

use super::guard::{GuardDecision, guard};

/// Errors raised while reading or mutating the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Persisted storage failed.
    #[error(transparent)]
    Storage(#[from] SessionStorageError),
    /// The persisted profile is not valid JSON for a [`UserProfile`].
    #[error("stored user profile is corrupt: {message}")]
    CorruptUser {
        /// Decoder description.
        message: String,
    },
    /// The profile could not be serialised for storage.
    #[error("user profile could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    /// The session was torn down after the write was prepared.
    #[error("session changed during sign-in (generation {expected}, now {current})")]
    Stale {
        /// Generation the write was tagged with.
        expected: u64,
        /// Generation at the time of the write.
        current: u64,
    },
    /// The operation needs an active session.
    #[error("no active session")]
    NotAuthenticated,
}

/// Token and profile returned by a login, tagged with the generation that
/// was current when the login started.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    /// Issued token.
    pub token: AuthToken,
    /// Profile of the signed-in user.
    pub user: UserProfile,
    /// Session generation captured before dispatch.
    pub generation: u64,
}

struct SessionInner {
    storage: Arc<dyn SessionStorage>,
    generation: Mutex<u64>,
    user: watch::Sender<Option<UserProfile>>,
}

/// Cloneable handle to the session state.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use events_client::domain::ports::FixtureSessionStorage;
/// use events_client::session::SessionStore;
///
/// let session = SessionStore::hydrate(Arc::new(FixtureSessionStorage::default()));
/// assert!(!session.is_authenticated());
/// assert_eq!(session.generation(), 0);
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Build the store from persisted storage.
    ///
    /// The session is authenticated only when both a non-blank token and a
    /// decodable profile are stored. A lone or corrupt entry is removed so
    /// storage never holds half a session. The backend is not consulted.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let user = restore(storage.as_ref());
        if let Some(user) = &user {
            info!(user_id = user.id, "restored persisted session");
        }
        let (sender, _) = watch::channel(user);
        Self {
            inner: Arc::new(SessionInner {
                storage,
                generation: Mutex::new(0),
                user: sender,
            }),
        }
    }

    /// Current session generation.
    pub fn generation(&self) -> u64 {
        *self.lock_generation()
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.user.borrow().clone()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    /// Receiver notified whenever the signed-in user changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.inner.user.subscribe()
    }

    /// Decide whether `route` may be opened by the current user.
    pub fn guard(&self, route: &Route) -> GuardDecision {
        guard(route, self.inner.user.borrow().as_ref())
    }

    /// Store `token` and `user` and mark the session authenticated.
    pub fn login(&self, user: UserProfile, token: &AuthToken) -> Result<(), SessionError> {
        let generation = self.lock_generation();
        self.write_session(&user, token)?;
        info!(
            user_id = user.id,
            token = %token.fingerprint(),
            generation = *generation,
            "session established"
        );
        self.inner.user.send_replace(Some(user));
        Ok(())
    }

    /// Apply a login result unless the session was torn down since it began.
    pub fn login_outcome(&self, outcome: &LoginOutcome) -> Result<(), SessionError> {
        let generation = self.lock_generation();
        if *generation != outcome.generation {
            warn!(
                expected = outcome.generation,
                current = *generation,
                "discarding stale sign-in"
            );
            return Err(SessionError::Stale {
                expected: outcome.generation,
                current: *generation,
            });
        }
        self.write_session(&outcome.user, &outcome.token)?;
        info!(
            user_id = outcome.user.id,
            token = %outcome.token.fingerprint(),
            generation = *generation,
            "session established"
        );
        self.inner.user.send_replace(Some(outcome.user.clone()));
        Ok(())
    }

    /// Sign out locally: clear memory and storage, bump the generation.
    ///
    /// Memory is cleared even when storage fails; the first storage error is
    /// returned after both entries were attempted.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut generation = self.lock_generation();
        self.teardown(&mut generation)
    }

    /// Tear the session down after the backend rejected the credentials.
    ///
    /// Storage failures are logged, never returned.
    pub fn invalidate(&self) {
        let mut generation = self.lock_generation();
        match self.teardown(&mut generation) {
            Ok(()) => warn!(generation = *generation, "session invalidated"),
            Err(err) => warn!(
                generation = *generation,
                error = %err,
                "session invalidated but storage could not be cleared"
            ),
        }
    }

    /// Replace the stored profile of the signed-in user.
    pub fn update_user(&self, user: UserProfile) -> Result<(), SessionError> {
        let _generation = self.lock_generation();
        if self.inner.user.borrow().is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        let encoded = serde_json::to_string(&user)?;
        self.inner.storage.set(USER_KEY, &encoded)?;
        debug!(user_id = user.id, "profile replaced");
        self.inner.user.send_replace(Some(user));
        Ok(())
    }

    /// Token currently persisted in storage.
    pub fn persisted_token(&self) -> Result<Option<AuthToken>, SessionError> {
        let raw = self.inner.storage.get(TOKEN_KEY)?;
        Ok(raw.and_then(|value| AuthToken::new(value).ok()))
    }

    /// Profile currently persisted in storage.
    pub fn persisted_user(&self) -> Result<Option<UserProfile>, SessionError> {
        let Some(raw) = self.inner.storage.get(USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| SessionError::CorruptUser {
                message: err.to_string(),
            })
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.inner
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_session(&self, user: &UserProfile, token: &AuthToken) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(user)?;
        let storage = self.inner.storage.as_ref();
        let written = storage
            .set(TOKEN_KEY, token.expose())
            .and_then(|()| storage.set(USER_KEY, &encoded));
        if let Err(err) = written {
            clear_entries(storage);
            return Err(err.into());
        }
        Ok(())
    }

    fn teardown(&self, generation: &mut MutexGuard<'_, u64>) -> Result<(), SessionError> {
        **generation += 1;
        self.inner.user.send_replace(None);
        let storage = self.inner.storage.as_ref();
        let token = storage.remove(TOKEN_KEY);
        let user = storage.remove(USER_KEY);
        token.and(user).map_err(SessionError::from)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("generation", &self.generation())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

fn restore(storage: &dyn SessionStorage) -> Option<UserProfile> {
    let token_raw = read_entry(storage, TOKEN_KEY);
    let user_raw = read_entry(storage, USER_KEY);
    if token_raw.is_none() && user_raw.is_none() {
        return None;
    }

    let token_valid = token_raw
        .as_deref()
        .is_some_and(|raw| AuthToken::new(raw).is_ok());
    let user = user_raw.as_deref().and_then(|raw| {
        serde_json::from_str::<UserProfile>(raw)
            .map_err(|err| warn!(error = %err, "stored user profile is corrupt"))
            .ok()
    });

    match user {
        Some(user) if token_valid => Some(user),
        _ => {
            warn!("removing incomplete persisted session");
            clear_entries(storage);
            None
        }
    }
}

fn read_entry(storage: &dyn SessionStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "session storage unreadable");
            None
        }
    }
}

fn clear_entries(storage: &dyn SessionStorage) {
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(err) = storage.remove(key) {
            warn!(key, error = %err, "failed to remove session entry");
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
