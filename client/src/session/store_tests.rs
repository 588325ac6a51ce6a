//! Regression coverage for the session store.

use super::*;
use crate::domain::ports::{FixtureSessionStorage, MockSessionStorage};
use rstest::{fixture, rstest};
use serde_json::json;

fn profile(id: u64, username: &str) -> UserProfile {
    serde_json::from_value(json!({ "id": id, "username": username, "city": "Kazan" }))
        .expect("profile decodes")
}

fn token(raw: &str) -> AuthToken {
    AuthToken::new(raw).expect("token")
}

#[fixture]
fn storage() -> Arc<FixtureSessionStorage> {
    Arc::new(FixtureSessionStorage::default())
}

#[rstest]
fn login_persists_and_publishes(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage.clone());
    let mut changes = session.subscribe();

    session
        .login(profile(1, "ada"), &token("abc123"))
        .expect("login succeeds");

    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|user| user.username), Some("ada".to_owned()));
    assert_eq!(
        storage.get(TOKEN_KEY).expect("read"),
        Some("abc123".to_owned())
    );
    assert!(changes.has_changed().expect("sender alive"));
    assert_eq!(
        changes.borrow_and_update().as_ref().map(|user| user.id),
        Some(1)
    );
}

#[rstest]
fn hydrate_round_trips_a_login(storage: Arc<FixtureSessionStorage>) {
    let first = SessionStore::hydrate(storage.clone());
    first
        .login(profile(7, "grace"), &token("t0k3n"))
        .expect("login succeeds");

    let restored = SessionStore::hydrate(storage);
    assert_eq!(restored.user(), Some(profile(7, "grace")));
    assert_eq!(
        restored.persisted_token().expect("read").map(|t| t.expose().to_owned()),
        Some("t0k3n".to_owned())
    );
}

#[rstest]
#[case::token_only(Some("abc"), None)]
#[case::user_only(None, Some(r#"{"id":1,"username":"ada"}"#))]
#[case::corrupt_user(Some("abc"), Some("{not json"))]
#[case::blank_token(Some("  "), Some(r#"{"id":1,"username":"ada"}"#))]
fn hydrate_discards_incomplete_sessions(
    #[case] token_entry: Option<&str>,
    #[case] user_entry: Option<&str>,
) {
    let entries = [(TOKEN_KEY, token_entry), (USER_KEY, user_entry)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)));
    let storage = Arc::new(FixtureSessionStorage::with_entries(entries));

    let session = SessionStore::hydrate(storage.clone());

    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[rstest]
fn logout_clears_everything_and_bumps_generation(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage.clone());
    session
        .login(profile(1, "ada"), &token("abc"))
        .expect("login succeeds");

    session.logout().expect("logout succeeds");

    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
    assert_eq!(session.generation(), 1);
}

#[test]
fn logout_clears_memory_even_when_storage_fails() {
    let mut storage = MockSessionStorage::new();
    storage.expect_get().returning(|_| Ok(None));
    storage.expect_set().returning(|_, _| Ok(()));
    storage
        .expect_remove()
        .returning(|key| Err(SessionStorageError::write(format!("{key} locked"))));
    let session = SessionStore::hydrate(Arc::new(storage));
    session
        .login(profile(1, "ada"), &token("abc"))
        .expect("login succeeds");

    let err = session.logout().expect_err("storage failure surfaces");

    assert!(matches!(err, SessionError::Storage(_)));
    assert!(!session.is_authenticated());
}

#[rstest]
fn stale_outcome_is_refused(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage.clone());
    let outcome = LoginOutcome {
        token: token("abc"),
        user: profile(1, "ada"),
        generation: session.generation(),
    };
    session.invalidate();

    let err = session
        .login_outcome(&outcome)
        .expect_err("stale outcome must fail");

    assert!(matches!(
        err,
        SessionError::Stale {
            expected: 0,
            current: 1
        }
    ));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[rstest]
fn current_outcome_is_applied(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage);
    let outcome = LoginOutcome {
        token: token("abc"),
        user: profile(1, "ada"),
        generation: session.generation(),
    };

    session.login_outcome(&outcome).expect("outcome applies");

    assert_eq!(session.user(), Some(profile(1, "ada")));
}

#[rstest]
fn update_user_replaces_profile(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage.clone());
    session
        .login(profile(1, "ada"), &token("abc"))
        .expect("login succeeds");

    let mut updated = profile(1, "ada");
    updated.city = "Samara".to_owned();
    session.update_user(updated.clone()).expect("update succeeds");

    assert_eq!(session.user(), Some(updated.clone()));
    assert_eq!(session.persisted_user().expect("read"), Some(updated));
}

#[rstest]
fn update_user_requires_session(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage.clone());

    let err = session
        .update_user(profile(1, "ada"))
        .expect_err("no session");

    assert!(matches!(err, SessionError::NotAuthenticated));
    assert!(storage.is_empty());
}

#[test]
fn failed_write_leaves_no_partial_session() {
    let mut storage = MockSessionStorage::new();
    storage.expect_get().returning(|_| Ok(None));
    storage.expect_set().returning(|key, _| {
        if key == USER_KEY {
            Err(SessionStorageError::write("quota exceeded"))
        } else {
            Ok(())
        }
    });
    storage.expect_remove().times(2).returning(|_| Ok(()));
    let session = SessionStore::hydrate(Arc::new(storage));

    let err = session
        .login(profile(1, "ada"), &token("abc"))
        .expect_err("write fails");

    assert!(matches!(err, SessionError::Storage(_)));
    assert!(!session.is_authenticated());
}

#[rstest]
fn guard_follows_the_current_user(storage: Arc<FixtureSessionStorage>) {
    let session = SessionStore::hydrate(storage);
    assert_eq!(
        session.guard(&Route::Profile),
        GuardDecision::Redirect(Route::Login)
    );

    session
        .login(profile(1, "ada"), &token("abc"))
        .expect("login succeeds");
    assert_eq!(session.guard(&Route::Profile), GuardDecision::Allow);
    assert_eq!(
        session.guard(&Route::Login),
        GuardDecision::Redirect(Route::Home)
    );
}
