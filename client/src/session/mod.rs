//! Session state and the flows that mutate it.
//!
//! - [`SessionStore`] holds the signed-in user and mirrors it to storage.
//! - [`AuthService`] creates and ends sessions from backend responses.
//! - [`guard()`] decides where a navigation actually lands.
//! - [`ViewScope`] drops responses that arrive after their view is gone.

pub mod auth_service;
pub mod guard;
pub mod scope;
pub mod store;

pub use self::auth_service::{AuthError, AuthService, STALE_LOGIN_MESSAGE};
pub use self::guard::{GuardDecision, guard, resolve};
pub use self::scope::{ScopeToken, ViewScope};
pub use self::store::{LoginOutcome, SessionError, SessionStore};
