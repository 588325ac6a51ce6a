//! Session-aware client for the city events REST API.
//!
//! The crate is organised as ports and adapters:
//!
//! - [`domain`] holds payload types, routes, the API error taxonomy, and the
//!   ports for HTTP, storage, and navigation.
//! - [`api`] is the HTTP adapter plus one typed client per backend resource.
//! - [`session`] holds the signed-in user, the auth flows, and the
//!   navigation guard.
//! - [`outbound`] implements the ports with reqwest, the filesystem, and a
//!   channel.
//!
//! [`connect`] wires the production adapters from [`config::ClientSettings`].

pub mod api;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod session;

use std::io;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

pub use crate::api::ApiClient;
pub use crate::session::{AuthService, SessionStore};

use crate::config::ClientSettings;
use crate::domain::Route;
use crate::outbound::{ChannelNavigator, FileSessionStorage, ReqwestTransport};

/// Errors raised while wiring the production adapters.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The configured API URL is invalid.
    #[error("invalid API URL: {0}")]
    ApiUrl(#[from] url::ParseError),
    /// The storage directory could not be opened.
    #[error("session storage unavailable: {0}")]
    Storage(#[from] io::Error),
    /// The HTTP client could not be built.
    #[error("HTTP client could not be built: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fully wired client and the receiver of forced navigations.
#[derive(Debug)]
pub struct Connection {
    /// API adapter sharing the hydrated session.
    pub client: ApiClient,
    /// Routes the session layer asked to open, such as the login form after
    /// a 401.
    pub navigation: UnboundedReceiver<Route>,
}

/// Hydrate the persisted session and build an adapter over reqwest.
///
/// # Errors
///
/// Returns [`ConnectError`] when configuration or infrastructure is unusable.
pub fn connect(settings: &ClientSettings) -> Result<Connection, ConnectError> {
    let base_url = settings.api_url()?;
    let storage = Arc::new(FileSessionStorage::open(&settings.storage_dir())?);
    let transport = Arc::new(ReqwestTransport::new(
        settings.request_timeout(),
        settings.user_agent(),
    )?);
    let (navigator, navigation) = ChannelNavigator::channel();
    let session = SessionStore::hydrate(storage);
    let client = ApiClient::new(base_url, transport, session, Arc::new(navigator));
    Ok(Connection { client, navigation })
}
