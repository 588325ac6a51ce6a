//! Domain ports and supporting types for the hexagonal boundary.
//!
//! The session and API layers only talk to the outside world through these
//! traits. Outbound adapters in [`crate::outbound`] implement them for real
//! infrastructure; the `Fixture*` types implement them in memory.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;
mod navigator;
mod session_storage;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{
    FixtureHttpTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    HttpTransportError, MultipartForm, MultipartPart, RequestBody,
};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{FixtureNavigator, Navigator};
#[cfg(test)]
pub use session_storage::MockSessionStorage;
pub use session_storage::{
    FixtureSessionStorage, SessionStorage, SessionStorageError, TOKEN_KEY, USER_KEY,
};
