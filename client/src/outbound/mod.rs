//! Outbound adapters implementing the domain ports.

pub mod file_storage;
pub mod navigation;
pub mod reqwest_transport;

pub use self::file_storage::{FileSessionStorage, SESSION_FILE};
pub use self::navigation::ChannelNavigator;
pub use self::reqwest_transport::{DEFAULT_USER_AGENT, ReqwestTransport};
