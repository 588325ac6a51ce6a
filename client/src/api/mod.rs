//! Backend access: the HTTP adapter, typed resource clients, and error
//! normalisation.
//!
//! Resource clients never reach the transport directly. Every call goes
//! through [`ApiClient::send`], which owns token injection and the 401
//! teardown.

mod auth;
mod categories;
pub mod client;
pub mod error;
mod events;
mod notifications;
pub mod request;
mod reviews;
mod users;

pub use self::auth::AuthApi;
pub use self::categories::CategoriesApi;
pub use self::client::{ApiClient, REQUEST_ID_HEADER};
pub use self::error::{
    GENERIC_RESPONSE_MESSAGE, NO_RESPONSE_MESSAGE, UNKNOWN_ERROR_MESSAGE, handle_api_error,
};
pub use self::events::EventsApi;
pub use self::notifications::NotificationsApi;
pub use self::request::{ApiRequest, ApiResponse};
pub use self::reviews::ReviewsApi;
pub use self::users::{AVATAR_FIELD, UsersApi};
