//! Domain primitives for the events client.
//!
//! Purpose: strongly typed request and response payloads for the events
//! backend, the routes the application can navigate to, the API error
//! taxonomy, and the ports the session and API layers depend on.
//!
//! Public surface:
//! - `ApiError`, `ApiErrorKind`, `ApiResult`: failure of a single API call.
//! - `UserProfile`, `ProfileUpdate`, `AvatarUpload`: the signed-in user.
//! - `LoginCredentials`, `RegistrationPayload`, `AuthToken`: authentication.
//! - `EventSummary`, `EventDetail`, `EventFilter`, `EventDraft`: events.
//! - `Category`, `Review`, `NewReview`, `Notification`: supporting resources.
//! - `Route`, `RouteAccess`: navigation targets.

pub mod auth;
pub mod category;
pub mod error;
pub mod event;
pub mod notification;
pub mod ports;
pub mod review;
pub mod routes;
pub mod user;

pub use self::auth::{
    AuthToken, EmptyTokenError, LoginCredentials, LoginResponse, LoginValidationError,
    PASSWORD_MIN_LEN, PasswordChange, RegistrationPayload, RegistrationResponse,
    RegistrationValidationError,
};
pub use self::category::Category;
pub use self::error::{ApiError, ApiErrorKind, ApiResult};
pub use self::event::{
    AgeRestriction, EventDetail, EventDraft, EventDraftValidationError, EventFilter,
    EventOrdering, EventStatus, EventSummary, InteractionKind, InteractionToggle, MyEventsType,
};
pub use self::notification::{Notification, NotificationType, UnreadCount};
pub use self::review::{NewReview, Review, ReviewStatus, ReviewValidationError};
pub use self::routes::{Route, RouteAccess};
pub use self::user::{
    AvatarUpload, AvatarValidationError, NotificationFrequency, ProfileUpdate, UserProfile,
};
