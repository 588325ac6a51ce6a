//! API error taxonomy.
//!
//! Every failed call resolves to exactly one [`ApiError`] variant. The
//! variants mirror how far the exchange got: the backend answered with a
//! failure, the request left but nothing came back, or the request never
//! left the client. Human-readable messages are derived separately by
//! [`crate::api::handle_api_error`].

use serde_json::Value;

use crate::domain::ports::HttpTransportError;

/// Coarse failure category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The backend returned a non-success status.
    Response,
    /// The request was dispatched but no response arrived.
    NoResponse,
    /// The request could not be built or sent.
    Dispatch,
}

/// Failure of a single API call.
///
/// # Examples
/// ```
/// use events_client::domain::{ApiError, ApiErrorKind};
///
/// let err = ApiError::response(404, Some(serde_json::json!({"detail": "Not found."})));
/// assert_eq!(err.kind(), ApiErrorKind::Response);
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status, or with a success
    /// status whose body could not be decoded.
    #[error("server responded with status {status}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Parsed JSON body, when the body was JSON.
        body: Option<Value>,
    },
    /// The request was dispatched but no response arrived.
    #[error("no response received: {message}")]
    NoResponse {
        /// Transport description.
        message: String,
    },
    /// The request could not be built or sent.
    #[error("request could not be sent: {message}")]
    Dispatch {
        /// Underlying description; may be blank.
        message: String,
    },
}

impl ApiError {
    /// Server-responded error.
    pub fn response(status: u16, body: Option<Value>) -> Self {
        Self::Response { status, body }
    }

    /// Dispatch error with the given description.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }

    /// Failure category.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Response { .. } => ApiErrorKind::Response,
            Self::NoResponse { .. } => ApiErrorKind::NoResponse,
            Self::Dispatch { .. } => ApiErrorKind::Dispatch,
        }
    }

    /// HTTP status for server-responded errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::NoResponse { .. } | Self::Dispatch { .. } => None,
        }
    }

    /// Whether the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<HttpTransportError> for ApiError {
    fn from(value: HttpTransportError) -> Self {
        match value {
            HttpTransportError::NoResponse { message } => Self::NoResponse { message },
            HttpTransportError::Dispatch { message } => Self::Dispatch { message },
        }
    }
}

/// Result alias used by the resource clients.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_response(
        HttpTransportError::no_response("connection reset"),
        ApiErrorKind::NoResponse
    )]
    #[case::dispatch(HttpTransportError::dispatch("invalid header"), ApiErrorKind::Dispatch)]
    fn transport_errors_keep_their_kind(
        #[case] source: HttpTransportError,
        #[case] expected: ApiErrorKind,
    ) {
        let err = ApiError::from(source);
        assert_eq!(err.kind(), expected);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn unauthorized_is_detected_from_status() {
        assert!(ApiError::response(401, None).is_unauthorized());
        assert!(!ApiError::response(403, None).is_unauthorized());
        assert!(!ApiError::dispatch("").is_unauthorized());
    }
}
