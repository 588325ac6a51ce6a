//! Normalisation of API failures into a single display message.

use serde_json::Value;

use crate::domain::ApiError;

/// Shown when the backend rejected a request without saying why.
pub const GENERIC_RESPONSE_MESSAGE: &str = "An error occurred while processing the request";
/// Shown when the backend never answered.
pub const NO_RESPONSE_MESSAGE: &str =
    "The server is not responding. Check your internet connection";
/// Shown when a request failed locally without a description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Human-readable message for a failed call.
///
/// Server-responded errors prefer the body's `detail`, then `message`, then
/// the first `non_field_errors` entry. Pure; logs nothing.
///
/// # Examples
/// ```
/// use events_client::api::handle_api_error;
/// use events_client::domain::ApiError;
/// use serde_json::json;
///
/// let err = ApiError::response(400, Some(json!({"non_field_errors": ["Bad credentials"]})));
/// assert_eq!(handle_api_error(&err), "Bad credentials");
/// ```
pub fn handle_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Response { body, .. } => body
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| GENERIC_RESPONSE_MESSAGE.to_owned()),
        ApiError::NoResponse { .. } => NO_RESPONSE_MESSAGE.to_owned(),
        ApiError::Dispatch { message } if message.trim().is_empty() => {
            UNKNOWN_ERROR_MESSAGE.to_owned()
        }
        ApiError::Dispatch { message } => message.clone(),
    }
}

fn server_message(body: &Value) -> Option<String> {
    text_field(body, "detail")
        .or_else(|| text_field(body, "message"))
        .or_else(|| {
            body.get("non_field_errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(non_blank)
        })
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(non_blank)
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests;
