//! Regression coverage for error normalisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::detail(json!({"detail": "Not found."}), "Not found.")]
#[case::message(json!({"message": "Event is sold out"}), "Event is sold out")]
#[case::non_field(
    json!({"non_field_errors": ["Unable to log in with provided credentials."]}),
    "Unable to log in with provided credentials."
)]
#[case::detail_wins(
    json!({"detail": "first", "message": "second", "non_field_errors": ["third"]}),
    "first"
)]
#[case::message_before_non_field(json!({"message": "second", "non_field_errors": ["third"]}), "second")]
#[case::field_errors_only(json!({"email": ["Enter a valid email address."]}), GENERIC_RESPONSE_MESSAGE)]
#[case::empty_non_field(json!({"non_field_errors": []}), GENERIC_RESPONSE_MESSAGE)]
#[case::non_string_detail(json!({"detail": 42}), GENERIC_RESPONSE_MESSAGE)]
#[case::array_body(json!(["unexpected"]), GENERIC_RESPONSE_MESSAGE)]
fn response_errors_prefer_server_text(#[case] body: Value, #[case] expected: &str) {
    let err = ApiError::response(400, Some(body));
    assert_eq!(handle_api_error(&err), expected);
}

#[test]
fn response_without_body_gets_generic_message() {
    assert_eq!(
        handle_api_error(&ApiError::response(500, None)),
        GENERIC_RESPONSE_MESSAGE
    );
}

#[test]
fn missing_response_gets_connectivity_message() {
    let err = ApiError::NoResponse {
        message: "connection reset by peer".to_owned(),
    };
    assert_eq!(handle_api_error(&err), NO_RESPONSE_MESSAGE);
}

#[rstest]
#[case::described("relative URL without a base", "relative URL without a base")]
#[case::blank("  ", UNKNOWN_ERROR_MESSAGE)]
fn dispatch_errors_use_their_description(#[case] message: &str, #[case] expected: &str) {
    assert_eq!(handle_api_error(&ApiError::dispatch(message)), expected);
}
