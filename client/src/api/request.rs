//! Request and response values exchanged between resource clients and the
//! adapter.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::ports::{HttpMethod, MultipartForm, RequestBody};
use crate::domain::{ApiError, ApiResult};

/// Relative API request built by a resource client.
///
/// Paths are held as unencoded segments; the adapter percent-encodes each
/// one and appends the trailing slash the backend expects.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    /// Start a request for `method` and path `segments`.
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET` request.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    /// `POST` request.
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Post, segments)
    }

    /// `PUT` request.
    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Put, segments)
    }

    /// `PATCH` request.
    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Patch, segments)
    }

    /// `DELETE` request.
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Delete, segments)
    }

    /// Append query pairs.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Attach a JSON body.
    ///
    /// A value that cannot be serialised is a dispatch error.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|err| ApiError::dispatch(err.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attach a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// HTTP verb.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Unencoded path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Query pairs in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Display form of the path, used in logs.
    pub fn path(&self) -> String {
        format!("/{}/", self.segments.join("/"))
    }

    pub(crate) fn into_body(self) -> RequestBody {
        self.body
    }
}

/// Successful response returned by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Status code in the 2xx range.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body into `T`.
    ///
    /// A body that does not decode is reported as a server-responded error
    /// without detail.
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            tracing::warn!(status = self.status, error = %err, "undecodable response body");
            ApiError::response(self.status, None)
        })
    }
}

pub(crate) fn parse_json_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use serde_json::json;

    #[test]
    fn path_joins_segments_with_trailing_slash() {
        let request = ApiRequest::post(["events", "jazz-night", "mark_going"]);
        assert_eq!(request.path(), "/events/jazz-night/mark_going/");
        assert_eq!(request.method(), HttpMethod::Post);
    }

    #[test]
    fn json_body_is_attached() {
        let request = ApiRequest::patch(["notifications", "4"])
            .json(&json!({ "is_read": true }))
            .expect("body serialises");
        assert_eq!(request.body(), &RequestBody::Json(json!({ "is_read": true })));
    }

    #[test]
    fn undecodable_success_is_a_response_error() {
        let response = ApiResponse {
            status: 200,
            body: br#"{"detail": "unexpected"}"#.to_vec(),
        };
        let err = response
            .decode::<Vec<Category>>()
            .expect_err("shape mismatch");
        assert_eq!(err, ApiError::response(200, None));
    }

    #[test]
    fn empty_body_is_not_json() {
        assert_eq!(parse_json_body(b""), None);
        assert_eq!(parse_json_body(b"<html>"), None);
        assert_eq!(parse_json_body(b"{}"), Some(json!({})));
    }
}
