//! Driven port for dispatching one HTTP exchange.
//!
//! The transport knows nothing about sessions, tokens, or the backend's
//! resource layout: it receives a fully prepared [`HttpRequest`] from the
//! API adapter and hands back whatever status and body arrived. Failures
//! are split the same way the error taxonomy splits them: a request that
//! left the client but got no answer, and a request that never left.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::define_port_error;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Canonical upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One file or field inside a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    /// Form field name.
    pub name: String,
    /// File name reported to the server, if the part is a file.
    pub file_name: Option<String>,
    /// MIME type of the part.
    pub content_type: Option<String>,
    /// Raw bytes of the part.
    pub bytes: Vec<u8>,
}

/// `multipart/form-data` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    /// Append a part.
    pub fn part(mut self, part: MultipartPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

/// Body of an outbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Multipart form; the transport chooses the boundary.
    Multipart(MultipartForm),
}

/// Fully prepared outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// First value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response handed back by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response carrying a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// Build a response without a body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

define_port_error! {
    /// Errors surfaced by the transport.
    pub enum HttpTransportError {
        /// The request was sent but no response arrived.
        NoResponse { message: String } => "no response received: {message}",
        /// The request could not be built or sent.
        Dispatch { message: String } => "request could not be sent: {message}",
    }
}

/// Port for sending HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and return the raw response, whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpTransportError>;
}

#[derive(Debug, Clone)]
struct ScriptedExchange {
    method: HttpMethod,
    path: String,
    outcome: Result<HttpResponse, HttpTransportError>,
    delay: Option<Duration>,
}

/// Scripted transport that answers by method and URL path.
///
/// Unscripted requests receive `404 {"detail": "Not found."}`. Every request
/// is recorded so tests can inspect headers and bodies afterwards.
///
/// # Examples
/// ```
/// use events_client::domain::ports::{FixtureHttpTransport, HttpMethod};
/// use serde_json::json;
///
/// let transport = FixtureHttpTransport::default()
///     .respond(HttpMethod::Get, "/api/v1/categories/", 200, json!([]));
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct FixtureHttpTransport {
    script: Mutex<Vec<ScriptedExchange>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FixtureHttpTransport {
    /// Answer `method path` with a JSON body.
    pub fn respond(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.script(method, path, Ok(HttpResponse::json(status, &body)), None)
    }

    /// Answer `method path` with a JSON body after `delay`.
    pub fn respond_after(
        self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> Self {
        self.script(method, path, Ok(HttpResponse::json(status, &body)), Some(delay))
    }

    /// Fail `method path` with a transport error.
    pub fn fail(self, method: HttpMethod, path: &str, error: HttpTransportError) -> Self {
        self.script(method, path, Err(error), None)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn script(
        self,
        method: HttpMethod,
        path: &str,
        outcome: Result<HttpResponse, HttpTransportError>,
        delay: Option<Duration>,
    ) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScriptedExchange {
                method,
                path: path.to_owned(),
                outcome,
                delay,
            });
        self
    }

    fn lookup(&self, request: &HttpRequest) -> Option<ScriptedExchange> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|exchange| {
                exchange.method == request.method && exchange.path == request.url.path()
            })
            .cloned()
    }
}

#[async_trait]
impl HttpTransport for FixtureHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpTransportError> {
        let exchange = self.lookup(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let Some(exchange) = exchange else {
            return Ok(HttpResponse::json(
                404,
                &serde_json::json!({ "detail": "Not found." }),
            ));
        };
        if let Some(delay) = exchange.delay {
            tokio::time::sleep(delay).await;
        }
        exchange.outcome
    }
}
