//! Reqwest-backed HTTP transport.
//!
//! This adapter owns wire details only: method and header mapping, JSON and
//! multipart encoding, and classifying failures by whether the request ever
//! left the client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use tracing::warn;

use crate::domain::ports::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportError, MultipartForm,
    RequestBody,
};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("events-client/", env!("CARGO_PKG_VERSION"));

/// Transport over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport. Without `timeout` requests wait as long as the
    /// connection stays open.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpTransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(map_method(method), url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let builder = attach_body(builder, body)?;

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        // The status line has arrived; a broken body must not hide it.
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                warn!(status, error = %err, "response body could not be read");
                Vec::new()
            }
        };
        Ok(HttpResponse { status, body })
    }
}

fn map_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn attach_body(
    builder: RequestBuilder,
    body: RequestBody,
) -> Result<RequestBuilder, HttpTransportError> {
    match body {
        RequestBody::Empty => Ok(builder),
        RequestBody::Json(value) => Ok(builder.json(&value)),
        RequestBody::Multipart(form) => Ok(builder.multipart(build_form(form)?)),
    }
}

fn build_form(form: MultipartForm) -> Result<Form, HttpTransportError> {
    form.parts()
        .iter()
        .cloned()
        .try_fold(Form::new(), |acc, part| {
            let mut encoded = Part::bytes(part.bytes);
            if let Some(file_name) = part.file_name {
                encoded = encoded.file_name(file_name);
            }
            if let Some(content_type) = part.content_type {
                encoded = encoded.mime_str(&content_type).map_err(|err| {
                    HttpTransportError::dispatch(format!("invalid content type: {err}"))
                })?;
            }
            Ok(acc.part(part.name, encoded))
        })
}

fn map_transport_error(error: reqwest::Error) -> HttpTransportError {
    if error.is_builder() {
        HttpTransportError::dispatch(error.to_string())
    } else {
        HttpTransportError::no_response(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use crate::domain::ports::MultipartPart;
    use rstest::rstest;

    #[rstest]
    #[case(HttpMethod::Get, Method::GET)]
    #[case(HttpMethod::Post, Method::POST)]
    #[case(HttpMethod::Put, Method::PUT)]
    #[case(HttpMethod::Patch, Method::PATCH)]
    #[case(HttpMethod::Delete, Method::DELETE)]
    fn methods_map_one_to_one(#[case] method: HttpMethod, #[case] expected: Method) {
        assert_eq!(map_method(method), expected);
    }

    #[test]
    fn invalid_part_content_type_is_a_dispatch_error() {
        let form = MultipartForm::default().part(MultipartPart {
            name: "avatar".to_owned(),
            file_name: Some("me.png".to_owned()),
            content_type: Some("not a mime".to_owned()),
            bytes: vec![1, 2, 3],
        });

        let err = build_form(form).expect_err("mime must fail");
        assert!(matches!(err, HttpTransportError::Dispatch { .. }));
    }

    #[test]
    fn transport_builds_with_and_without_timeout() {
        assert!(ReqwestTransport::new(None, DEFAULT_USER_AGENT).is_ok());
        assert!(ReqwestTransport::new(Some(Duration::from_secs(5)), DEFAULT_USER_AGENT).is_ok());
    }
}
