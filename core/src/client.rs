//! Generic HTTP client: endpoint descriptor in, typed value out.
//!
//! # Design
//! `NetworkService` is split the same way in both directions. `build_*`
//! turns an `Endpoint` into an `HttpRequest` and `parse_response` turns an
//! `HttpResponse` into a typed result, neither touching the network. `fetch`
//! and `upload_multipart` glue the halves together through a `Transport`.
//! The service holds no mutable state, so concurrent calls need no
//! coordination.

use std::any::TypeId;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart;
use crate::transport::Transport;

const CONTENT_TYPE: &str = "Content-Type";
const CONTENT_LENGTH: &str = "Content-Length";
const APPLICATION_JSON: &str = "application/json";

/// Text returned for a `String` target when the body is empty.
pub const EMPTY_BODY_TEXT: &str = "OK";

/// Builds requests from `Endpoint` descriptors, sends them through a
/// `Transport` and normalizes the responses. Holds no mutable state, so one
/// instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct NetworkService<T> {
    transport: T,
}

impl<T: Transport> NetworkService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues `endpoint` with its configured method and decodes the body.
    pub async fn fetch<R>(&self, endpoint: &Endpoint) -> Result<R, NetworkError>
    where
        R: DeserializeOwned + 'static,
    {
        let request = build_request(endpoint)?;
        self.perform(request).await
    }

    /// Issues `endpoint` with a `multipart/form-data` body holding its
    /// parameters as form fields and its files as file parts.
    pub async fn upload_multipart<R>(&self, endpoint: &Endpoint) -> Result<R, NetworkError>
    where
        R: DeserializeOwned + 'static,
    {
        let request = build_multipart_request(endpoint, &multipart::generate_boundary())?;
        self.perform(request).await
    }

    async fn perform<R>(&self, request: HttpRequest) -> Result<R, NetworkError>
    where
        R: DeserializeOwned + 'static,
    {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");

        let result = match self.transport.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = response.status, bytes = response.body.len(), "received response");
                parse_response(response)
            }
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(%method, %url, error = %err, "request failed");
        }
        result
    }
}

/// Builds the request for `fetch`.
///
/// GET parameters go into the query string. For any other method the
/// parameters become a JSON body and `Content-Type: application/json` is set
/// after the endpoint's own headers.
pub fn build_request(endpoint: &Endpoint) -> Result<HttpRequest, NetworkError> {
    let url = endpoint.url_with_query()?;
    let mut request = HttpRequest {
        method: endpoint.method,
        url: url.into(),
        headers: Vec::new(),
        body: None,
    };
    for (name, value) in &endpoint.headers {
        request.set_header(name, value.clone());
    }

    if endpoint.method != HttpMethod::Get {
        if let Some(parameters) = &endpoint.parameters {
            let body = serde_json::to_vec(parameters).map_err(NetworkError::EncodingError)?;
            request.body = Some(body);
            request.set_header(CONTENT_TYPE, APPLICATION_JSON);
        }
    }
    Ok(request)
}

/// Builds the request for `upload_multipart`.
///
/// The multipart `Content-Type` is set first and any `Content-Type` among the
/// endpoint headers is skipped so the boundary cannot be overridden.
pub fn build_multipart_request(
    endpoint: &Endpoint,
    boundary: &str,
) -> Result<HttpRequest, NetworkError> {
    let url = endpoint.url()?;
    let mut request = HttpRequest {
        method: endpoint.method,
        url: url.into(),
        headers: vec![(CONTENT_TYPE.to_string(), multipart::content_type(boundary))],
        body: None,
    };
    for (name, value) in &endpoint.headers {
        if name.eq_ignore_ascii_case(CONTENT_TYPE) {
            continue;
        }
        request.set_header(name, value.clone());
    }

    let body = multipart::encode_body(endpoint.parameters.as_ref(), &endpoint.files, boundary);
    request.set_header(CONTENT_LENGTH, body.len().to_string());
    request.body = Some(body);
    Ok(request)
}

/// Normalizes a response into a typed value.
///
/// 1. A status outside 100..=599 is `InvalidResponse`.
/// 2. A status outside 200..=299 is `HttpError`, whatever the body says.
/// 3. An empty body yields `"OK"` for a `String` target and otherwise
///    decodes `{}`, so types with only optional fields succeed.
/// 4. A body reading `ok` (any case, surrounding whitespace ignored) yields
///    the text itself for a `String` target and otherwise decodes `{}`.
/// 5. Anything else is decoded as JSON.
pub fn parse_response<R>(response: HttpResponse) -> Result<R, NetworkError>
where
    R: DeserializeOwned + 'static,
{
    if !(100..=599).contains(&response.status) {
        return Err(NetworkError::InvalidResponse);
    }
    if !(200..=299).contains(&response.status) {
        return Err(NetworkError::HttpError(response.status));
    }

    if response.body.is_empty() {
        return acknowledgement(EMPTY_BODY_TEXT.to_string());
    }

    if let Ok(text) = std::str::from_utf8(&response.body) {
        if text.trim().eq_ignore_ascii_case("ok") {
            return acknowledgement(text.to_string());
        }
    }

    serde_json::from_slice(&response.body).map_err(NetworkError::DecodingError)
}

/// Result for a body that carries no data: `text` for `String` targets,
/// the decoding of an empty JSON object for everything else.
fn acknowledgement<R>(text: String) -> Result<R, NetworkError>
where
    R: DeserializeOwned + 'static,
{
    let value = if TypeId::of::<R>() == TypeId::of::<String>() {
        Value::String(text)
    } else {
        Value::Object(serde_json::Map::new())
    };
    serde_json::from_value(value).map_err(NetworkError::DecodingError)
}
