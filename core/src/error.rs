//! Error types for the incident tracker API client.
//!
//! # Design
//! Every failure surfaces immediately as one `NetworkError`; nothing is
//! retried or recovered inside the client. `HttpError` carries only the
//! status code: callers branch on the code and never on the body.

use thiserror::Error;

/// Boxed cause of a transport-level failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `NetworkService` and the API facade.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Base URL and path do not form a valid absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport did not yield a well-formed HTTP response.
    #[error("invalid response")]
    InvalidResponse,

    /// The server answered with a status outside 200..=299.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// The response body could not be decoded into the expected type.
    #[error("decoding error: {0}")]
    DecodingError(#[source] serde_json::Error),

    /// A request payload could not be turned into a JSON object.
    #[error("encoding error: {0}")]
    EncodingError(#[source] serde_json::Error),

    /// Connection, timeout, TLS or any other transport failure.
    #[error("network error: {0}")]
    TransportError(#[source] BoxError),
}

impl NetworkError {
    /// Wraps any transport failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        NetworkError::TransportError(err.into())
    }

    /// The HTTP status code, for `HttpError`.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpError(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised while loading `ServerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}
