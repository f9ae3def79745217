//! Async API client core for the incident tracker service.
//!
//! # Overview
//! Turns declarative endpoint descriptors into HTTP requests, executes them
//! over a pluggable `Transport`, and normalizes responses into typed values
//! or a `NetworkError`. On top sits `IncidentTrackerClient`, which covers
//! authentication, incidents, the dashboard, users and worker tracking.
//!
//! # Design
//! - `NetworkService` keeps the build and parse halves free of I/O
//!   (`build_request`, `build_multipart_request`, `parse_response`); only
//!   `fetch` and `upload_multipart` await the transport.
//! - Base URL and default headers live in `SharedConfig`, passed in at
//!   construction. The authentication flow is its only writer.
//! - Wire DTOs (`types`) are kept separate from domain models (`models`);
//!   the mock-server crate defines its own copies and the integration tests
//!   catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod dates;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::IncidentTrackerClient;
pub use client::{build_multipart_request, build_request, parse_response, NetworkService};
pub use config::{ServerConfig, SharedConfig};
pub use endpoint::{Endpoint, Parameters};
pub use endpoints::ApiEndpoint;
pub use error::{ConfigError, NetworkError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use models::{filter_incidents, IncidentStatus};
pub use multipart::MultipartFile;
pub use transport::{ReqwestTransport, Transport};
pub use types::{AddWorkerTrackingRequest, EmptyResponse, SubmitIncidentRequest};
