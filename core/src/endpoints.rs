//! Endpoint catalogue of the incident tracker backend, one enum per feature
//! area.
//!
//! # Design
//! Each variant knows its path, method, parameters and files; the provided
//! `ApiEndpoint::endpoint` method combines them with the current
//! `ServerConfig` (base URL and default headers) into an `Endpoint`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::endpoint::{Endpoint, Parameters};
use crate::error::NetworkError;
use crate::http::HttpMethod;
use crate::multipart::MultipartFile;
use crate::types::{AddWorkerTrackingRequest, SubmitIncidentRequest};

/// Paths relative to the configured base URL.
pub mod paths {
    pub const LOGIN: &str = "login";
    pub const VERIFY_OTP: &str = "verify-otp";
    pub const INCIDENT_TYPES: &str = "types";
    pub const INCIDENTS: &str = "incident";
    pub const INCIDENT_CHANGE_STATUS: &str = "incident/change-status";
    pub const INCIDENT_UPLOAD: &str = "incident/upload";
    pub const TRACK_BUS: &str = "buses/track-bus";
    pub const USERS: &str = "user";
    pub const DASHBOARD: &str = "dashboard";
}

/// Form field carrying an uploaded incident image.
pub const IMAGE_FIELD: &str = "image";

pub trait ApiEndpoint {
    fn path(&self) -> String;

    fn method(&self) -> HttpMethod;

    fn parameters(&self) -> Result<Option<Parameters>, NetworkError> {
        Ok(None)
    }

    fn files(&self) -> Vec<MultipartFile> {
        Vec::new()
    }

    /// Builds the descriptor against `config`, carrying its default headers.
    fn endpoint(&self, config: &ServerConfig) -> Result<Endpoint, NetworkError> {
        let mut endpoint = Endpoint::new(config.base_url.clone(), self.path(), self.method())
            .with_headers(config.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        endpoint.parameters = self.parameters()?;
        endpoint.files = self.files();
        Ok(endpoint)
    }
}

/// Serializes a payload into endpoint parameters. The payload must encode
/// as a JSON object.
pub fn to_parameters<T: Serialize>(payload: &T) -> Result<Parameters, NetworkError> {
    match serde_json::to_value(payload).map_err(NetworkError::EncodingError)? {
        Value::Object(map) => Ok(map),
        _ => Err(NetworkError::EncodingError(serde::ser::Error::custom(
            "payload is not a JSON object",
        ))),
    }
}

fn object(value: Value) -> Option<Parameters> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEndpoint {
    Login { email: String },
    VerifyOtp { email: String, otp: String },
}

impl ApiEndpoint for AuthEndpoint {
    fn path(&self) -> String {
        match self {
            AuthEndpoint::Login { .. } => paths::LOGIN.to_string(),
            AuthEndpoint::VerifyOtp { .. } => paths::VERIFY_OTP.to_string(),
        }
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn parameters(&self) -> Result<Option<Parameters>, NetworkError> {
        Ok(match self {
            AuthEndpoint::Login { email } => object(json!({ "email": email })),
            AuthEndpoint::VerifyOtp { email, otp } => object(json!({ "email": email, "otp": otp })),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncidentEndpoint {
    ChangeStatus { id: String, status: i64 },
    List,
    Types,
    Submit(SubmitIncidentRequest),
    UploadImage { id: String, image: Vec<u8> },
}

impl ApiEndpoint for IncidentEndpoint {
    fn path(&self) -> String {
        match self {
            IncidentEndpoint::ChangeStatus { .. } => paths::INCIDENT_CHANGE_STATUS.to_string(),
            IncidentEndpoint::List | IncidentEndpoint::Submit(_) => paths::INCIDENTS.to_string(),
            IncidentEndpoint::Types => paths::INCIDENT_TYPES.to_string(),
            IncidentEndpoint::UploadImage { id, .. } => format!("{}/{id}", paths::INCIDENT_UPLOAD),
        }
    }

    fn method(&self) -> HttpMethod {
        match self {
            IncidentEndpoint::ChangeStatus { .. } => HttpMethod::Put,
            IncidentEndpoint::List | IncidentEndpoint::Types => HttpMethod::Get,
            IncidentEndpoint::Submit(_) | IncidentEndpoint::UploadImage { .. } => HttpMethod::Post,
        }
    }

    fn parameters(&self) -> Result<Option<Parameters>, NetworkError> {
        match self {
            IncidentEndpoint::ChangeStatus { id, status } => {
                Ok(object(json!({ "incidentId": id, "status": status })))
            }
            IncidentEndpoint::Submit(request) => to_parameters(request).map(Some),
            IncidentEndpoint::List | IncidentEndpoint::Types | IncidentEndpoint::UploadImage { .. } => {
                Ok(None)
            }
        }
    }

    fn files(&self) -> Vec<MultipartFile> {
        match self {
            IncidentEndpoint::UploadImage { image, .. } => {
                vec![MultipartFile::jpeg(IMAGE_FIELD, image.clone())]
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEndpoint {
    Details,
}

impl ApiEndpoint for DashboardEndpoint {
    fn path(&self) -> String {
        paths::DASHBOARD.to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEndpoint {
    List,
}

impl ApiEndpoint for UserEndpoint {
    fn path(&self) -> String {
        paths::USERS.to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerTrackingEndpoint {
    Add(AddWorkerTrackingRequest),
    List,
}

impl ApiEndpoint for WorkerTrackingEndpoint {
    fn path(&self) -> String {
        paths::TRACK_BUS.to_string()
    }

    fn method(&self) -> HttpMethod {
        match self {
            WorkerTrackingEndpoint::Add(_) => HttpMethod::Post,
            WorkerTrackingEndpoint::List => HttpMethod::Get,
        }
    }

    fn parameters(&self) -> Result<Option<Parameters>, NetworkError> {
        match self {
            WorkerTrackingEndpoint::Add(request) => to_parameters(request).map(Some),
            WorkerTrackingEndpoint::List => Ok(None),
        }
    }
}
