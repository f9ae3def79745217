//! Wire DTOs for the incident tracker API.
//!
//! # Design
//! These types mirror the backend schema field for field, including its
//! naming quirks (`baseURL`, `_count`, `medias`, PascalCase tracking fields,
//! `AssigedWorkerId`). Apart from identifiers every response field is
//! optional: the backend omits fields freely and an empty or `ok` body must
//! still decode into the acknowledgement types. Domain models in `models`
//! are what callers usually want.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::{iso8601_millis, simple_date_time};

/// Response of endpoints that only acknowledge, e.g. login and image upload.
/// Decodes from `{}` and ignores whatever fields a body happens to carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResponse {}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Payload for creating a new incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIncidentRequest {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: i64,
    pub type_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
}

/// One worker position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddWorkerTrackingRequest {
    pub tracking_longitude: f64,
    pub tracking_latitude: f64,
    #[serde(with = "simple_date_time")]
    pub tracking_time: DateTime<Utc>,
    pub bus_number: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponse {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub issuer_id: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default, with = "iso8601_millis::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601_millis::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "medias")]
    pub media: Option<Vec<IncidentMediaResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentMediaResponse {
    pub id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<i64>,
    #[serde(default)]
    pub incident_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentListResponse {
    #[serde(default)]
    pub incidents: Option<Vec<IncidentResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTypeResponse {
    pub id: i64,
    #[serde(default)]
    pub arabic_name: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub sub_types: Option<Vec<IncidentSubTypeResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSubTypeResponse {
    pub id: i64,
    #[serde(default)]
    pub arabic_name: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default, rename = "baseURL")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub incidents: Option<Vec<DashboardIncidentResponse>>,
}

/// Number of incidents in one status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardIncidentResponse {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default, rename = "_count")]
    pub count: Option<DashboardCountResponse>,
}

/// The backend nests the count under `_count.status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCountResponse {
    #[serde(default)]
    pub status: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, with = "iso8601_millis::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601_millis::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub roles: Option<Vec<UserRoleResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleResponse {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingResponse {
    #[serde(rename = "TrackingId")]
    pub tracking_id: String,
    #[serde(default, rename = "TrackingLongitude")]
    pub tracking_longitude: Option<f64>,
    #[serde(default, rename = "TrackingLatitude")]
    pub tracking_latitude: Option<f64>,
    #[serde(rename = "TrackingTime", with = "iso8601_millis")]
    pub tracking_time: DateTime<Utc>,
    #[serde(default, rename = "AssigedWorkerId")]
    pub assigned_worker_id: Option<String>,
}
