//! Domain models and the DTO mappings that produce them.
//!
//! Mapping is pure: missing lists become empty, a user's missing strings
//! become empty strings, and dashboard rows whose status is not a known
//! `IncidentStatus` are dropped.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{
    DashboardIncidentResponse, DashboardResponse, IncidentMediaResponse, IncidentResponse,
    IncidentSubTypeResponse, IncidentTypeResponse, TrackingResponse, UserResponse,
    UserRoleResponse, VerificationResponse,
};

/// Lifecycle of an incident, with the backend's integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncidentStatus {
    Submitted = 0,
    InProgress = 1,
    Completed = 2,
    Rejected = 3,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 4] = [
        IncidentStatus::Submitted,
        IncidentStatus::InProgress,
        IncidentStatus::Completed,
        IncidentStatus::Rejected,
    ];

    /// Maps a backend code; unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(IncidentStatus::Submitted),
            1 => Some(IncidentStatus::InProgress),
            2 => Some(IncidentStatus::Completed),
            3 => Some(IncidentStatus::Rejected),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            IncidentStatus::Submitted => "Submitted",
            IncidentStatus::InProgress => "InProgress",
            IncidentStatus::Completed => "Completed",
            IncidentStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub id: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<IncidentStatus>,
    pub priority: Option<i64>,
    pub type_id: Option<i64>,
    pub issuer_id: Option<String>,
    pub assignee_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub media: Vec<IncidentMedia>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncidentMedia {
    pub id: String,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub kind: Option<i64>,
    pub incident_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentType {
    pub id: i64,
    pub arabic_name: Option<String>,
    pub english_name: Option<String>,
    pub sub_types: Vec<IncidentSubType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentSubType {
    pub id: i64,
    pub arabic_name: Option<String>,
    pub english_name: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub base_url: Option<String>,
    pub incidents: Vec<DashboardIncident>,
}

impl Dashboard {
    /// Total number of incidents across all statuses.
    pub fn total(&self) -> i64 {
        self.incidents.iter().map(|i| i.count).sum()
    }
}

/// Count of incidents in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardIncident {
    pub status: IncidentStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub otp: String,
    pub token: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub roles: Vec<UserRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRole {
    pub id: String,
    pub kind: Option<i64>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tracking {
    pub id: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub time: DateTime<Utc>,
    pub assigned_worker_id: Option<String>,
}

/// Outcome of a successful OTP check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub token: Option<String>,
    pub roles: Option<Vec<i64>>,
}

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

impl From<IncidentResponse> for Incident {
    fn from(r: IncidentResponse) -> Self {
        Self {
            id: r.id,
            description: r.description,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status.and_then(IncidentStatus::from_code),
            priority: r.priority,
            type_id: r.type_id,
            issuer_id: r.issuer_id,
            assignee_id: r.assignee_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            media: map_list(r.media),
        }
    }
}

impl From<IncidentMediaResponse> for IncidentMedia {
    fn from(r: IncidentMediaResponse) -> Self {
        Self {
            id: r.id,
            mime_type: r.mime_type,
            url: r.url,
            kind: r.kind,
            incident_id: r.incident_id,
        }
    }
}

impl From<IncidentTypeResponse> for IncidentType {
    fn from(r: IncidentTypeResponse) -> Self {
        Self {
            id: r.id,
            arabic_name: r.arabic_name,
            english_name: r.english_name,
            sub_types: map_list(r.sub_types),
        }
    }
}

impl From<IncidentSubTypeResponse> for IncidentSubType {
    fn from(r: IncidentSubTypeResponse) -> Self {
        Self {
            id: r.id,
            arabic_name: r.arabic_name,
            english_name: r.english_name,
            category_id: r.category_id,
        }
    }
}

impl From<DashboardResponse> for Dashboard {
    fn from(r: DashboardResponse) -> Self {
        Self {
            base_url: r.base_url,
            incidents: r
                .incidents
                .unwrap_or_default()
                .into_iter()
                .filter_map(DashboardIncident::from_response)
                .collect(),
        }
    }
}

impl DashboardIncident {
    /// `None` when the status is missing or unknown; a missing count is 0.
    pub fn from_response(r: DashboardIncidentResponse) -> Option<Self> {
        let status = r.status.and_then(IncidentStatus::from_code)?;
        let count = r.count.and_then(|c| c.status).unwrap_or(0);
        Some(Self { status, count })
    }
}

impl From<UserResponse> for User {
    fn from(r: UserResponse) -> Self {
        Self {
            id: r.id,
            email: r.email.unwrap_or_default(),
            otp: r.otp.unwrap_or_default(),
            token: r.token.unwrap_or_default(),
            created_at: r.created_at,
            updated_at: r.updated_at,
            roles: map_list(r.roles),
        }
    }
}

impl From<UserRoleResponse> for UserRole {
    fn from(r: UserRoleResponse) -> Self {
        Self {
            id: r.id,
            kind: r.kind,
            user_id: r.user_id,
        }
    }
}

impl From<TrackingResponse> for Tracking {
    fn from(r: TrackingResponse) -> Self {
        Self {
            id: r.tracking_id,
            longitude: r.tracking_longitude,
            latitude: r.tracking_latitude,
            time: r.tracking_time,
            assigned_worker_id: r.assigned_worker_id,
        }
    }
}

impl From<VerificationResponse> for Verification {
    fn from(r: VerificationResponse) -> Self {
        Self {
            token: r.token,
            roles: r.roles,
        }
    }
}

/// Maps an optional DTO list, treating `None` as empty.
pub fn map_list<D, M: From<D>>(items: Option<Vec<D>>) -> Vec<M> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(M::from)
        .collect()
}

/// Incidents matching both filters. `None` matches everything. A day filter
/// compares the UTC calendar day of `created_at` and excludes incidents
/// without one.
pub fn filter_incidents(
    incidents: &[Incident],
    status: Option<IncidentStatus>,
    day: Option<NaiveDate>,
) -> Vec<Incident> {
    incidents
        .iter()
        .filter(|incident| match status {
            Some(status) => incident.status == Some(status),
            None => true,
        })
        .filter(|incident| match day {
            Some(day) => incident.created_at.is_some_and(|at| at.date_naive() == day),
            None => true,
        })
        .cloned()
        .collect()
}
