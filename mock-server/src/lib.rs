//! In-memory incident tracker backend.
//!
//! Mirrors the production API closely enough for client integration tests:
//! email/OTP login issuing a fixed bearer token, incidents with status
//! changes and image uploads, incident types, dashboard counts, users and
//! worker tracking. All state lives in one `RwLock` and is lost on exit.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// The only OTP the mock accepts.
pub const VALID_OTP: &str = "1234";

/// Bearer token handed out by `/verify-otp`.
pub const TOKEN: &str = "mock-token";

/// Prefix of media URLs stored for uploaded images.
pub const MEDIA_BASE_URL: &str = "https://media.mock.local";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    pub type_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    pub assignee_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub medias: Vec<Media>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub mime_type: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: i64,
    pub incident_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: i64,
    pub user_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(rename = "TrackingId")]
    pub tracking_id: String,
    #[serde(rename = "TrackingLongitude")]
    pub tracking_longitude: f64,
    #[serde(rename = "TrackingLatitude")]
    pub tracking_latitude: f64,
    #[serde(rename = "TrackingTime")]
    pub tracking_time: String,
    #[serde(rename = "AssigedWorkerId")]
    pub assigned_worker_id: String,
    #[serde(rename = "BusNumber")]
    pub bus_number: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyOtp {
    pub email: String,
    pub otp: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIncident {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: i64,
    pub type_id: i64,
    pub priority: Option<i64>,
    pub issuer_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatus {
    pub incident_id: String,
    pub status: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddTracking {
    pub tracking_longitude: f64,
    pub tracking_latitude: f64,
    pub tracking_time: String,
    pub bus_number: String,
}

#[derive(Default)]
pub struct Store {
    pub incidents: Vec<Incident>,
    /// Users keyed by email, created on first successful OTP check.
    pub users: BTreeMap<String, User>,
    pub tracking: Vec<Tracking>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
        .route("/incident", get(list_incidents).post(submit_incident))
        .route("/incident/change-status", put(change_status))
        .route("/incident/upload/{id}", post(upload_image))
        .route("/types", get(incident_types))
        .route("/dashboard", get(dashboard))
        .route("/user", get(list_users))
        .route("/buses/track-bus", get(list_tracking).post(add_tracking))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rejects requests without `Authorization: Bearer <TOKEN>`.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(Json(input): Json<Login>) -> StatusCode {
    info!(email = %input.email, "otp requested");
    StatusCode::OK
}

async fn verify_otp(
    State(db): State<Db>,
    Json(input): Json<VerifyOtp>,
) -> Result<Json<Value>, StatusCode> {
    if input.otp != VALID_OTP {
        info!(email = %input.email, "otp rejected");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let mut store = db.write().await;
    store.users.entry(input.email.clone()).or_insert_with(|| {
        let id = Uuid::new_v4().to_string();
        let stamp = now();
        User {
            id: id.clone(),
            email: input.email.clone(),
            created_at: stamp.clone(),
            updated_at: stamp,
            roles: vec![Role {
                id: Uuid::new_v4().to_string(),
                kind: 1,
                user_id: id,
            }],
        }
    });
    info!(email = %input.email, "otp verified");
    Ok(Json(json!({ "token": TOKEN, "roles": [1] })))
}

async fn list_incidents(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    let store = db.read().await;
    Ok(Json(json!({ "incidents": store.incidents })))
}

async fn submit_incident(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<SubmitIncident>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    let stamp = now();
    let incident = Incident {
        id: Uuid::new_v4().to_string(),
        description: input.description,
        latitude: input.latitude,
        longitude: input.longitude,
        status: input.status,
        priority: input.priority,
        type_id: input.type_id,
        issuer_id: input.issuer_id,
        assignee_id: None,
        created_at: stamp.clone(),
        updated_at: stamp,
        medias: Vec::new(),
    };
    info!(id = %incident.id, "incident submitted");
    db.write().await.incidents.push(incident.clone());
    Ok(Json(json!({ "incidents": [incident] })))
}

async fn change_status(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ChangeStatus>,
) -> Result<Json<Incident>, StatusCode> {
    authorize(&headers)?;
    if !(0..=3).contains(&input.status) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    let incident = store
        .incidents
        .iter_mut()
        .find(|i| i.id == input.incident_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    incident.status = input.status;
    incident.updated_at = now();
    info!(id = %incident.id, status = input.status, "incident status changed");
    Ok(Json(incident.clone()))
}

async fn upload_image(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<&'static str, StatusCode> {
    authorize(&headers)?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("image") {
            continue;
        }
        let mime_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        image = Some((mime_type, bytes.len()));
    }
    let (mime_type, size) = image.ok_or(StatusCode::BAD_REQUEST)?;

    let mut store = db.write().await;
    let incident = store
        .incidents
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let media_id = Uuid::new_v4().to_string();
    incident.medias.push(Media {
        id: media_id.clone(),
        mime_type,
        url: format!("{MEDIA_BASE_URL}/{media_id}.jpg"),
        kind: 0,
        incident_id: id.clone(),
    });
    info!(id = %id, bytes = size, "image uploaded");
    Ok("OK")
}

async fn incident_types(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    Ok(Json(json!([
        {
            "id": 1,
            "arabicName": "طرق",
            "englishName": "Roads",
            "subTypes": [
                { "id": 11, "arabicName": "حفرة", "englishName": "Pothole", "categoryId": 1 },
                { "id": 12, "arabicName": "إنارة", "englishName": "Street light", "categoryId": 1 }
            ]
        },
        { "id": 2, "arabicName": "نظافة", "englishName": "Cleanliness", "subTypes": [] }
    ])))
}

async fn dashboard(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    let store = db.read().await;
    let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
    for incident in &store.incidents {
        *counts.entry(incident.status).or_default() += 1;
    }
    let incidents: Vec<Value> = counts
        .into_iter()
        .map(|(status, count)| json!({ "status": status, "_count": { "status": count } }))
        .collect();
    Ok(Json(json!({ "baseURL": MEDIA_BASE_URL, "incidents": incidents })))
}

async fn list_users(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<User>>, StatusCode> {
    authorize(&headers)?;
    let store = db.read().await;
    Ok(Json(store.users.values().cloned().collect()))
}

async fn add_tracking(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AddTracking>,
) -> Result<Json<Tracking>, StatusCode> {
    authorize(&headers)?;
    let time = NaiveDateTime::parse_from_str(&input.tracking_time, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?
        .and_utc();
    let tracking = Tracking {
        tracking_id: Uuid::new_v4().to_string(),
        tracking_longitude: input.tracking_longitude,
        tracking_latitude: input.tracking_latitude,
        tracking_time: time.to_rfc3339_opts(SecondsFormat::Millis, true),
        assigned_worker_id: Uuid::nil().to_string(),
        bus_number: input.bus_number,
    };
    info!(id = %tracking.tracking_id, bus = %tracking.bus_number, "tracking recorded");
    db.write().await.tracking.push(tracking.clone());
    Ok(Json(tracking))
}

async fn list_tracking(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Tracking>>, StatusCode> {
    authorize(&headers)?;
    let store = db.read().await;
    Ok(Json(store.tracking.clone()))
}
