//! Typed facade over the incident tracker backend.
//!
//! # Design
//! `IncidentTrackerClient` pairs a `NetworkService` with the `SharedConfig`
//! handle. Every call takes a fresh configuration snapshot, builds the
//! endpoint, awaits the response and maps the DTO into a domain model.
//! Authentication state lives only in the configuration: after a successful
//! `verify_otp` the caller decides whether to `set_authorization_token`.

use crate::client::NetworkService;
use crate::config::SharedConfig;
use crate::endpoints::{
    ApiEndpoint, AuthEndpoint, DashboardEndpoint, IncidentEndpoint, UserEndpoint,
    WorkerTrackingEndpoint,
};
use crate::error::NetworkError;
use crate::models::{
    map_list, Dashboard, DashboardIncident, Incident, IncidentStatus, IncidentType, Tracking,
    User, Verification,
};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    AddWorkerTrackingRequest, DashboardResponse, EmptyResponse, IncidentListResponse,
    IncidentResponse, IncidentTypeResponse, SubmitIncidentRequest, TrackingResponse,
    UserResponse, VerificationResponse,
};

/// Client for the incident tracker backend.
///
/// Each method maps to one backend operation and returns domain models.
/// Base URL and bearer token come from the shared configuration.
#[derive(Debug, Clone)]
pub struct IncidentTrackerClient<T> {
    service: NetworkService<T>,
    config: SharedConfig,
}

impl IncidentTrackerClient<ReqwestTransport> {
    /// A client over the default reqwest transport.
    pub fn with_reqwest(config: SharedConfig) -> Result<Self, NetworkError> {
        Ok(Self::new(ReqwestTransport::new()?, config))
    }
}

impl<T: Transport> IncidentTrackerClient<T> {
    pub fn new(transport: T, config: SharedConfig) -> Self {
        Self {
            service: NetworkService::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn service(&self) -> &NetworkService<T> {
        &self.service
    }

    /// Sets or clears the bearer token sent with every later request.
    pub fn set_authorization_token(&self, token: Option<&str>) {
        self.config.set_authorization_header(token);
    }

    async fn fetch<R, E>(&self, endpoint: &E) -> Result<R, NetworkError>
    where
        R: serde::de::DeserializeOwned + 'static,
        E: ApiEndpoint,
    {
        let endpoint = endpoint.endpoint(&self.config.snapshot())?;
        self.service.fetch(&endpoint).await
    }

    // --- auth ---

    /// Requests an OTP for `email`. The backend answers with an empty body.
    pub async fn login(&self, email: &str) -> Result<(), NetworkError> {
        let _: EmptyResponse = self
            .fetch(&AuthEndpoint::Login {
                email: email.to_string(),
            })
            .await?;
        Ok(())
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Verification, NetworkError> {
        let response: VerificationResponse = self
            .fetch(&AuthEndpoint::VerifyOtp {
                email: email.to_string(),
                otp: otp.to_string(),
            })
            .await?;
        Ok(response.into())
    }

    // --- incidents ---

    pub async fn get_incidents(&self) -> Result<Vec<Incident>, NetworkError> {
        let response: IncidentListResponse = self.fetch(&IncidentEndpoint::List).await?;
        Ok(map_list(response.incidents))
    }

    pub async fn get_incident_types(&self) -> Result<Vec<IncidentType>, NetworkError> {
        let response: Vec<IncidentTypeResponse> = self.fetch(&IncidentEndpoint::Types).await?;
        Ok(map_list(Some(response)))
    }

    /// Submits a new incident and returns the first incident the backend
    /// echoes back, if any.
    pub async fn submit_incident(
        &self,
        request: SubmitIncidentRequest,
    ) -> Result<Option<Incident>, NetworkError> {
        let response: IncidentListResponse = self.fetch(&IncidentEndpoint::Submit(request)).await?;
        Ok(map_list::<_, Incident>(response.incidents).into_iter().next())
    }

    pub async fn change_incident_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<Incident, NetworkError> {
        let response: IncidentResponse = self
            .fetch(&IncidentEndpoint::ChangeStatus {
                id: id.to_string(),
                status: status.code(),
            })
            .await?;
        Ok(response.into())
    }

    /// Uploads a JPEG image for incident `id` as multipart field `image`.
    pub async fn upload_incident_image(&self, id: &str, image: Vec<u8>) -> Result<(), NetworkError> {
        let endpoint = IncidentEndpoint::UploadImage {
            id: id.to_string(),
            image,
        }
        .endpoint(&self.config.snapshot())?;
        let _: EmptyResponse = self.service.upload_multipart(&endpoint).await?;
        Ok(())
    }

    // --- dashboard ---

    pub async fn get_dashboard(&self) -> Result<Vec<DashboardIncident>, NetworkError> {
        let response: DashboardResponse = self.fetch(&DashboardEndpoint::Details).await?;
        Ok(Dashboard::from(response).incidents)
    }

    /// The full dashboard, including the media base URL.
    pub async fn get_dashboard_details(&self) -> Result<Dashboard, NetworkError> {
        let response: DashboardResponse = self.fetch(&DashboardEndpoint::Details).await?;
        Ok(response.into())
    }

    // --- users ---

    pub async fn get_users(&self) -> Result<Vec<User>, NetworkError> {
        let response: Vec<UserResponse> = self.fetch(&UserEndpoint::List).await?;
        Ok(map_list(Some(response)))
    }

    // --- worker tracking ---

    pub async fn add_worker_tracking(
        &self,
        request: AddWorkerTrackingRequest,
    ) -> Result<Tracking, NetworkError> {
        let response: TrackingResponse = self.fetch(&WorkerTrackingEndpoint::Add(request)).await?;
        Ok(response.into())
    }

    pub async fn get_worker_tracking(&self) -> Result<Vec<Tracking>, NetworkError> {
        let response: Vec<TrackingResponse> = self.fetch(&WorkerTrackingEndpoint::List).await?;
        Ok(map_list(Some(response)))
    }
}
