//! The client over a second, blocking transport.
//!
//! # Design
//! `UreqTransport` runs each request on tokio's blocking pool with a ureq
//! agent that returns 4xx/5xx as data. Running the same calls as the reqwest
//! suite shows that request building and normalization do not depend on
//! which HTTP stack carries the bytes.

use std::net::SocketAddr;

use async_trait::async_trait;
use incident_core::{
    HttpMethod, HttpRequest, HttpResponse, IncidentStatus, IncidentTrackerClient, NetworkError,
    ServerConfig, SharedConfig, SubmitIncidentRequest, Transport,
};
use mock_server::{TOKEN, VALID_OTP};

struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

/// Executes `req` with ureq and returns the response as data.
fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    // ureq derives Content-Length from the body itself.
    let headers = req
        .headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"));

    let mut response = match req.method {
        HttpMethod::Get | HttpMethod::Delete => {
            let mut builder = match req.method {
                HttpMethod::Get => agent.get(&req.url),
                _ => agent.delete(&req.url),
            };
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()?
        }
        HttpMethod::Post | HttpMethod::Put => {
            let mut builder = match req.method {
                HttpMethod::Post => agent.post(&req.url),
                _ => agent.put(&req.url),
            };
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match &req.body {
                Some(body) => builder.send(body.as_slice())?,
                None => builder.send_empty()?,
            }
        }
    };

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response.body_mut().read_to_vec()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(NetworkError::transport)?
            .map_err(NetworkError::transport)
    }
}

async fn spawn_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

fn client(addr: SocketAddr) -> IncidentTrackerClient<UreqTransport> {
    let config = SharedConfig::new(ServerConfig::new(format!("http://{addr}")));
    IncidentTrackerClient::new(UreqTransport::new(), config)
}

#[tokio::test(flavor = "multi_thread")]
async fn login_submit_and_upload_over_ureq() {
    let addr = spawn_server().await;
    let client = client(addr);

    client.login("inspector@example.com").await.unwrap();
    let verification = client.verify_otp("inspector@example.com", VALID_OTP).await.unwrap();
    client.set_authorization_token(verification.token.as_deref());

    let created = client
        .submit_incident(SubmitIncidentRequest {
            description: "Graffiti".to_string(),
            latitude: 21.4858,
            longitude: 39.1925,
            status: IncidentStatus::Submitted.code(),
            type_id: 2,
            priority: None,
            issuer_id: None,
        })
        .await
        .unwrap()
        .unwrap();

    client.upload_incident_image(&created.id, vec![0xFF, 0xD8, 0xFF]).await.unwrap();

    let closed = client
        .change_incident_status(&created.id, IncidentStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(closed.status, Some(IncidentStatus::Rejected));
    assert_eq!(closed.media.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn status_codes_are_data_not_transport_errors() {
    let addr = spawn_server().await;
    let client = client(addr);

    let err = client.get_dashboard().await.unwrap_err();
    assert!(matches!(err, NetworkError::HttpError(401)), "got {err:?}");

    client.set_authorization_token(Some(TOKEN));
    let err = client
        .change_incident_status("missing", IncidentStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::HttpError(404)), "got {err:?}");
}
