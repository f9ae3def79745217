use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Incident, Tracking, User, TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn bearer() -> String {
    format!("Bearer {TOKEN}")
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, bearer())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap()
}

fn multipart_request(uri: &str, field: &str, image: &[u8]) -> Request<Body> {
    let boundary = "Boundary-TEST";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"a.jpg\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(http::header::AUTHORIZATION, bearer())
        .body(Body::from(body))
        .unwrap()
}

const SUBMIT: &str = r#"{"description":"Broken light","latitude":24.7,"longitude":46.6,"status":0,"typeId":12}"#;

// --- auth ---

#[tokio::test]
async fn login_returns_empty_200() {
    let resp = app()
        .oneshot(json_request("POST", "/login", r#"{"email":"a@b.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn login_without_email_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/login", r#"{}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn verify_otp_issues_token() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/verify-otp",
            r#"{"email":"a@b.com","otp":"1234"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["token"], TOKEN);
    assert_eq!(body["roles"], serde_json::json!([1]));
}

#[tokio::test]
async fn verify_otp_wrong_code_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/verify-otp",
            r#"{"email":"a@b.com","otp":"0000"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/incident").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- incidents ---

#[tokio::test]
async fn list_incidents_empty() {
    let resp = app().oneshot(get("/incident")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["incidents"], serde_json::json!([]));
}

#[tokio::test]
async fn submit_incident_malformed_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/incident", r#"{"description":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn change_status_unknown_incident_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/incident/change-status",
            r#"{"incidentId":"missing","status":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_unknown_incident_returns_404() {
    let resp = app()
        .oneshot(multipart_request("/incident/upload/missing", "image", &[0xFF, 0xD8]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incident_types_have_sub_types() {
    let resp = app().oneshot(get("/types")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let types: Vec<Value> = body_json(resp).await;
    assert_eq!(types.len(), 2);
    assert_eq!(types[0]["subTypes"].as_array().unwrap().len(), 2);
}

// --- tracking ---

#[tokio::test]
async fn add_tracking_converts_time_format() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/buses/track-bus",
            r#"{"TrackingLongitude":46.6,"TrackingLatitude":24.7,"TrackingTime":"2020-12-30 07:30:00","BusNumber":"B-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let tracking: Tracking = body_json(resp).await;
    assert_eq!(tracking.tracking_time, "2020-12-30T07:30:00.000Z");
    assert_eq!(tracking.bus_number, "B-1");
}

#[tokio::test]
async fn add_tracking_bad_time_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/buses/track-bus",
            r#"{"TrackingLongitude":46.6,"TrackingLatitude":24.7,"TrackingTime":"2020-12-30T07:30:00Z","BusNumber":"B-1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- full incident lifecycle ---

#[tokio::test]
async fn incident_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // verify registers the user
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/verify-otp",
            r#"{"email":"a@b.com","otp":"1234"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // submit
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/incident", SUBMIT))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let created: Incident = serde_json::from_value(body["incidents"][0].clone()).unwrap();
    assert_eq!(created.description, "Broken light");
    assert_eq!(created.status, 0);
    let id = created.id;

    // upload answers plain "OK"
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(&format!("/incident/upload/{id}"), "image", &[0xFF, 0xD8, 0xFF]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"OK");

    // upload without an image field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(&format!("/incident/upload/{id}"), "photo", &[1]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // change status
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/incident/change-status",
            &format!(r#"{{"incidentId":"{id}","status":2}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Incident = body_json(resp).await;
    assert_eq!(updated.status, 2);
    assert_eq!(updated.medias.len(), 1);
    assert_eq!(updated.medias[0].mime_type, "image/jpeg");

    // dashboard counts one completed incident
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/dashboard"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let dashboard: Value = body_json(resp).await;
    assert_eq!(
        dashboard["incidents"],
        serde_json::json!([{"status": 2, "_count": {"status": 1}}])
    );

    // users holds the verified email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/user"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@b.com");

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/incident"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["incidents"].as_array().unwrap().len(), 1);
}
