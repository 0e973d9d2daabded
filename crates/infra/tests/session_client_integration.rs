//! Integration tests for the session client against a mock backend
//!
//! **Coverage:**
//! - Response normalization: JSON, text, empty and 204 bodies
//! - Refresh-and-replay on 401, including rotated refresh tokens
//! - Forced logout on 403, credential errors, double 401 and refresh failure
//! - Bootstrap endpoints: 401 surfaced directly, no refresh, no logout
//! - Header merging, multipart uploads and cancellation
//! - Login and user-initiated logout
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for the backend
//! - In-memory credential store and recording navigator

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use sitedesk_common::testing::sample_profile;
use sitedesk_common::SessionStore;
use sitedesk_domain::{CredentialPair, SessionEvent, SessionPhase};
use sitedesk_infra::api::RefreshError;
use sitedesk_infra::{ApiError, ApiErrorCategory, ApiResponse, MultipartForm, RequestOptions};
use support::Harness;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn json_response(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

async fn mount_refresh(harness: &Harness, new_token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "refresh-token-1" })))
        .respond_with(json_response(200, json!({ "access_token": new_token })))
        .expect(1)
        .mount(&harness.server)
        .await;
}

// ============================================================================
// Response normalization
// ============================================================================

#[tokio::test]
async fn scenario_a_valid_token_returns_parsed_json() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(json_response(200, json!({ "items": [] })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let response = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap();

    assert_eq!(response, ApiResponse::Json(json!({ "items": [] })));
    assert_eq!(harness.hits("/auth/refresh").await, 0);
}

#[tokio::test]
async fn empty_and_no_content_responses_are_empty() {
    let harness = Harness::logged_in().await;
    Mock::given(method("DELETE"))
        .and(path("/sites/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/approvals/pending"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/json"))
        .mount(&harness.server)
        .await;

    let deleted = harness.client.api_call("/sites/7", RequestOptions::delete()).await.unwrap();
    let pending =
        harness.client.api_call("/approvals/pending", RequestOptions::get()).await.unwrap();

    assert!(deleted.is_empty());
    assert!(pending.is_empty());
}

#[tokio::test]
async fn non_json_bodies_are_returned_as_text() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/boq/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("item,qty\nantenna,4\n"),
        )
        .mount(&harness.server)
        .await;

    let response = harness.client.api_call("/boq/export", RequestOptions::get()).await.unwrap();

    assert_eq!(response.as_text(), Some("item,qty\nantenna,4\n"));
}

#[tokio::test]
async fn typed_helpers_deserialize() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Site {
        code: String,
    }

    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(json_response(200, json!([{ "code": "RAN-001" }, { "code": "RAN-002" }])))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sites"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "code": "RAN-003" })))
        .respond_with(json_response(201, json!({ "code": "RAN-003" })))
        .mount(&harness.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/sites/RAN-001"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;

    let sites: Vec<Site> = harness.client.get("/sites").await.unwrap();
    let created: Site = harness.client.post("/sites", &json!({ "code": "RAN-003" })).await.unwrap();
    harness.client.delete::<()>("/sites/RAN-001").await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(created, Site { code: "RAN-003".into() });
}

// ============================================================================
// Headers and bodies
// ============================================================================

#[tokio::test]
async fn content_type_follows_method_and_caller_wins() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;

    harness.client.api_call("/inventory", RequestOptions::get()).await.unwrap();
    harness
        .client
        .api_call(
            "/inventory/import",
            RequestOptions::put()
                .text("a,b")
                .try_header("content-type", "text/csv")
                .unwrap()
                .try_header("authorization", "Bearer override")
                .unwrap(),
        )
        .await
        .unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    let get = &requests[0];
    assert!(get.headers.get("content-type").is_none());
    assert_eq!(get.headers.get("authorization").unwrap(), "Bearer access-token-1");

    let put = &requests[1];
    assert_eq!(put.headers.get("content-type").unwrap(), "text/csv");
    assert_eq!(put.headers.get("authorization").unwrap(), "Bearer override");
    assert_eq!(put.body, b"a,b");
}

#[tokio::test]
async fn anonymous_requests_carry_no_bearer() {
    let harness = Harness::anonymous().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(json_response(200, json!({ "status": "ok" })))
        .mount(&harness.server)
        .await;

    harness.client.api_call("/health", RequestOptions::get()).await.unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn multipart_upload_lets_transport_set_boundary() {
    let harness = Harness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/inventory/upload"))
        .respond_with(json_response(200, json!({ "imported": 2 })))
        .mount(&harness.server)
        .await;

    let form = MultipartForm::new().text("project", "north-ran-rollout").file(
        "file",
        "inventory.csv",
        b"serial,site\nA1,RAN-001\nA2,RAN-002\n".to_vec(),
        Some("text/csv"),
    );
    let result: serde_json::Value =
        harness.client.upload("/inventory/upload", form).await.unwrap();

    assert_eq!(result["imported"], 2);
    let requests = harness.server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

// ============================================================================
// Refresh and replay
// ============================================================================

#[tokio::test]
async fn scenario_b_expired_token_is_refreshed_and_replayed() {
    let harness = Harness::logged_in().await;
    let mut events = harness.client.subscribe();
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(json_response(401, json!({ "detail": "Unauthorized" })))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-2"))
        .respond_with(json_response(200, json!({ "items": [{ "id": 1 }] })))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_refresh(&harness, "access-token-2").await;

    let response = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap();

    assert_eq!(response.as_json().unwrap()["items"][0]["id"], 1);
    assert_eq!(harness.access_token().await.as_deref(), Some("access-token-2"));
    assert_eq!(harness.refresh_token().await.as_deref(), Some("refresh-token-1"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
    assert_eq!(harness.client.phase(), SessionPhase::Normal);
}

#[tokio::test]
async fn replayed_request_keeps_its_body() {
    let harness = Harness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/approvals"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/approvals"))
        .and(header("authorization", "Bearer access-token-2"))
        .and(body_json(json!({ "boq_id": 12, "decision": "approve" })))
        .respond_with(json_response(200, json!({ "status": "approved" })))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_refresh(&harness, "access-token-2").await;

    let options = RequestOptions::post().json_value(json!({ "boq_id": 12, "decision": "approve" }));
    let response = harness.client.api_call("/approvals", options).await.unwrap();

    assert_eq!(response.as_json().unwrap()["status"], "approved");
}

#[tokio::test]
async fn rotated_refresh_token_is_stored() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(json_response(
            200,
            json!({ "access_token": "access-token-2", "refresh_token": "refresh-token-2" }),
        ))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness.client.api_call("/projects", RequestOptions::get()).await.unwrap();

    assert_eq!(harness.refresh_token().await.as_deref(), Some("refresh-token-2"));
}

// ============================================================================
// Forced logout
// ============================================================================

#[tokio::test]
async fn scenario_d_forbidden_forces_logout() {
    let harness = Harness::logged_in().await;
    harness.store.set_user_profile(&sample_profile()).await.unwrap();
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = notifications.clone();
    harness.client.on_session_expired(move |message| sink.lock().push(message.to_string()));
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(json_response(403, json!({ "detail": "forbidden" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert_eq!(err.message(), "forbidden");
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.category(), ApiErrorCategory::Authentication);
    assert!(!harness.store.has_credentials().await);
    assert!(harness.store.user_profile().await.unwrap().is_none());
    assert_eq!(notifications.lock().len(), 1);
    assert_eq!(harness.hits("/auth/refresh").await, 0);
    assert_eq!(harness.client.phase(), SessionPhase::Terminated);

    // The redirect waits for the notification to be read.
    assert!(harness.navigator.routes().is_empty());
    harness.settle_redirect().await;
    assert_eq!(harness.navigator.routes(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn terminated_session_fails_fast_until_login() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(json_response(403, json!({ "detail": "forbidden" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();
    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert_eq!(err.status(), None);
    assert_eq!(harness.hits("/projects").await, 1);
}

#[tokio::test]
async fn concurrent_terminal_failures_log_out_once() {
    let harness = Harness::logged_in().await;
    let notifications = Arc::new(Mutex::new(0usize));
    let counter = notifications.clone();
    harness.client.on_session_expired(move |_| *counter.lock() += 1);
    Mock::given(method("GET"))
        .respond_with(
            json_response(403, json!({ "detail": "forbidden" }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&harness.server)
        .await;

    let (a, b, c) = tokio::join!(
        harness.client.api_call("/projects", RequestOptions::get()),
        harness.client.api_call("/sites", RequestOptions::get()),
        harness.client.api_call("/inventory", RequestOptions::get()),
    );
    harness.settle_redirect().await;

    assert!(a.unwrap_err().is_session_terminated());
    assert!(b.unwrap_err().is_session_terminated());
    assert!(c.unwrap_err().is_session_terminated());
    assert_eq!(*notifications.lock(), 1);
    assert_eq!(harness.navigator.routes().len(), 1);
}

#[tokio::test]
async fn credential_error_message_forces_logout() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/ran/plans"))
        .respond_with(json_response(400, json!({ "detail": "Token has expired" })))
        .mount(&harness.server)
        .await;

    let err = harness.client.api_call("/ran/plans", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert!(!harness.store.has_credentials().await);
    assert_eq!(harness.hits("/auth/refresh").await, 0);
}

#[tokio::test]
async fn credential_error_code_forces_logout_even_without_message_matching() {
    let harness = Harness::build(Some(support_credentials()), |config| {
        config.session.match_error_messages = false;
    })
    .await;
    Mock::given(method("GET"))
        .and(path("/dus"))
        .respond_with(json_response(400, json!({ "code": "token_invalid", "detail": "nope" })))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rops"))
        .respond_with(json_response(400, json!({ "detail": "Invalid token" })))
        .mount(&harness.server)
        .await;

    let prose = harness.client.api_call("/rops", RequestOptions::get()).await.unwrap_err();
    assert!(matches!(prose, ApiError::Status { status: 400, .. }));
    assert!(harness.store.has_credentials().await);

    let coded = harness.client.api_call("/dus", RequestOptions::get()).await.unwrap_err();
    assert!(coded.is_session_terminated());
    assert!(!harness.store.has_credentials().await);
}

#[tokio::test]
async fn second_401_after_refresh_does_not_loop() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&harness.server)
        .await;
    mount_refresh(&harness, "access-token-2").await;

    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert_eq!(err.status(), Some(401));
    assert!(!harness.store.has_credentials().await);
}

#[tokio::test]
async fn failed_refresh_forces_logout() {
    let harness = Harness::logged_in().await;
    let mut events = harness.client.subscribe();
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(json_response(401, json!({ "detail": "Refresh token expired" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert_eq!(err.status(), Some(401));
    let expected = RefreshError::Rejected { status: 401, message: "Refresh token expired".into() };
    assert_eq!(err.message(), expected.to_string());
    assert!(matches!(events.try_recv().unwrap(), SessionEvent::Expired { .. }));
    assert!(!harness.store.has_credentials().await);
}

#[tokio::test]
async fn missing_refresh_token_forces_logout_without_refresh_call() {
    let harness = Harness::anonymous().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;

    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_terminated());
    assert_eq!(harness.hits("/auth/refresh").await, 0);
    harness.settle_redirect().await;
    assert!(harness.navigator.was_redirected_to("/login"));
}

// ============================================================================
// Ordinary errors
// ============================================================================

#[tokio::test]
async fn scenario_e_login_rejection_is_surfaced_directly() {
    let harness = Harness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(json_response(401, json!({ "detail": "invalid credentials" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let options = RequestOptions::post().json_value(json!({ "username": "u", "password": "p" }));
    let err = harness.client.api_call("/auth/login", options).await.unwrap_err();

    assert!(matches!(
        &err,
        ApiError::Unauthorized { message, .. } if message == "invalid credentials"
    ));
    assert_eq!(harness.hits("/auth/refresh").await, 0);
    assert!(harness.store.has_credentials().await);
    assert_eq!(harness.client.phase(), SessionPhase::Normal);
    harness.settle_redirect().await;
    assert!(harness.navigator.routes().is_empty());
}

#[tokio::test]
async fn structured_detail_is_a_validation_error() {
    let harness = Harness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/sites"))
        .respond_with(json_response(
            422,
            json!({
                "detail": [{ "loc": ["body", "latitude"], "msg": "value is not a valid float" }]
            }),
        ))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .api_call("/sites", RequestOptions::post().json_value(json!({ "latitude": "north" })))
        .await
        .unwrap_err();

    match &err {
        ApiError::Validation { status, message, payload } => {
            assert_eq!(*status, 422);
            assert_eq!(message, "latitude: value is not a valid float");
            assert_eq!(payload[0]["loc"][1], "latitude");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(err.category(), ApiErrorCategory::Validation);
    assert!(harness.store.has_credentials().await);
}

#[tokio::test]
async fn server_errors_are_not_retried_or_terminal() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(json_response(500, json!({ "message": "database unavailable" })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let err = harness.client.api_call("/reports", RequestOptions::get()).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.message(), "database unavailable");
    assert!(err.should_retry());
    assert_eq!(harness.client.phase(), SessionPhase::Normal);
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let harness = Harness::build(Some(support_credentials()), |config| {
        config.api.base_url = format!("http://{addr}");
    })
    .await;

    let err = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.payload().is_none());
    assert!(harness.store.has_credentials().await);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn cancelled_request_resolves_to_cancelled() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/ai/chat"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&harness.server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = harness
        .client
        .api_call("/ai/chat", RequestOptions::get().cancel_on(token))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(harness.client.phase(), SessionPhase::Normal);
}

#[tokio::test]
async fn already_cancelled_request_never_hits_the_network() {
    let harness = Harness::logged_in().await;
    let token = CancellationToken::new();
    token.cancel();

    let err = harness
        .client
        .api_call("/projects", RequestOptions::get().cancel_on(token))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Cancelled);
    assert_eq!(harness.hits("/projects").await, 0);
}

// ============================================================================
// Login and logout
// ============================================================================

#[tokio::test]
async fn login_stores_credentials_and_profile() {
    let harness = Harness::anonymous().await;
    let mut events = harness.client.subscribe();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "site.manager", "password": "hunter2" })))
        .respond_with(json_response(
            200,
            json!({
                "access_token": "access-token-9",
                "refresh_token": "refresh-token-9",
                "user": { "id": 17, "username": "site.manager", "role": "manager" }
            }),
        ))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = harness.client.login("site.manager", "hunter2").await.unwrap().unwrap();

    assert_eq!(user.username.as_deref(), Some("site.manager"));
    assert_eq!(harness.access_token().await.as_deref(), Some("access-token-9"));
    assert_eq!(harness.refresh_token().await.as_deref(), Some("refresh-token-9"));
    assert_eq!(harness.client.current_user().await.unwrap(), Some(user));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);
}

#[tokio::test]
async fn login_after_forced_logout_restores_normal_phase() {
    let harness = Harness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer access-token-5"))
        .respond_with(json_response(200, json!({ "items": [] })))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(json_response(
            200,
            json!({ "access_token": "access-token-5", "refresh_token": "refresh-token-5" }),
        ))
        .mount(&harness.server)
        .await;

    harness.client.api_call("/projects", RequestOptions::get()).await.unwrap_err();
    assert_eq!(harness.client.phase(), SessionPhase::Terminated);

    let user = harness.client.login("site.manager", "hunter2").await.unwrap();
    let response = harness.client.api_call("/projects", RequestOptions::get()).await.unwrap();

    assert!(user.is_none());
    assert_eq!(harness.client.phase(), SessionPhase::Normal);
    assert!(response.as_json().is_some());
    // The pending redirect from the forced logout was cancelled by the login.
    harness.settle_redirect().await;
    assert!(harness.navigator.routes().is_empty());
}

#[tokio::test]
async fn logout_clears_store_and_redirects_immediately() {
    let harness = Harness::logged_in().await;
    harness.client.set_last_section("inventory").await.unwrap();
    let mut events = harness.client.subscribe();
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness.client.logout().await.unwrap();

    assert!(!harness.store.has_credentials().await);
    assert!(harness.client.last_section().await.unwrap().is_none());
    assert_eq!(harness.navigator.routes(), vec!["/login".to_string()]);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
    assert_eq!(harness.client.phase(), SessionPhase::Terminated);
}

fn support_credentials() -> CredentialPair {
    sitedesk_common::testing::sample_credentials()
}
