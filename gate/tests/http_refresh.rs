//! `HttpTokenRefresher` against a local HTTP stub, alone and wired into the gate.

#![cfg(not(target_arch = "wasm32"))]

mod common;

use common::*;
use session_gate::{
    DenialReason, GateConfig, GateError, HttpTokenRefresher, MemorySessionStore, SessionGate,
    SessionRecord, SessionStore, TokenRefresher,
};

fn refresher_for(server: &StubServer) -> HttpTokenRefresher {
    let config = GateConfig::builder().base_url(&server.base_url).build().unwrap();
    HttpTokenRefresher::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_refresh_posts_current_token() {
    let server = StubServer::start(200, r#"{"data":{"token":"fresh-token"},"message":"ok"}"#).await;
    let refresher = refresher_for(&server);

    let token = refresher.refresh("stale-token").await.unwrap();
    assert_eq!(token, "fresh-token");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/auth/refreshToken");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "refreshToken": "stale-token" }));
}

#[tokio::test]
async fn test_refresh_rejected_statuses() {
    for status in [401u16, 403, 500] {
        let server = StubServer::start(status, r#"{"message":"refresh token revoked"}"#).await;
        let refresher = refresher_for(&server);

        match refresher.refresh("stale-token").await {
            Err(GateError::RefreshRejected { status: got, message }) => {
                assert_eq!(got, status);
                assert!(message.contains("revoked"));
            },
            other => panic!("HTTP {} gave {:?}", status, other),
        }
        assert_eq!(server.requests().len(), 1);
    }
}

#[tokio::test]
async fn test_refresh_missing_token_in_body() {
    let server = StubServer::start(200, r#"{"data":{}}"#).await;
    let refresher = refresher_for(&server);

    let err = refresher.refresh("stale-token").await.unwrap_err();
    assert!(matches!(err, GateError::RefreshRejected { status: 0, .. }));
}

#[tokio::test]
async fn test_refresh_unreachable_backend() {
    let refresher = HttpTokenRefresher::builder()
        .refresh_url("http://127.0.0.1:1/auth/refreshToken")
        .build()
        .unwrap();

    let err = refresher.refresh("stale-token").await.unwrap_err();
    assert!(matches!(err, GateError::NetworkError(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_gate_over_http_replaces_token() {
    let fresh = valid_token("ADMIN");
    let server = StubServer::start(200, &format!(r#"{{"data":{{"token":"{}"}}}}"#, fresh)).await;

    let config = GateConfig::builder().base_url(&server.base_url).build().unwrap();
    let refresher = HttpTokenRefresher::from_config(&config).unwrap();
    let store = MemorySessionStore::with_record(&SessionRecord::new("a@x.com", expired_token()));
    let mut gate = SessionGate::new(config, store, refresher);

    let outcome = gate.evaluate_at(NOW_MILLIS).await;
    let session = outcome.session().expect("refresh over HTTP should succeed");
    assert!(session.is_privileged());

    assert_eq!(server.requests().len(), 1);
    assert_eq!(gate.store().get().unwrap(), Some(SessionRecord::new("a@x.com", fresh)));
}

#[tokio::test]
async fn test_gate_over_http_rejection_clears_store() {
    let server = StubServer::start(401, "").await;

    let config = GateConfig::builder().base_url(&server.base_url).build().unwrap();
    let refresher = HttpTokenRefresher::from_config(&config).unwrap();
    let store = MemorySessionStore::with_record(&SessionRecord::new("a@x.com", expired_token()));
    let mut gate = SessionGate::new(config, store, refresher);

    let outcome = gate.evaluate_at(NOW_MILLIS).await;
    assert_eq!(outcome.denial().unwrap().reason, DenialReason::SessionExpired);
    assert_eq!(server.requests().len(), 1);
    assert!(!gate.store().has_session().unwrap());
}
