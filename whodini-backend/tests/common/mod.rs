//! Common test utilities for backend integration tests

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use whodini_backend::{routes, AppState, InMemoryBlobStore, InMemoryCredentialStore};

/// Create a test server over in-memory stores
pub fn create_test_server() -> TestServer {
    let state = Arc::new(AppState::new(
        InMemoryBlobStore::new(),
        InMemoryCredentialStore::new(),
    ));
    let app = routes::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Sign in as `email` and return the session user id
#[allow(dead_code)]
pub async fn sign_in(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/session/sign_in")
        .json(&json!({ "email": email }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    body["session"]["userId"].as_str().unwrap().to_string()
}

/// Remove the current session
#[allow(dead_code)]
pub async fn sign_out(server: &TestServer) {
    let response = server.post("/api/session/sign_out").await;
    assert_eq!(response.status_code(), 200);
}

/// Id of the first entity in a seeded catalog list (`brands`, `events`, ...)
#[allow(dead_code)]
pub async fn first_catalog_id(server: &TestServer, path: &str, list: &str) -> String {
    let body: Value = server.get(path).await.json();
    body[list][0]["id"].as_str().unwrap().to_string()
}

/// Ids of the seeded communities, split (open, approval-gated)
#[allow(dead_code)]
pub async fn community_ids(server: &TestServer) -> (String, String) {
    let body: Value = server.get("/api/communities").await.json();
    let communities = body["communities"].as_array().unwrap();
    let open = communities
        .iter()
        .find(|c| c["approvalRequired"] == false)
        .unwrap();
    let gated = communities
        .iter()
        .find(|c| c["approvalRequired"] == true)
        .unwrap();
    (
        open["id"].as_str().unwrap().to_string(),
        gated["id"].as_str().unwrap().to_string(),
    )
}
