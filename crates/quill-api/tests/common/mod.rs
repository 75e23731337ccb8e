use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use quill_api::{AppState, AppStateInner, router};
use quill_types::api::Session;

pub fn test_server() -> TestServer {
    let db = quill_db::Database::open_in_memory().expect("in-memory database");
    let state: AppState = Arc::new(AppStateInner { db });
    TestServer::new(router(state)).expect("test server")
}

/// Register a fresh account and hand back its session (registration logs
/// the user in).
pub async fn register(server: &TestServer, username: &str, password: &str) -> Session {
    let response = server
        .post("/users")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    response.json::<Session>()
}
