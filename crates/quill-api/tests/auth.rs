mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register, test_server};
use quill_types::api::Session;

#[tokio::test]
async fn login_returns_a_session_for_valid_credentials() {
    let server = test_server();
    let registered = register(&server, "alice", "password123").await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    response.assert_status_ok();

    let session = response.json::<Session>();
    assert_eq!(session.user_id, registered.user_id);
    assert_eq!(session.token.len(), 32);
    assert!(session.token.chars().all(|c| c.is_ascii_alphanumeric()));
    // A login issues a new session, not the registration one.
    assert_ne!(session.token, registered.token);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let server = test_server();
    register(&server, "alice", "password123").await;

    let wrong_password = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "wrongpassword" }))
        .await;
    let unknown_user = server
        .post("/auth/login")
        .json(&json!({ "username": "nobody", "password": "password123" }))
        .await;

    wrong_password.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    unknown_user.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(wrong_password.text(), unknown_user.text());
    assert_eq!(
        wrong_password.json::<serde_json::Value>()["message"],
        "Invalid credentials"
    );
}

#[tokio::test]
async fn login_validates_the_request_body() {
    let server = test_server();

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "ab", "password": "short" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.json::<serde_json::Value>();
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn logout_invalidates_the_token_everywhere() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    // Token works before logout.
    server
        .get("/posts")
        .add_header("Authorization", session.token.as_str())
        .await
        .assert_status_ok();

    let response = server
        .post("/auth/logout")
        .add_header("Authorization", session.token.as_str())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["message"], "Logged out");

    // The same token now fails on every protected route.
    for path in ["/posts", "/posts/some-id"] {
        server
            .get(path)
            .add_header("Authorization", session.token.as_str())
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
    server
        .post("/auth/logout")
        .add_header("Authorization", session.token.as_str())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() {
    let server = test_server();

    let response = server.get("/posts").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "Unauthorized"
    );
}
