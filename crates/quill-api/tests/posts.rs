mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{register, test_server};
use quill_types::api::Post;

#[tokio::test]
async fn create_echoes_fields_and_stamps_the_author() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    let response = server
        .post("/posts")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "Hello", "content": "First post" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let post = response.json::<Post>();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.content, "First post");
    assert_eq!(post.author_id, session.user_id);
    assert_eq!(post.created_at, post.updated_at);
}

#[tokio::test]
async fn create_rejects_empty_fields_with_pathed_errors() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    let response = server
        .post("/posts")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "", "content": "" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.json::<serde_json::Value>();
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| e["path"] == json!(["title"])
        && e["message"] == "Title is required"));
    assert!(errors.iter().any(|e| e["path"] == json!(["content"])
        && e["message"] == "Content is required"));
}

#[tokio::test]
async fn get_returns_the_post_or_404() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    let created = server
        .post("/posts")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "Hello", "content": "body" }))
        .await
        .json::<Post>();

    let found = server
        .get(&format!("/posts/{}", created.id))
        .add_header("Authorization", session.token.as_str())
        .await;
    found.assert_status_ok();
    assert_eq!(found.json::<Post>().title, "Hello");

    let missing = server
        .get("/posts/missing")
        .add_header("Authorization", session.token.as_str())
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        missing.json::<serde_json::Value>()["message"],
        "Post not found"
    );
}

#[tokio::test]
async fn update_preserves_created_at_and_advances_updated_at() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    let created = server
        .post("/posts")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "Hello", "content": "body" }))
        .await
        .json::<Post>();

    // Make sure the clock moves past the stored microsecond precision.
    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = server
        .put(&format!("/posts/{}", created.id))
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "Hello again" }))
        .await;
    updated.assert_status_ok();

    let updated = updated.json::<Post>();
    assert_eq!(updated.title, "Hello again");
    // Partial update: content untouched.
    assert_eq!(updated.content, "body");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // Round-trip: GET returns exactly what PUT reported.
    let fetched = server
        .get(&format!("/posts/{}", created.id))
        .add_header("Authorization", session.token.as_str())
        .await
        .json::<Post>();
    assert_eq!(fetched.title, updated.title);
    assert_eq!(fetched.content, updated.content);
    assert_eq!(fetched.created_at, updated.created_at);
    assert_eq!(fetched.updated_at, updated.updated_at);
}

#[tokio::test]
async fn update_unknown_post_is_a_404() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    server
        .put("/posts/missing")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "whatever" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_user_may_edit_and_delete_any_post() {
    let server = test_server();
    let alice = register(&server, "alice", "password123").await;
    let bob = register(&server, "bob", "password123").await;

    let post = server
        .post("/posts")
        .add_header("Authorization", alice.token.as_str())
        .json(&json!({ "title": "Alice's", "content": "body" }))
        .await
        .json::<Post>();

    // Authenticated but not authorized: bob may edit alice's post.
    server
        .put(&format!("/posts/{}", post.id))
        .add_header("Authorization", bob.token.as_str())
        .json(&json!({ "title": "Bob was here" }))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/posts/{}", post.id))
        .add_header("Authorization", bob.token.as_str())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn delete_then_get_is_a_404() {
    let server = test_server();
    let session = register(&server, "alice", "password123").await;

    let post = server
        .post("/posts")
        .add_header("Authorization", session.token.as_str())
        .json(&json!({ "title": "Hello", "content": "body" }))
        .await
        .json::<Post>();

    let deleted = server
        .delete(&format!("/posts/{}", post.id))
        .add_header("Authorization", session.token.as_str())
        .await;
    deleted.assert_status_ok();
    assert_eq!(
        deleted.json::<serde_json::Value>()["message"],
        "Post deleted"
    );

    server
        .get(&format!("/posts/{}", post.id))
        .add_header("Authorization", session.token.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Deleting a missing post is consistently a 404.
    server
        .delete(&format!("/posts/{}", post.id))
        .add_header("Authorization", session.token.as_str())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_newest_first_across_authors() {
    let server = test_server();
    let alice = register(&server, "alice", "password123").await;
    let bob = register(&server, "bob", "password123").await;

    for (token, title) in [
        (&alice.token, "first"),
        (&bob.token, "second"),
        (&alice.token, "third"),
    ] {
        server
            .post("/posts")
            .add_header("Authorization", token.as_str())
            .json(&json!({ "title": title, "content": "body" }))
            .await
            .assert_status(StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let response = server
        .get("/posts")
        .add_header("Authorization", alice.token.as_str())
        .await;
    response.assert_status_ok();

    let titles: Vec<String> = response
        .json::<Vec<Post>>()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, ["third", "second", "first"]);
}
