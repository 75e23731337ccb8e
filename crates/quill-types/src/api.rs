use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9_]+$").expect("username pattern"));

// -- Wire models --

/// Server-side session binding a bearer token to a user. The token is sent
/// back verbatim in the `Authorization` header on protected routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// User profile as returned on the wire. The password digest never leaves
/// the server; `favoriteBook` is surfaced as a structured object even though
/// it is persisted as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_book: Option<FavoriteBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// A book picked from the external book-search API. Field names mirror that
/// API's response documents, so this doubles as the search result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FavoriteBook {
    #[validate(length(min = 1, message = "Book key is required"))]
    pub key: String,
    #[validate(length(min = 1, message = "Book title is required"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i64>,
}

// -- Request schemas --

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 255, message = "Username must be between 3 and 255 characters"),
        regex(
            path = *USERNAME_RE,
            message = "Username can only contain letters, numbers, and underscores"
        )
    )]
    pub username: String,
    #[validate(length(min = 8, max = 255, message = "Password must be between 8 and 255 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Partial counterpart of [`CreatePostRequest`]; absent fields keep their
/// stored values.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 255, message = "Username must be between 3 and 255 characters"))]
    pub username: Option<String>,
    #[validate(nested)]
    pub favorite_book: Option<FavoriteBook>,
}
