use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::SecondsFormat;
use uuid::Uuid;

use quill_types::api::{ApiMessage, CreatePostRequest, Post, Session, UpdatePostRequest};
use quill_types::error::validate;

use crate::AppState;
use crate::error::ApiError;
use crate::mapping::{self, parse_timestamp, post_dto};

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.all_posts())
        .await
        .map_err(|e| anyhow::anyhow!("post list join error: {e}"))??;

    Ok(Json(rows.into_iter().map(post_dto).collect()))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_post(&post_id))
        .await
        .map_err(|e| anyhow::anyhow!("post lookup join error: {e}"))??
        .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(post_dto(row)))
}

/// The author is whoever holds the session; there is no separate author
/// field in the request.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    validate(&req).map_err(ApiError::Validation)?;

    let now = mapping::now();
    let post = Post {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        content: req.content,
        author_id: session.user_id,
        created_at: now,
        updated_at: now,
    };

    let db = state.clone();
    let row = post.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_post(
            &row.id,
            &row.title,
            &row.content,
            &row.author_id,
            &row.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    })
    .await
    .map_err(|e| anyhow::anyhow!("post insert join error: {e}"))??;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Editing is authenticated but not authorized: any logged-in user may
/// update any post. Absent fields keep their stored values; updatedAt
/// advances, createdAt does not.
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let db = state.clone();
    let id = post_id.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_post(&id))
        .await
        .map_err(|e| anyhow::anyhow!("post lookup join error: {e}"))??
        .ok_or(ApiError::NotFound("Post"))?;

    validate(&req).map_err(ApiError::Validation)?;

    let title = req.title.unwrap_or(existing.title);
    let content = req.content.unwrap_or(existing.content);
    let updated_at = mapping::now();

    let db = state.clone();
    let id = post_id.clone();
    let new_title = title.clone();
    let new_content = content.clone();
    tokio::task::spawn_blocking(move || {
        db.db.update_post(
            &id,
            &new_title,
            &new_content,
            &updated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    })
    .await
    .map_err(|e| anyhow::anyhow!("post update join error: {e}"))??;

    Ok(Json(Post {
        id: post_id,
        title,
        content,
        author_id: existing.author_id,
        created_at: parse_timestamp(&existing.created_at, "post"),
        updated_at,
    }))
}

/// Deleting a missing post is a 404, consistently: the store reports the
/// affected row count and the route trusts it.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_post(&post_id))
        .await
        .map_err(|e| anyhow::anyhow!("post delete join error: {e}"))??;

    if deleted == 0 {
        return Err(ApiError::NotFound("Post"));
    }

    Ok(Json(ApiMessage {
        message: "Post deleted".into(),
    }))
}
