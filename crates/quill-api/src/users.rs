use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use uuid::Uuid;

use quill_types::api::{RegisterRequest, Session, UpdateUserRequest, User};
use quill_types::error::validate;

use crate::AppState;
use crate::error::ApiError;
use crate::mapping::user_dto;
use crate::password::hash_password;

/// Registration doubles as a login: the response is a fresh session for the
/// new account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Session>, ApiError> {
    info!("Register attempt");
    validate(&req).map_err(ApiError::Validation)?;

    let user_id = Uuid::new_v4().to_string();
    let digest = hash_password(&req.password)?;

    // Uniqueness is enforced by the UNIQUE column, not a prior lookup, so
    // concurrent registrations of the same name cannot both succeed; the
    // loser's constraint failure maps to the taken-username error.
    let db = state.clone();
    let id = user_id.clone();
    let username = req.username.clone();
    let inserted = tokio::task::spawn_blocking(move || db.db.create_user(&id, &username, &digest))
        .await
        .map_err(|e| anyhow::anyhow!("user insert join error: {e}"))?;
    if let Err(e) = inserted {
        if quill_db::is_unique_violation(&e) {
            return Err(ApiError::UsernameTaken);
        }
        return Err(e.into());
    }

    let session = crate::auth::issue_session(&state, &user_id).await?;
    info!("User {} registered and logged in", req.username);
    Ok(Json(session))
}

/// Any valid session may read any user's record; only the digest stays
/// server-side.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_user(&user_id))
        .await
        .map_err(|e| anyhow::anyhow!("user lookup join error: {e}"))??
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user_dto(row)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let db = state.clone();
    let id = user_id.clone();
    let existing = tokio::task::spawn_blocking(move || db.db.get_user(&id))
        .await
        .map_err(|e| anyhow::anyhow!("user lookup join error: {e}"))??
        .ok_or(ApiError::NotFound("User"))?;

    validate(&req).map_err(ApiError::Validation)?;

    // Merge over the stored record: absent fields keep their values.
    let username = req.username.unwrap_or(existing.username);
    let favorite_book = match req.favorite_book {
        Some(book) => Some(
            serde_json::to_string(&book)
                .map_err(|e| anyhow::anyhow!("favoriteBook serialization failed: {e}"))?,
        ),
        None => existing.favorite_book,
    };

    let db = state.clone();
    let id = user_id.clone();
    let updated = tokio::task::spawn_blocking(move || {
        db.db.update_user(&id, &username, favorite_book.as_deref())?;
        db.db.get_user(&id)
    })
    .await
    .map_err(|e| anyhow::anyhow!("user update join error: {e}"))??
    .ok_or(ApiError::NotFound("User"))?;

    info!("User {} updated", updated.username);
    Ok(Json(user_dto(updated)))
}
