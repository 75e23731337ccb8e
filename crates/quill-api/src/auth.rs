use axum::{Extension, Json, extract::State};
use chrono::SecondsFormat;
use rand::{Rng, distr::Alphanumeric};
use tracing::info;
use uuid::Uuid;

use quill_types::api::{ApiMessage, LoginRequest, Session};
use quill_types::error::validate;

use crate::AppState;
use crate::error::ApiError;
use crate::mapping;
use crate::password::verify_password;

const TOKEN_LENGTH: usize = 32;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    info!("Login attempt");
    validate(&req).map_err(ApiError::Validation)?;

    let db = state.clone();
    let username = req.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(|e| anyhow::anyhow!("user lookup join error: {e}"))??;

    // Unknown username and wrong password take the same path: the response
    // never reveals which one it was.
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password) => user,
        _ => {
            info!("Unable to locate user with provided credentials");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let session = issue_session(&state, &user.id).await?;
    info!("User {} logged in", user.username);
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiMessage>, ApiError> {
    info!("Logout attempt");

    let db = state.clone();
    let session_id = session.id.clone();
    tokio::task::spawn_blocking(move || db.db.delete_session(&session_id))
        .await
        .map_err(|e| anyhow::anyhow!("session delete join error: {e}"))??;

    info!("User {} logged out", session.user_id);
    Ok(Json(ApiMessage {
        message: "Logged out".into(),
    }))
}

/// Create and persist a fresh session for a user. Shared by login and
/// registration (registering logs the user in).
pub async fn issue_session(state: &AppState, user_id: &str) -> Result<Session, ApiError> {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        token: generate_token(TOKEN_LENGTH),
        created_at: mapping::now(),
    };

    let db = state.clone();
    let row = session.clone();
    tokio::task::spawn_blocking(move || {
        db.db.insert_session(
            &row.id,
            &row.user_id,
            &row.token,
            &row.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    })
    .await
    .map_err(|e| anyhow::anyhow!("session insert join error: {e}"))??;

    Ok(session)
}

fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
