use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::ApiError;
use crate::mapping::session_dto;

/// Resolve the bearer token from the `Authorization` header to a session.
/// The token is sent verbatim (no `Bearer ` prefix). A missing header is
/// rejected before any store access; an unknown token after one lookup.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or(ApiError::Unauthorized)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_session_by_token(&token))
        .await
        .map_err(|e| anyhow::anyhow!("session lookup join error: {e}"))??
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(session_dto(row));
    Ok(next.run(req).await)
}
