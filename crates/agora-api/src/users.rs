use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// Everyone who has registered, newest first.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.profiles.directory()?;
    Ok(Json(users))
}

/// A user's public page, addressed by nickname.
pub async fn user_page(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.profiles.user_page(&nickname)?;
    Ok(Json(page))
}
