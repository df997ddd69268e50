use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use agora_types::api::CommentPayload;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Claims;

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(board_id): Path<i64>,
    Json(req): Json<CommentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.contents.trim().is_empty() {
        return Err(ApiError::BadRequest("contents are required".into()));
    }

    let comment = state
        .boards
        .add_comment(board_id, &claims.nickname, &req.contents)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((board_id, comment_id)): Path<(i64, i64)>,
    Json(req): Json<CommentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.contents.trim().is_empty() {
        return Err(ApiError::BadRequest("contents are required".into()));
    }

    let comment =
        state
            .boards
            .update_comment(board_id, comment_id, &claims.nickname, &req.contents)?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((board_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .boards
        .delete_comment(board_id, comment_id, &claims.nickname)?;

    Ok(StatusCode::NO_CONTENT)
}
