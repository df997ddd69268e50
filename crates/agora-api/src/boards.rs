use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;

use agora_core::feed::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
use agora_core::{BoardFilter, SortOrder};
use agora_types::api::BoardPayload;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub sort_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub option: String,
    pub keyword: String,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub sort_name: Option<String>,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

pub async fn list_boards(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let order = SortOrder::from_sort_name(query.sort_name.as_deref());

    // The listing fans out to the comment and like collections; run the
    // whole read off the async runtime.
    let feed = state.feed.clone();
    let page = tokio::task::spawn_blocking(move || {
        feed.list(
            &BoardFilter::All,
            order,
            query.page,
            query.per_page,
            &claims.nickname,
        )
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("listing task failed: {}", e))
    })??;

    Ok(Json(page))
}

pub async fn search_boards(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = BoardFilter::from_option(&query.option, &query.keyword)?;
    let order = SortOrder::from_sort_name(query.sort_name.as_deref());

    let feed = state.feed.clone();
    let page = tokio::task::spawn_blocking(move || {
        feed.list(&filter, order, query.page, query.per_page, &claims.nickname)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("search task failed: {}", e))
    })??;

    Ok(Json(page))
}

pub async fn get_board(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(board_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.feed.board(board_id, &claims.nickname)?;
    Ok(Json(detail))
}

pub async fn create_board(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BoardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.contents.trim().is_empty() {
        return Err(ApiError::BadRequest("title and contents are required".into()));
    }

    let board = state
        .boards
        .create(&claims.nickname, &req.title, &req.contents)?;

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn update_board(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(board_id): Path<i64>,
    Json(req): Json<BoardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.contents.trim().is_empty() {
        return Err(ApiError::BadRequest("title and contents are required".into()));
    }

    let board = state
        .boards
        .update(board_id, &claims.nickname, &req.title, &req.contents)?;

    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(board_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.cleanup.delete_board(board_id, &claims.nickname)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(board_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.boards.toggle_like(board_id, &claims.nickname)?;
    Ok(Json(outcome))
}
