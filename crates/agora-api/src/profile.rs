use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use agora_types::api::{ProjectPayload, SkillPayload};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Claims;

// -- Projects --

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = state.profiles.projects(claims.sub)?;
    Ok(Json(projects))
}

pub async fn add_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }

    let project = state.profiles.add_project(claims.sub, &req)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(project_id): Path<i64>,
    Json(req): Json<ProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }

    let project = state.profiles.update_project(claims.sub, project_id, &req)?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(project_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.profiles.delete_project(claims.sub, project_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Skills --

pub async fn list_skills(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let skills = state.profiles.skills(claims.sub)?;
    Ok(Json(skills))
}

pub async fn add_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SkillPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.stack.trim().is_empty() {
        return Err(ApiError::BadRequest("stack is required".into()));
    }

    let skill = state.profiles.add_skill(claims.sub, &req.stack)?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(skill_id): Path<i64>,
    Json(req): Json<SkillPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if req.stack.trim().is_empty() {
        return Err(ApiError::BadRequest("stack is required".into()));
    }

    let skill = state.profiles.update_skill(claims.sub, skill_id, &req.stack)?;
    Ok(Json(skill))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(skill_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.profiles.delete_skill(claims.sub, skill_id)?;
    Ok(StatusCode::NO_CONTENT)
}
