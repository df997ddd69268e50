use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Comment, Project, Skill, User};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinRequest {
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub password: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub user_id: Uuid,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub nickname: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawRequest {
    pub password: String,
}

// -- Boards --

/// Body for creating or editing a board post.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardPayload {
    pub title: String,
    pub contents: String,
}

/// One board in a listing, joined in memory with its like and comment
/// aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub board_id: i64,
    pub nickname: String,
    pub title: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
    pub comments: u64,
    pub likes: u64,
    pub is_liked: bool,
    pub liked_by: Vec<String>,
}

/// A single board with its full comment list embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetail {
    pub board_id: i64,
    pub nickname: String,
    pub title: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub likes: u64,
    pub is_liked: bool,
    pub liked_by: Vec<String>,
}

/// One page of a (possibly filtered) board listing. `total_pages` counts
/// the whole filtered set, not just this page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPage {
    pub total_pages: u64,
    pub boards: Vec<BoardSummary>,
}

/// Result of a like toggle: the actor's membership after the flip and the
/// board's new like count (serialized as `likes`, the listing field name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    #[serde(rename = "likes")]
    pub count: u64,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentPayload {
    pub contents: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectPayload {
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub details: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillPayload {
    pub stack: String,
}

// -- Users --

/// A user's public page: profile plus portfolio records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub user: User,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
}

// -- Account deletion --

/// Per-step removal counts from a user purge. Steps run in declaration
/// order; the account itself is always the final step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPurgeReport {
    pub projects: u64,
    pub skills: u64,
    pub counters: u64,
    pub board_likes: u64,
    pub boards: u64,
    pub comments: u64,
    pub liked_elsewhere: u64,
    pub accounts: u64,
}
