use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public account profile. The password hash stays inside agora-db and is
/// never part of this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub description: String,
    pub profile_img: String,
    pub position: String,
    pub created_at: DateTime<Utc>,
}

/// A board post. `board_id` comes from the global board sequence; the
/// author is referenced by nickname (nicknames are unique and immutable).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub board_id: i64,
    pub nickname: String,
    pub title: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
}

/// A comment under a board. `comment_id` is allocated per board, so the
/// identity of a comment is the (board_id, comment_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub board_id: i64,
    pub comment_id: i64,
    pub nickname: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
}

/// A portfolio project entry. Start/end dates are caller-formatted display
/// strings, not parsed dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub user_id: Uuid,
    pub project_id: i64,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub details: String,
}

/// A single stack/skill entry on a user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub user_id: Uuid,
    pub skill_id: i64,
    pub stack: String,
}
