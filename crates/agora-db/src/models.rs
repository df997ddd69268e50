use chrono::{DateTime, Utc};

/// Account record. `password` is the argon2 hash, never the plaintext.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
    pub name: String,
    pub password: String,
    pub description: String,
    pub profile_img: String,
    pub position: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BoardRow {
    pub board_id: i64,
    pub nickname: String,
    pub title: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub board_id: i64,
    pub comment_id: i64,
    pub nickname: String,
    pub contents: String,
    pub created_at: DateTime<Utc>,
}

/// Like record for one board. `members` is decoded from the stored JSON
/// array; a row that fails to decode is reported as an error, never as
/// an empty list.
#[derive(Debug, Clone)]
pub struct LikeRow {
    pub board_id: i64,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub user_id: String,
    pub project_id: i64,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct SkillRow {
    pub user_id: String,
    pub skill_id: i64,
    pub stack: String,
}
