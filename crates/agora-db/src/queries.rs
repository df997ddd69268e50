use crate::Database;
use crate::models::{BoardRow, CommentRow, LikeRow, ProjectRow, SkillRow, UserRow};
use anyhow::{Result, anyhow};
use rusqlite::{OptionalExtension, params};

/// Board column a keyword search runs against. The variant picks the
/// WHERE clause; the keyword itself is always a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Author,
    Title,
    Contents,
    TitleOrContents,
}

/// Substring pattern for LIKE, with wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        email: row.get(1)?,
        nickname: row.get(2)?,
        name: row.get(3)?,
        password: row.get(4)?,
        description: row.get(5)?,
        profile_img: row.get(6)?,
        position: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn board_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardRow> {
    Ok(BoardRow {
        board_id: row.get(0)?,
        nickname: row.get(1)?,
        title: row.get(2)?,
        contents: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn comment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        board_id: row.get(0)?,
        comment_id: row.get(1)?,
        nickname: row.get(2)?,
        contents: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        user_id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        details: row.get(5)?,
    })
}

fn skill_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SkillRow> {
    Ok(SkillRow {
        user_id: row.get(0)?,
        skill_id: row.get(1)?,
        stack: row.get(2)?,
    })
}

/// The membership list is stored as a JSON array. A record that no
/// longer decodes is corrupt; surface the error instead of reading it
/// as an empty list.
fn decode_members(board_id: i64, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| anyhow!("corrupt like record for board {}: {}", board_id, e))
}

impl Database {
    // -- Counters --

    /// Atomically bumps the sequence for (collection, scope_key) and
    /// returns the new value, starting at 1 for a never-seen pair. The
    /// single upsert statement is the only increment primitive used, so
    /// concurrent callers can never be handed the same value.
    pub fn bump_sequence(&self, collection: &str, scope_key: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let value = conn.query_row(
                "INSERT INTO counters (collection, scope_key, value) VALUES (?1, ?2, 1)
                 ON CONFLICT(collection, scope_key) DO UPDATE SET value = value + 1
                 RETURNING value",
                params![collection, scope_key],
                |row| row.get(0),
            )?;
            Ok(value)
        })
    }

    pub fn current_sequence(&self, collection: &str, scope_key: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM counters WHERE collection = ?1 AND scope_key = ?2",
                    params![collection, scope_key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    pub fn delete_counters_for_scope(&self, scope_key: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM counters WHERE scope_key = ?1",
                params![scope_key],
            )?;
            Ok(n as u64)
        })
    }

    // -- Users --

    pub fn insert_user(&self, user: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (user_id, email, nickname, name, password, description, profile_img, position, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    user.user_id,
                    user.email,
                    user.nickname,
                    user.name,
                    user.password,
                    user.description,
                    user.profile_img,
                    user.position,
                    user.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT user_id, email, nickname, name, password, description, profile_img, position, created_at
                     FROM users WHERE user_id = ?1",
                    params![user_id],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT user_id, email, nickname, name, password, description, profile_img, position, created_at
                     FROM users WHERE email = ?1",
                    params![email],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    pub fn get_user_by_nickname(&self, nickname: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT user_id, email, nickname, name, password, description, profile_img, position, created_at
                     FROM users WHERE nickname = ?1",
                    params![nickname],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, email, nickname, name, password, description, profile_img, position, created_at
                 FROM users ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map([], user_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET password = ?2 WHERE user_id = ?1",
                params![user_id, password_hash],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_user(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE user_id = ?1", params![user_id])?;
            Ok(n as u64)
        })
    }

    // -- Boards --

    pub fn insert_board(&self, board: &BoardRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO boards (board_id, nickname, title, contents, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    board.board_id,
                    board.nickname,
                    board.title,
                    board.contents,
                    board.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_board(&self, board_id: i64) -> Result<Option<BoardRow>> {
        self.with_conn(|conn| {
            let board = conn
                .query_row(
                    "SELECT board_id, nickname, title, contents, created_at
                     FROM boards WHERE board_id = ?1",
                    params![board_id],
                    board_from_row,
                )
                .optional()?;
            Ok(board)
        })
    }

    /// Every board, in store order. Callers sort; nothing here promises
    /// an ordering.
    pub fn list_boards(&self) -> Result<Vec<BoardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT board_id, nickname, title, contents, created_at FROM boards",
            )?;
            let rows = stmt.query_map([], board_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Boards whose `field` contains the keyword, case-insensitively.
    pub fn search_boards(&self, field: TextField, keyword: &str) -> Result<Vec<BoardRow>> {
        let clause = match field {
            TextField::Author => "nickname LIKE ?1 ESCAPE '\\'",
            TextField::Title => "title LIKE ?1 ESCAPE '\\'",
            TextField::Contents => "contents LIKE ?1 ESCAPE '\\'",
            TextField::TitleOrContents => {
                "(title LIKE ?1 ESCAPE '\\' OR contents LIKE ?1 ESCAPE '\\')"
            }
        };
        let sql = format!(
            "SELECT board_id, nickname, title, contents, created_at FROM boards WHERE {}",
            clause
        );
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![like_pattern(keyword)], board_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Fetches the boards whose IDs are in `board_ids`, in one query.
    pub fn get_boards_by_ids(&self, board_ids: &[i64]) -> Result<Vec<BoardRow>> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let placeholders = board_ids
                .iter()
                .enumerate()
                .map(|(i, _)| format!("?{}", i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT board_id, nickname, title, contents, created_at
                 FROM boards WHERE board_id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let bound: Vec<&dyn rusqlite::types::ToSql> = board_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();
            let rows = stmt.query_map(bound.as_slice(), board_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn board_ids_by_author(&self, nickname: &str) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT board_id FROM boards WHERE nickname = ?1")?;
            let rows = stmt.query_map(params![nickname], |row| row.get(0))?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_board(&self, board_id: i64, title: &str, contents: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE boards SET title = ?2, contents = ?3 WHERE board_id = ?1",
                params![board_id, title, contents],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_board(&self, board_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM boards WHERE board_id = ?1", params![board_id])?;
            Ok(n as u64)
        })
    }

    pub fn delete_boards_by_author(&self, nickname: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM boards WHERE nickname = ?1",
                params![nickname],
            )?;
            Ok(n as u64)
        })
    }

    // -- Comments --

    pub fn insert_comment(&self, comment: &CommentRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (board_id, comment_id, nickname, contents, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    comment.board_id,
                    comment.comment_id,
                    comment.nickname,
                    comment.contents,
                    comment.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, board_id: i64, comment_id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let comment = conn
                .query_row(
                    "SELECT board_id, comment_id, nickname, contents, created_at
                     FROM comments WHERE board_id = ?1 AND comment_id = ?2",
                    params![board_id, comment_id],
                    comment_from_row,
                )
                .optional()?;
            Ok(comment)
        })
    }

    pub fn comments_for_board(&self, board_id: i64) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT board_id, comment_id, nickname, contents, created_at
                 FROM comments WHERE board_id = ?1 ORDER BY comment_id",
            )?;
            let rows = stmt.query_map(params![board_id], comment_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Board IDs of comments whose contents contain the keyword,
    /// case-insensitively. May contain duplicates; callers deduplicate.
    pub fn comment_board_ids_matching(&self, keyword: &str) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT board_id FROM comments WHERE contents LIKE ?1 ESCAPE '\\'")?;
            let rows = stmt.query_map(params![like_pattern(keyword)], |row| row.get(0))?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// One element per comment on any of the given boards: its board_id.
    /// The per-board comment tally is folded from this projection.
    pub fn comment_board_ids_for(&self, board_ids: &[i64]) -> Result<Vec<i64>> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let placeholders = board_ids
                .iter()
                .enumerate()
                .map(|(i, _)| format!("?{}", i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT board_id FROM comments WHERE board_id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let bound: Vec<&dyn rusqlite::types::ToSql> = board_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();
            let rows = stmt.query_map(bound.as_slice(), |row| row.get(0))?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_comment(&self, board_id: i64, comment_id: i64, contents: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE comments SET contents = ?3 WHERE board_id = ?1 AND comment_id = ?2",
                params![board_id, comment_id, contents],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_comment(&self, board_id: i64, comment_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM comments WHERE board_id = ?1 AND comment_id = ?2",
                params![board_id, comment_id],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_comments_for_board(&self, board_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM comments WHERE board_id = ?1",
                params![board_id],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_comments_by_author(&self, nickname: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM comments WHERE nickname = ?1",
                params![nickname],
            )?;
            Ok(n as u64)
        })
    }

    // -- Likes --

    pub fn get_like(&self, board_id: i64) -> Result<Option<LikeRow>> {
        self.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT from_user FROM likes WHERE board_id = ?1",
                    params![board_id],
                    |row| row.get(0),
                )
                .optional()?;
            match raw {
                Some(raw) => Ok(Some(LikeRow {
                    board_id,
                    members: decode_members(board_id, &raw)?,
                })),
                None => Ok(None),
            }
        })
    }

    /// Like records for the given boards, in one query.
    pub fn likes_for_boards(&self, board_ids: &[i64]) -> Result<Vec<LikeRow>> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let placeholders = board_ids
                .iter()
                .enumerate()
                .map(|(i, _)| format!("?{}", i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT board_id, from_user FROM likes WHERE board_id IN ({})",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let bound: Vec<&dyn rusqlite::types::ToSql> = board_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();
            let rows = stmt.query_map(bound.as_slice(), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut likes = Vec::new();
            for row in rows {
                let (board_id, raw) = row?;
                likes.push(LikeRow {
                    board_id,
                    members: decode_members(board_id, &raw)?,
                });
            }
            Ok(likes)
        })
    }

    /// Every like record in the store. Used by the cleanup sweep that
    /// strips a departing user from membership lists they appear in.
    pub fn all_likes(&self) -> Result<Vec<LikeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT board_id, from_user FROM likes")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut likes = Vec::new();
            for row in rows {
                let (board_id, raw) = row?;
                likes.push(LikeRow {
                    board_id,
                    members: decode_members(board_id, &raw)?,
                });
            }
            Ok(likes)
        })
    }

    /// Writes the full membership list for a board, creating the record
    /// on first like.
    pub fn put_like(&self, board_id: i64, members: &[String]) -> Result<()> {
        let raw = serde_json::to_string(members)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO likes (board_id, from_user) VALUES (?1, ?2)
                 ON CONFLICT(board_id) DO UPDATE SET from_user = excluded.from_user",
                params![board_id, raw],
            )?;
            Ok(())
        })
    }

    pub fn delete_like(&self, board_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM likes WHERE board_id = ?1", params![board_id])?;
            Ok(n as u64)
        })
    }

    // -- Projects --

    pub fn insert_project(&self, project: &ProjectRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO projects (user_id, project_id, title, start_date, end_date, details)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    project.user_id,
                    project.project_id,
                    project.title,
                    project.start_date,
                    project.end_date,
                    project.details,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_project(&self, user_id: &str, project_id: i64) -> Result<Option<ProjectRow>> {
        self.with_conn(|conn| {
            let project = conn
                .query_row(
                    "SELECT user_id, project_id, title, start_date, end_date, details
                     FROM projects WHERE user_id = ?1 AND project_id = ?2",
                    params![user_id, project_id],
                    project_from_row,
                )
                .optional()?;
            Ok(project)
        })
    }

    pub fn projects_for_user(&self, user_id: &str) -> Result<Vec<ProjectRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, project_id, title, start_date, end_date, details
                 FROM projects WHERE user_id = ?1 ORDER BY project_id",
            )?;
            let rows = stmt.query_map(params![user_id], project_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_project(
        &self,
        user_id: &str,
        project_id: i64,
        title: &str,
        start_date: &str,
        end_date: &str,
        details: &str,
    ) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE projects SET title = ?3, start_date = ?4, end_date = ?5, details = ?6
                 WHERE user_id = ?1 AND project_id = ?2",
                params![user_id, project_id, title, start_date, end_date, details],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_project(&self, user_id: &str, project_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM projects WHERE user_id = ?1 AND project_id = ?2",
                params![user_id, project_id],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_projects_for_user(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM projects WHERE user_id = ?1",
                params![user_id],
            )?;
            Ok(n as u64)
        })
    }

    // -- Skills --

    pub fn insert_skill(&self, skill: &SkillRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO skills (user_id, skill_id, stack) VALUES (?1, ?2, ?3)",
                params![skill.user_id, skill.skill_id, skill.stack],
            )?;
            Ok(())
        })
    }

    pub fn get_skill(&self, user_id: &str, skill_id: i64) -> Result<Option<SkillRow>> {
        self.with_conn(|conn| {
            let skill = conn
                .query_row(
                    "SELECT user_id, skill_id, stack
                     FROM skills WHERE user_id = ?1 AND skill_id = ?2",
                    params![user_id, skill_id],
                    skill_from_row,
                )
                .optional()?;
            Ok(skill)
        })
    }

    pub fn skills_for_user(&self, user_id: &str) -> Result<Vec<SkillRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, skill_id, stack
                 FROM skills WHERE user_id = ?1 ORDER BY skill_id",
            )?;
            let rows = stmt.query_map(params![user_id], skill_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn update_skill(&self, user_id: &str, skill_id: i64, stack: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE skills SET stack = ?3 WHERE user_id = ?1 AND skill_id = ?2",
                params![user_id, skill_id, stack],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_skill(&self, user_id: &str, skill_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM skills WHERE user_id = ?1 AND skill_id = ?2",
                params![user_id, skill_id],
            )?;
            Ok(n as u64)
        })
    }

    pub fn delete_skills_for_user(&self, user_id: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM skills WHERE user_id = ?1", params![user_id])?;
            Ok(n as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn board(board_id: i64, nickname: &str, title: &str, contents: &str) -> BoardRow {
        BoardRow {
            board_id,
            nickname: nickname.to_string(),
            title: title.to_string(),
            contents: contents.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sequence_starts_at_one_and_counts_up() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.bump_sequence("boards", "global").unwrap(), 1);
        assert_eq!(db.bump_sequence("boards", "global").unwrap(), 2);
        assert_eq!(db.bump_sequence("boards", "global").unwrap(), 3);
    }

    #[test]
    fn sequences_are_independent_per_scope() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.bump_sequence("comments", "1").unwrap(), 1);
        assert_eq!(db.bump_sequence("comments", "1").unwrap(), 2);
        assert_eq!(db.bump_sequence("comments", "2").unwrap(), 1);
        assert_eq!(db.bump_sequence("projects", "u-1").unwrap(), 1);
    }

    #[test]
    fn deleting_scope_counters_leaves_other_scopes() {
        let db = Database::open_in_memory().unwrap();
        db.bump_sequence("projects", "u-1").unwrap();
        db.bump_sequence("skills", "u-1").unwrap();
        db.bump_sequence("projects", "u-2").unwrap();

        assert_eq!(db.delete_counters_for_scope("u-1").unwrap(), 2);
        assert_eq!(db.current_sequence("projects", "u-1").unwrap(), None);
        assert_eq!(db.current_sequence("projects", "u-2").unwrap(), Some(1));
    }

    #[test]
    fn like_search_escapes_wildcards() {
        let db = Database::open_in_memory().unwrap();
        db.insert_board(&board(1, "amy", "100% legit", "x")).unwrap();
        db.insert_board(&board(2, "amy", "fully legit", "x")).unwrap();

        let hits = db.search_boards(TextField::Title, "100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].board_id, 1);
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let db = Database::open_in_memory().unwrap();
        db.insert_board(&board(1, "amy", "Rust tips", "hello")).unwrap();
        db.insert_board(&board(2, "bob", "cooking", "rustic oven")).unwrap();

        let by_title = db.search_boards(TextField::Title, "rust").unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].board_id, 1);

        let either = db.search_boards(TextField::TitleOrContents, "rust").unwrap();
        assert_eq!(either.len(), 2);
    }

    #[test]
    fn boards_by_ids_skips_query_on_empty_input() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_boards_by_ids(&[]).unwrap().is_empty());
        assert!(db.likes_for_boards(&[]).unwrap().is_empty());
        assert!(db.comment_board_ids_for(&[]).unwrap().is_empty());
    }

    #[test]
    fn put_like_replaces_membership() {
        let db = Database::open_in_memory().unwrap();
        db.put_like(7, &["amy".to_string()]).unwrap();
        db.put_like(7, &["amy".to_string(), "bob".to_string()]).unwrap();

        let row = db.get_like(7).unwrap().unwrap();
        assert_eq!(row.members, vec!["amy".to_string(), "bob".to_string()]);
    }

    #[test]
    fn corrupt_like_record_is_an_error_not_empty() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO likes (board_id, from_user) VALUES (5, 'not json')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(db.get_like(5).is_err());
        assert!(db.likes_for_boards(&[5]).is_err());
    }
}
