use anyhow::Result;
use rusqlite::Connection;

/// Creates all collections if they don't exist.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id     TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            nickname    TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL,
            password    TEXT NOT NULL,
            description TEXT NOT NULL,
            profile_img TEXT NOT NULL,
            position    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS boards (
            board_id    INTEGER PRIMARY KEY,
            nickname    TEXT NOT NULL,
            title       TEXT NOT NULL,
            contents    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_boards_nickname ON boards(nickname);

        CREATE TABLE IF NOT EXISTS comments (
            board_id    INTEGER NOT NULL,
            comment_id  INTEGER NOT NULL,
            nickname    TEXT NOT NULL,
            contents    TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            PRIMARY KEY (board_id, comment_id)
        );

        CREATE INDEX IF NOT EXISTS idx_comments_nickname ON comments(nickname);

        -- At most one row per board. from_user holds the full membership
        -- list as a JSON array of nicknames; no row means zero likes.
        CREATE TABLE IF NOT EXISTS likes (
            board_id    INTEGER PRIMARY KEY,
            from_user   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            user_id     TEXT NOT NULL,
            project_id  INTEGER NOT NULL,
            title       TEXT NOT NULL,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            details     TEXT NOT NULL,
            PRIMARY KEY (user_id, project_id)
        );

        CREATE TABLE IF NOT EXISTS skills (
            user_id     TEXT NOT NULL,
            skill_id    INTEGER NOT NULL,
            stack       TEXT NOT NULL,
            PRIMARY KEY (user_id, skill_id)
        );

        -- One row per (collection, scope); value only ever increases.
        CREATE TABLE IF NOT EXISTS counters (
            collection  TEXT NOT NULL,
            scope_key   TEXT NOT NULL,
            value       INTEGER NOT NULL,
            PRIMARY KEY (collection, scope_key)
        );
        "#,
    )?;

    Ok(())
}
