use crate::error::{CoreError, CoreResult};
use crate::feed::comment_view;
use crate::likes::LikeLedger;
use crate::sequence::{self, Sequences};
use agora_db::models::{BoardRow, CommentRow};
use agora_db::Database;
use agora_types::api::LikeOutcome;
use agora_types::models::{Board, Comment};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Write side of boards and their comments. IDs come from the allocator
/// handed in at construction; board/comment relationships are keyed by
/// those IDs alone.
#[derive(Clone)]
pub struct Boards {
    db: Arc<Database>,
    sequences: Sequences,
    likes: LikeLedger,
}

impl Boards {
    pub fn new(db: Arc<Database>, sequences: Sequences, likes: LikeLedger) -> Self {
        Self {
            db,
            sequences,
            likes,
        }
    }

    /// Creates a board authored by `nickname`. If the ID allocation
    /// fails, nothing is written.
    pub fn create(&self, nickname: &str, title: &str, contents: &str) -> CoreResult<Board> {
        let board_id = self
            .sequences
            .allocate(sequence::BOARDS, sequence::GLOBAL_SCOPE)?;

        let row = BoardRow {
            board_id,
            nickname: nickname.to_string(),
            title: title.to_string(),
            contents: contents.to_string(),
            created_at: Utc::now(),
        };
        self.db.insert_board(&row)?;

        debug!(board_id, author = nickname, "board created");
        Ok(board_view(row))
    }

    /// Only the author may edit. The ownership check reads the record
    /// first; the update is a second, separate write.
    pub fn update(
        &self,
        board_id: i64,
        requester: &str,
        title: &str,
        contents: &str,
    ) -> CoreResult<Board> {
        let Some(board) = self.db.get_board(board_id)? else {
            return Err(CoreError::NotFound("board"));
        };
        if board.nickname != requester {
            return Err(CoreError::Forbidden("only the author may edit this board"));
        }

        self.db.update_board(board_id, title, contents)?;

        Ok(Board {
            board_id,
            nickname: board.nickname,
            title: title.to_string(),
            contents: contents.to_string(),
            created_at: board.created_at,
        })
    }

    /// Likes require the board to exist; the ledger itself never checks.
    pub fn toggle_like(&self, board_id: i64, actor: &str) -> CoreResult<LikeOutcome> {
        if self.db.get_board(board_id)?.is_none() {
            return Err(CoreError::NotFound("board"));
        }
        self.likes.toggle(board_id, actor)
    }

    /// Adds a comment with an ID scoped to the owning board, so comment
    /// numbering restarts at 1 on every board.
    pub fn add_comment(
        &self,
        board_id: i64,
        nickname: &str,
        contents: &str,
    ) -> CoreResult<Comment> {
        if self.db.get_board(board_id)?.is_none() {
            return Err(CoreError::NotFound("board"));
        }

        let comment_id = self
            .sequences
            .allocate(sequence::COMMENTS, &board_id.to_string())?;

        let row = CommentRow {
            board_id,
            comment_id,
            nickname: nickname.to_string(),
            contents: contents.to_string(),
            created_at: Utc::now(),
        };
        self.db.insert_comment(&row)?;

        debug!(board_id, comment_id, "comment added");
        Ok(comment_view(row))
    }

    pub fn update_comment(
        &self,
        board_id: i64,
        comment_id: i64,
        requester: &str,
        contents: &str,
    ) -> CoreResult<Comment> {
        let Some(comment) = self.db.get_comment(board_id, comment_id)? else {
            return Err(CoreError::NotFound("comment"));
        };
        if comment.nickname != requester {
            return Err(CoreError::Forbidden(
                "only the author may edit this comment",
            ));
        }

        self.db.update_comment(board_id, comment_id, contents)?;

        Ok(Comment {
            board_id,
            comment_id,
            nickname: comment.nickname,
            contents: contents.to_string(),
            created_at: comment.created_at,
        })
    }

    pub fn delete_comment(
        &self,
        board_id: i64,
        comment_id: i64,
        requester: &str,
    ) -> CoreResult<()> {
        let Some(comment) = self.db.get_comment(board_id, comment_id)? else {
            return Err(CoreError::NotFound("comment"));
        };
        if comment.nickname != requester {
            return Err(CoreError::Forbidden(
                "only the author may delete this comment",
            ));
        }

        self.db.delete_comment(board_id, comment_id)?;
        Ok(())
    }
}

fn board_view(row: BoardRow) -> Board {
    Board {
        board_id: row.board_id,
        nickname: row.nickname,
        title: row.title,
        contents: row.contents,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> (Arc<Database>, Boards) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let sequences = Sequences::new(db.clone());
        let likes = LikeLedger::new(db.clone());
        (db.clone(), Boards::new(db, sequences, likes))
    }

    #[test]
    fn boards_get_ascending_global_ids() {
        let (_db, boards) = services();
        assert_eq!(boards.create("amy", "a", "1").unwrap().board_id, 1);
        assert_eq!(boards.create("bob", "b", "2").unwrap().board_id, 2);
        assert_eq!(boards.create("amy", "c", "3").unwrap().board_id, 3);
    }

    #[test]
    fn comment_ids_restart_per_board() {
        let (_db, boards) = services();
        let first = boards.create("amy", "a", "1").unwrap();
        let second = boards.create("amy", "b", "2").unwrap();

        assert_eq!(
            boards
                .add_comment(first.board_id, "bob", "hi")
                .unwrap()
                .comment_id,
            1
        );
        assert_eq!(
            boards
                .add_comment(first.board_id, "cho", "yo")
                .unwrap()
                .comment_id,
            2
        );
        assert_eq!(
            boards
                .add_comment(second.board_id, "bob", "hey")
                .unwrap()
                .comment_id,
            1
        );
    }

    #[test]
    fn only_the_author_may_edit_a_board() {
        let (_db, boards) = services();
        let board = boards.create("amy", "a", "1").unwrap();

        assert!(matches!(
            boards.update(board.board_id, "bob", "x", "y"),
            Err(CoreError::Forbidden(_))
        ));

        let edited = boards.update(board.board_id, "amy", "x", "y").unwrap();
        assert_eq!(edited.title, "x");
        assert_eq!(edited.contents, "y");
        assert_eq!(edited.created_at, board.created_at);
    }

    #[test]
    fn operations_on_missing_boards_are_not_found() {
        let (_db, boards) = services();
        assert!(matches!(
            boards.update(1, "amy", "x", "y"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            boards.toggle_like(1, "amy"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            boards.add_comment(1, "amy", "hi"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn toggle_like_flows_through_to_the_ledger() {
        let (_db, boards) = services();
        let board = boards.create("amy", "a", "1").unwrap();

        let liked = boards.toggle_like(board.board_id, "bob").unwrap();
        assert!(liked.liked);
        assert_eq!(liked.count, 1);

        let unliked = boards.toggle_like(board.board_id, "bob").unwrap();
        assert!(!unliked.liked);
        assert_eq!(unliked.count, 0);
    }

    #[test]
    fn comment_edits_are_author_gated() {
        let (_db, boards) = services();
        let board = boards.create("amy", "a", "1").unwrap();
        let comment = boards.add_comment(board.board_id, "bob", "hi").unwrap();

        assert!(matches!(
            boards.update_comment(board.board_id, comment.comment_id, "amy", "edit"),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            boards.delete_comment(board.board_id, comment.comment_id, "amy"),
            Err(CoreError::Forbidden(_))
        ));

        let edited = boards
            .update_comment(board.board_id, comment.comment_id, "bob", "edit")
            .unwrap();
        assert_eq!(edited.contents, "edit");

        boards
            .delete_comment(board.board_id, comment.comment_id, "bob")
            .unwrap();
        assert!(matches!(
            boards.update_comment(board.board_id, comment.comment_id, "bob", "again"),
            Err(CoreError::NotFound(_))
        ));
    }
}
