use crate::error::{CoreError, CoreResult};
use crate::likes::LikeLedger;
use agora_db::Database;
use agora_types::api::UserPurgeReport;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One idempotent stage of a user purge. The store has no
/// multi-collection transaction, so the purge is an ordered list of
/// individually retryable steps instead of one atomic delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeStep {
    Projects,
    Skills,
    Counters,
    /// Like records of boards the user authored. Runs before the boards
    /// themselves are deleted, while the author's board list can still
    /// be read.
    BoardLikes,
    Boards,
    Comments,
    /// Membership entries on boards the user liked but does not own.
    LikedElsewhere,
    /// Always last, so an interrupted purge leaves records that are
    /// still attributable to an existing account.
    Account,
}

pub const USER_PURGE_ORDER: [PurgeStep; 8] = [
    PurgeStep::Projects,
    PurgeStep::Skills,
    PurgeStep::Counters,
    PurgeStep::BoardLikes,
    PurgeStep::Boards,
    PurgeStep::Comments,
    PurgeStep::LikedElsewhere,
    PurgeStep::Account,
];

/// Cascading cleanup for owner removal. Completed steps are never
/// rolled back; a failure surfaces to the caller, who retries the whole
/// operation and gets zero counts for whatever already went away.
#[derive(Clone)]
pub struct Cleanup {
    db: Arc<Database>,
    likes: LikeLedger,
}

impl Cleanup {
    pub fn new(db: Arc<Database>, likes: LikeLedger) -> Self {
        Self { db, likes }
    }

    /// Removes the user and everything scoped to them, reporting how
    /// many records each step deleted.
    pub fn purge_user(&self, user_id: Uuid, nickname: &str) -> CoreResult<UserPurgeReport> {
        let scope = user_id.to_string();
        let mut report = UserPurgeReport::default();

        for step in USER_PURGE_ORDER {
            match step {
                PurgeStep::Projects => {
                    report.projects = self.db.delete_projects_for_user(&scope)?;
                }
                PurgeStep::Skills => {
                    report.skills = self.db.delete_skills_for_user(&scope)?;
                }
                PurgeStep::Counters => {
                    report.counters = self.db.delete_counters_for_scope(&scope)?;
                }
                PurgeStep::BoardLikes => {
                    for board_id in self.db.board_ids_by_author(nickname)? {
                        report.board_likes += self.likes.delete_for_board(board_id)?;
                    }
                }
                PurgeStep::Boards => {
                    report.boards = self.db.delete_boards_by_author(nickname)?;
                }
                PurgeStep::Comments => {
                    report.comments = self.db.delete_comments_by_author(nickname)?;
                }
                PurgeStep::LikedElsewhere => {
                    report.liked_elsewhere = self.likes.remove_actor_everywhere(nickname)?;
                }
                PurgeStep::Account => {
                    report.accounts = self.db.delete_user(&scope)?;
                }
            }
        }

        info!(nickname, ?report, "user purged");
        Ok(report)
    }

    /// Author-checked cascade: the board, then its comments, then its
    /// like record. When the board row is already gone the remaining
    /// steps still run, so a retry after a partial failure finishes the
    /// job instead of erroring out.
    pub fn delete_board(&self, board_id: i64, requester: &str) -> CoreResult<()> {
        if let Some(board) = self.db.get_board(board_id)? {
            if board.nickname != requester {
                return Err(CoreError::Forbidden(
                    "only the author may delete this board",
                ));
            }
            self.db.delete_board(board_id)?;
        }

        self.db.delete_comments_for_board(board_id)?;
        self.likes.delete_for_board(board_id)?;

        info!(board_id, "board deleted");
        Ok(())
    }
}
