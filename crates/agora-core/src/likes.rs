use crate::error::CoreResult;
use agora_db::Database;
use agora_types::api::LikeOutcome;
use std::sync::Arc;

/// Per-board membership ledger of who likes what. One record per board
/// holds the whole membership list, and that list is the sole source of
/// truth for counts and the per-actor flag.
#[derive(Clone)]
pub struct LikeLedger {
    db: Arc<Database>,
}

impl LikeLedger {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Flips `actor`'s membership on a board and returns the new state.
    /// The read and the write are separate store operations: two actors
    /// racing on one board resolve last-write-wins, and the count
    /// self-heals on the next toggle. A record that fails to decode
    /// aborts the toggle before anything is written.
    pub fn toggle(&self, board_id: i64, actor: &str) -> CoreResult<LikeOutcome> {
        let mut members = match self.db.get_like(board_id)? {
            Some(record) => record.members,
            None => Vec::new(),
        };

        let liked = match members.iter().position(|m| m == actor) {
            Some(at) => {
                members.remove(at);
                false
            }
            None => {
                members.push(actor.to_string());
                true
            }
        };

        self.db.put_like(board_id, &members)?;

        Ok(LikeOutcome {
            liked,
            count: members.len() as u64,
        })
    }

    /// Current like count; 0 when the board has no record.
    pub fn count(&self, board_id: i64) -> CoreResult<u64> {
        Ok(self
            .db
            .get_like(board_id)?
            .map(|record| record.members.len() as u64)
            .unwrap_or(0))
    }

    /// Strips `actor` from every membership list containing them, for
    /// boards the actor liked but does not own. Returns the number of
    /// records rewritten.
    pub fn remove_actor_everywhere(&self, actor: &str) -> CoreResult<u64> {
        let mut rewritten = 0;
        for record in self.db.all_likes()? {
            let before = record.members.len();
            let members: Vec<String> =
                record.members.into_iter().filter(|m| m != actor).collect();
            if members.len() != before {
                self.db.put_like(record.board_id, &members)?;
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }

    /// Drops the like record of a deleted board. Returns 1 if a record
    /// existed.
    pub fn delete_for_board(&self, board_id: i64) -> CoreResult<u64> {
        Ok(self.db.delete_like(board_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> LikeLedger {
        LikeLedger::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn first_toggle_creates_the_record() {
        let likes = ledger();

        let out = likes.toggle(1, "amy").unwrap();
        assert!(out.liked);
        assert_eq!(out.count, 1);
        assert_eq!(likes.count(1).unwrap(), 1);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let likes = ledger();
        likes.toggle(1, "amy").unwrap();

        let before = likes.count(1).unwrap();
        let flipped = likes.toggle(1, "bob").unwrap();
        assert!(flipped.liked);
        assert_eq!(flipped.count, before + 1);

        let reverted = likes.toggle(1, "bob").unwrap();
        assert!(!reverted.liked);
        assert_eq!(reverted.count, before);
    }

    #[test]
    fn count_tracks_membership_exactly() {
        let likes = ledger();
        assert_eq!(likes.count(9).unwrap(), 0);

        likes.toggle(9, "amy").unwrap();
        likes.toggle(9, "bob").unwrap();
        likes.toggle(9, "cho").unwrap();
        assert_eq!(likes.count(9).unwrap(), 3);

        likes.toggle(9, "bob").unwrap();
        assert_eq!(likes.count(9).unwrap(), 2);
    }

    #[test]
    fn remove_actor_everywhere_spares_other_members() {
        let likes = ledger();
        likes.toggle(1, "amy").unwrap();
        likes.toggle(1, "bob").unwrap();
        likes.toggle(2, "amy").unwrap();
        likes.toggle(3, "bob").unwrap();

        assert_eq!(likes.remove_actor_everywhere("amy").unwrap(), 2);
        assert_eq!(likes.count(1).unwrap(), 1);
        assert_eq!(likes.count(2).unwrap(), 0);
        assert_eq!(likes.count(3).unwrap(), 1);

        // Already gone: nothing left to rewrite.
        assert_eq!(likes.remove_actor_everywhere("amy").unwrap(), 0);
    }

    #[test]
    fn delete_for_board_reports_whether_a_record_existed() {
        let likes = ledger();
        likes.toggle(4, "amy").unwrap();

        assert_eq!(likes.delete_for_board(4).unwrap(), 1);
        assert_eq!(likes.delete_for_board(4).unwrap(), 0);
        assert_eq!(likes.count(4).unwrap(), 0);
    }

    #[test]
    fn corrupt_record_fails_the_toggle_closed() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO likes (board_id, from_user) VALUES (8, '{broken')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let likes = LikeLedger::new(db.clone());
        assert!(likes.toggle(8, "amy").is_err());

        // The broken record was not overwritten.
        let raw: String = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT from_user FROM likes WHERE board_id = 8",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(raw, "{broken");
    }
}
