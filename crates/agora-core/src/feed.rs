use crate::error::{CoreError, CoreResult};
use agora_db::models::{BoardRow, CommentRow};
use agora_db::queries::TextField;
use agora_db::Database;
use agora_types::api::{BoardDetail, BoardPage, BoardSummary};
use agora_types::models::Comment;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Which boards form the base set of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardFilter {
    All,
    Author(String),
    Title(String),
    Contents(String),
    TitleOrContents(String),
    CommentText(String),
}

impl BoardFilter {
    /// Parses the `option` / `keyword` pair of a search request.
    /// Unknown options and empty keywords are rejected.
    pub fn from_option(option: &str, keyword: &str) -> CoreResult<Self> {
        if keyword.is_empty() {
            return Err(CoreError::Validation("keyword must not be empty".into()));
        }
        let keyword = keyword.to_string();
        match option {
            "nickname" => Ok(Self::Author(keyword)),
            "title" => Ok(Self::Title(keyword)),
            "contents" => Ok(Self::Contents(keyword)),
            "titleContents" => Ok(Self::TitleOrContents(keyword)),
            "comments" => Ok(Self::CommentText(keyword)),
            other => Err(CoreError::Validation(format!(
                "unknown search option: {}",
                other
            ))),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first: descending board ID.
    #[default]
    Recency,
    /// Most liked first; boards with equal counts keep store order.
    Popularity,
}

impl SortOrder {
    /// "좋아요순" selects the popularity order; any other label (or no
    /// label) falls back to recency.
    pub fn from_sort_name(sort_name: Option<&str>) -> Self {
        match sort_name {
            Some("좋아요순") => Self::Popularity,
            _ => Self::Recency,
        }
    }
}

#[derive(Default)]
struct Tally {
    likes: u64,
    liked_by: Vec<String>,
    comments: u64,
}

/// Read side of the board feed. Listings join boards with their like and
/// comment aggregates in memory, keyed by board ID: one query for the
/// base set, then one batched query per dependent collection instead of
/// a round trip per board.
#[derive(Clone)]
pub struct BoardFeed {
    db: Arc<Database>,
}

impl BoardFeed {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// One page of boards with their aggregates. `total_pages` is
    /// computed over the whole filtered set, and slicing happens only
    /// after the full sort, so page boundaries never depend on store
    /// ordering.
    pub fn list(
        &self,
        filter: &BoardFilter,
        order: SortOrder,
        page: u64,
        per_page: u64,
        viewer: &str,
    ) -> CoreResult<BoardPage> {
        if page == 0 || per_page == 0 {
            return Err(CoreError::Validation(
                "page and perPage must be positive".into(),
            ));
        }

        let base = self.base_set(filter)?;
        let ids: Vec<i64> = base.iter().map(|b| b.board_id).collect();
        let tallies = self.tally(&ids)?;

        let mut summaries: Vec<BoardSummary> = base
            .into_iter()
            .map(|board| summarize(board, &tallies, viewer))
            .collect();

        match order {
            SortOrder::Recency => summaries.sort_by(|a, b| b.board_id.cmp(&a.board_id)),
            // Stable sort: popularity ties keep their store order.
            SortOrder::Popularity => summaries.sort_by(|a, b| b.likes.cmp(&a.likes)),
        }

        let total_pages = (summaries.len() as u64).div_ceil(per_page);
        let boards = summaries
            .into_iter()
            .skip((page - 1).saturating_mul(per_page) as usize)
            .take(per_page as usize)
            .collect();

        Ok(BoardPage { total_pages, boards })
    }

    /// One board with its full comment list embedded.
    pub fn board(&self, board_id: i64, viewer: &str) -> CoreResult<BoardDetail> {
        let Some(board) = self.db.get_board(board_id)? else {
            return Err(CoreError::NotFound("board"));
        };

        let comments: Vec<Comment> = self
            .db
            .comments_for_board(board_id)?
            .into_iter()
            .map(comment_view)
            .collect();

        let members = match self.db.get_like(board_id)? {
            Some(record) => record.members,
            None => Vec::new(),
        };

        Ok(BoardDetail {
            board_id: board.board_id,
            nickname: board.nickname,
            title: board.title,
            contents: board.contents,
            created_at: board.created_at,
            comments,
            likes: members.len() as u64,
            is_liked: members.iter().any(|m| m == viewer),
            liked_by: members,
        })
    }

    fn base_set(&self, filter: &BoardFilter) -> CoreResult<Vec<BoardRow>> {
        let boards = match filter {
            BoardFilter::All => self.db.list_boards()?,
            BoardFilter::Author(k) => self.db.search_boards(TextField::Author, k)?,
            BoardFilter::Title(k) => self.db.search_boards(TextField::Title, k)?,
            BoardFilter::Contents(k) => self.db.search_boards(TextField::Contents, k)?,
            BoardFilter::TitleOrContents(k) => {
                self.db.search_boards(TextField::TitleOrContents, k)?
            }
            // Two phases: match comments first, then fetch the owning
            // boards by ID set in a single round trip.
            BoardFilter::CommentText(k) => {
                let ids: Vec<i64> = self
                    .db
                    .comment_board_ids_matching(k)?
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                self.db.get_boards_by_ids(&ids)?
            }
        };
        Ok(boards)
    }

    /// Aggregates for the boards in view, folded from two batched
    /// queries. Like counts are summed across records rather than read
    /// from a single row, so a duplicate record inflates the count
    /// instead of shadowing it.
    fn tally(&self, board_ids: &[i64]) -> CoreResult<HashMap<i64, Tally>> {
        let mut tallies: HashMap<i64, Tally> = HashMap::new();

        for like in self.db.likes_for_boards(board_ids)? {
            let entry = tallies.entry(like.board_id).or_default();
            entry.likes += like.members.len() as u64;
            entry.liked_by.extend(like.members);
        }

        for board_id in self.db.comment_board_ids_for(board_ids)? {
            tallies.entry(board_id).or_default().comments += 1;
        }

        Ok(tallies)
    }
}

fn summarize(board: BoardRow, tallies: &HashMap<i64, Tally>, viewer: &str) -> BoardSummary {
    let (likes, comments, liked_by) = match tallies.get(&board.board_id) {
        Some(tally) => (tally.likes, tally.comments, tally.liked_by.clone()),
        None => (0, 0, Vec::new()),
    };

    BoardSummary {
        board_id: board.board_id,
        nickname: board.nickname,
        title: board.title,
        contents: board.contents,
        created_at: board.created_at,
        comments,
        likes,
        is_liked: liked_by.iter().any(|m| m == viewer),
        liked_by,
    }
}

pub(crate) fn comment_view(row: CommentRow) -> Comment {
    Comment {
        board_id: row.board_id,
        comment_id: row.comment_id,
        nickname: row.nickname,
        contents: row.contents,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_db::models::{BoardRow, CommentRow};
    use chrono::Utc;

    fn feed() -> (Arc<Database>, BoardFeed) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (db.clone(), BoardFeed::new(db))
    }

    fn seed_board(db: &Database, board_id: i64, nickname: &str, title: &str, contents: &str) {
        db.insert_board(&BoardRow {
            board_id,
            nickname: nickname.to_string(),
            title: title.to_string(),
            contents: contents.to_string(),
            created_at: Utc::now(),
        })
        .unwrap();
    }

    fn seed_comment(db: &Database, board_id: i64, comment_id: i64, nickname: &str, contents: &str) {
        db.insert_comment(&CommentRow {
            board_id,
            comment_id,
            nickname: nickname.to_string(),
            contents: contents.to_string(),
            created_at: Utc::now(),
        })
        .unwrap();
    }

    fn ids(page: &BoardPage) -> Vec<i64> {
        page.boards.iter().map(|b| b.board_id).collect()
    }

    #[test]
    fn filter_parsing_covers_every_option() {
        assert_eq!(
            BoardFilter::from_option("nickname", "amy").unwrap(),
            BoardFilter::Author("amy".into())
        );
        assert_eq!(
            BoardFilter::from_option("titleContents", "x").unwrap(),
            BoardFilter::TitleOrContents("x".into())
        );
        assert_eq!(
            BoardFilter::from_option("comments", "x").unwrap(),
            BoardFilter::CommentText("x".into())
        );
        assert!(matches!(
            BoardFilter::from_option("author", "x"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            BoardFilter::from_option("title", ""),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn sort_name_maps_to_popularity_only_for_the_like_label() {
        assert_eq!(
            SortOrder::from_sort_name(Some("좋아요순")),
            SortOrder::Popularity
        );
        assert_eq!(SortOrder::from_sort_name(Some("최신순")), SortOrder::Recency);
        assert_eq!(SortOrder::from_sort_name(None), SortOrder::Recency);
    }

    #[test]
    fn listing_reports_counts_and_viewer_flag() {
        let (db, feed) = feed();
        seed_board(&db, 1, "amy", "first", "a");
        seed_board(&db, 2, "bob", "second", "b");
        db.put_like(1, &["amy".to_string(), "bob".to_string()])
            .unwrap();
        seed_comment(&db, 1, 1, "bob", "nice");
        seed_comment(&db, 1, 2, "cho", "agreed");

        let page = feed
            .list(&BoardFilter::All, SortOrder::Recency, 1, 10, "amy")
            .unwrap();

        assert_eq!(ids(&page), vec![2, 1]);
        let first = &page.boards[1];
        assert_eq!(first.likes, 2);
        assert_eq!(first.comments, 2);
        assert!(first.is_liked);
        assert_eq!(first.liked_by, vec!["amy".to_string(), "bob".to_string()]);

        let second = &page.boards[0];
        assert_eq!(second.likes, 0);
        assert_eq!(second.comments, 0);
        assert!(!second.is_liked);

        let other_viewer = feed
            .list(&BoardFilter::All, SortOrder::Recency, 1, 10, "cho")
            .unwrap();
        assert!(!other_viewer.boards[1].is_liked);
    }

    #[test]
    fn popularity_sorts_by_likes_and_keeps_store_order_on_ties() {
        let (db, feed) = feed();
        for id in 1..=3 {
            seed_board(&db, id, "amy", "t", "c");
        }
        db.put_like(2, &["x".to_string()]).unwrap();

        let page = feed
            .list(&BoardFilter::All, SortOrder::Popularity, 1, 10, "x")
            .unwrap();

        assert_eq!(ids(&page), vec![2, 1, 3]);
    }

    #[test]
    fn pages_partition_the_sorted_set() {
        let (db, feed) = feed();
        for id in 1..=5 {
            seed_board(&db, id, "amy", "t", "c");
        }

        let mut seen = Vec::new();
        let first = feed
            .list(&BoardFilter::All, SortOrder::Recency, 1, 2, "x")
            .unwrap();
        assert_eq!(first.total_pages, 3);

        for page in 1..=first.total_pages {
            let slice = feed
                .list(&BoardFilter::All, SortOrder::Recency, page, 2, "x")
                .unwrap();
            seen.extend(ids(&slice));
        }
        assert_eq!(seen, vec![5, 4, 3, 2, 1]);

        let past_the_end = feed
            .list(&BoardFilter::All, SortOrder::Recency, 4, 2, "x")
            .unwrap();
        assert!(past_the_end.boards.is_empty());
        assert_eq!(past_the_end.total_pages, 3);
    }

    #[test]
    fn total_pages_counts_the_filtered_set() {
        let (db, feed) = feed();
        for id in 1..=12 {
            let title = if id % 2 == 0 { "even" } else { "odd" };
            seed_board(&db, id, "amy", title, "c");
        }

        let filtered = feed
            .list(
                &BoardFilter::Title("even".into()),
                SortOrder::Recency,
                1,
                4,
                "x",
            )
            .unwrap();
        assert_eq!(filtered.total_pages, 2);
        assert_eq!(ids(&filtered), vec![12, 10, 8, 6]);
    }

    #[test]
    fn zero_page_or_per_page_is_rejected() {
        let (_db, feed) = feed();
        assert!(matches!(
            feed.list(&BoardFilter::All, SortOrder::Recency, 0, 10, "x"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            feed.list(&BoardFilter::All, SortOrder::Recency, 1, 0, "x"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn comment_search_finds_owning_boards_once() {
        let (db, feed) = feed();
        seed_board(&db, 1, "amy", "t", "c");
        seed_board(&db, 2, "bob", "t", "c");
        seed_board(&db, 3, "cho", "t", "c");
        seed_comment(&db, 1, 1, "bob", "rust is fine");
        seed_comment(&db, 3, 1, "amy", "more rust");
        seed_comment(&db, 3, 2, "bob", "rust again");
        seed_comment(&db, 2, 1, "amy", "unrelated");

        let page = feed
            .list(
                &BoardFilter::CommentText("rust".into()),
                SortOrder::Recency,
                1,
                10,
                "x",
            )
            .unwrap();

        assert_eq!(ids(&page), vec![3, 1]);
    }

    #[test]
    fn board_detail_embeds_comments_in_insertion_order() {
        let (db, feed) = feed();
        seed_board(&db, 1, "amy", "t", "c");
        seed_comment(&db, 1, 1, "bob", "first");
        seed_comment(&db, 1, 2, "cho", "second");
        db.put_like(1, &["cho".to_string()]).unwrap();

        let detail = feed.board(1, "cho").unwrap();
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].contents, "first");
        assert_eq!(detail.comments[1].contents, "second");
        assert_eq!(detail.likes, 1);
        assert!(detail.is_liked);

        assert!(matches!(
            feed.board(99, "cho"),
            Err(CoreError::NotFound(_))
        ));
    }
}
