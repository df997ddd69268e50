use crate::error::{CoreError, CoreResult};
use agora_db::Database;
use std::sync::Arc;

/// Collections with allocator-managed IDs.
pub const BOARDS: &str = "boards";
pub const COMMENTS: &str = "comments";
pub const PROJECTS: &str = "projects";
pub const SKILLS: &str = "skills";

/// Scope key for sequences shared by the whole system.
pub const GLOBAL_SCOPE: &str = "global";

/// Hands out per-scope sequence numbers. Values start at 1, go up by
/// one per call, and are never reused, even after every record that
/// used a value is deleted.
#[derive(Clone)]
pub struct Sequences {
    db: Arc<Database>,
}

impl Sequences {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Next ID for (collection, scope_key). The bump is one atomic
    /// statement against the counter row; on failure no value is
    /// consumed and the caller must abort its create.
    pub fn allocate(&self, collection: &str, scope_key: &str) -> CoreResult<i64> {
        if collection.is_empty() || scope_key.is_empty() {
            return Err(CoreError::Validation(
                "collection and scope key must not be empty".into(),
            ));
        }
        Ok(self.db.bump_sequence(collection, scope_key)?)
    }
}
