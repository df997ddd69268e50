pub mod boards;
pub mod cleanup;
pub mod error;
pub mod feed;
pub mod likes;
pub mod profile;
pub mod sequence;

pub use boards::Boards;
pub use cleanup::Cleanup;
pub use error::{CoreError, CoreResult};
pub use feed::{BoardFeed, BoardFilter, SortOrder};
pub use likes::LikeLedger;
pub use profile::Profiles;
pub use sequence::Sequences;
