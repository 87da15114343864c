//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` (or any `PgExecutor`, for use inside a transaction) as the first
//! argument.

pub mod account_repo;
pub mod comment_repo;
pub mod page_repo;
pub mod revision_repo;
pub mod search_repo;

pub use account_repo::AccountRepo;
pub use comment_repo::CommentRepo;
pub use page_repo::PageRepo;
pub use revision_repo::RevisionRepo;
pub use search_repo::SearchRepo;
