//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod feedback_repo;
pub mod suggestion_cache_repo;
pub mod user_repo;

pub use feedback_repo::FeedbackRepo;
pub use suggestion_cache_repo::SuggestionCacheRepo;
pub use user_repo::UserRepo;
