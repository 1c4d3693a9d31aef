//! Daily AI-suggestion orchestration.
//!
//! [`SuggestionService`] composes three collaborators into one
//! request/response cycle:
//!
//! - the budget policy (`breezy_core::suggestion::decide_refresh`),
//! - a [`SuggestionStore`] (the per-user-per-day cache), and
//! - a [`SuggestionGenerator`] (the Gemini adapter).
//!
//! Both collaborators are injected as trait objects at construction time,
//! so the orchestration logic is tested against in-memory mocks.

pub mod generator;
pub mod service;
pub mod store;

pub use generator::GeminiGenerator;
pub use service::{
    SuggestionError, SuggestionGenerator, SuggestionOutcome, SuggestionService, SuggestionStore,
};
pub use store::PgSuggestionStore;
