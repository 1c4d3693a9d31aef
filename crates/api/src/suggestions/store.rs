//! PostgreSQL-backed [`SuggestionStore`].

use async_trait::async_trait;
use chrono::NaiveDate;

use breezy_core::suggestion::SuggestionKind;
use breezy_core::types::DbId;
use breezy_db::models::suggestion_cache::SuggestionCacheRecord;
use breezy_db::repositories::SuggestionCacheRepo;
use breezy_db::DbPool;

use crate::suggestions::service::{SuggestionError, SuggestionStore};

/// Adapts [`SuggestionCacheRepo`] to the orchestrator's store seam.
///
/// Atomicity comes from the repository's single
/// `INSERT ... ON CONFLICT DO UPDATE` statement.
pub struct PgSuggestionStore {
    pool: DbPool,
}

impl PgSuggestionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionStore for PgSuggestionStore {
    async fn find(
        &self,
        user_id: DbId,
        kind: SuggestionKind,
        day: NaiveDate,
    ) -> Result<Option<SuggestionCacheRecord>, SuggestionError> {
        SuggestionCacheRepo::find(&self.pool, user_id, kind.as_str(), day)
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))
    }

    async fn upsert(
        &self,
        user_id: DbId,
        kind: SuggestionKind,
        day: NaiveDate,
        result: &serde_json::Value,
    ) -> Result<SuggestionCacheRecord, SuggestionError> {
        SuggestionCacheRepo::upsert(&self.pool, user_id, kind.as_str(), day, result)
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))
    }
}
