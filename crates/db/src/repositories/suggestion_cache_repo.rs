//! Repository for the `suggestion_cache` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use breezy_core::types::DbId;

use crate::models::suggestion_cache::SuggestionCacheRecord;

/// Column list for suggestion_cache queries.
const COLUMNS: &str = "id, user_id, kind, for_date, result, calls_today, generated_at";

/// Provides data access for the per-user-per-day suggestion cache.
pub struct SuggestionCacheRepo;

impl SuggestionCacheRepo {
    /// Find the cache record for one (user, kind, day) key. A miss is
    /// `Ok(None)`, not an error.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        kind: &str,
        for_date: NaiveDate,
    ) -> Result<Option<SuggestionCacheRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM suggestion_cache
             WHERE user_id = $1 AND kind = $2 AND for_date = $3"
        );
        sqlx::query_as::<_, SuggestionCacheRecord>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(for_date)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful generation: insert with `calls_today = 1`, or
    /// replace the result and increment the counter by exactly 1.
    ///
    /// This is a single conditional statement. Concurrent generations for
    /// the same key may both run, but every increment lands: the daily
    /// budget can over-count slightly, never under-count.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        kind: &str,
        for_date: NaiveDate,
        result: &serde_json::Value,
    ) -> Result<SuggestionCacheRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO suggestion_cache (user_id, kind, for_date, result, calls_today, generated_at)
             VALUES ($1, $2, $3, $4, 1, NOW())
             ON CONFLICT (user_id, kind, for_date) DO UPDATE SET
                result = EXCLUDED.result,
                calls_today = suggestion_cache.calls_today + 1,
                generated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SuggestionCacheRecord>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(for_date)
            .bind(result)
            .fetch_one(pool)
            .await
    }
}
