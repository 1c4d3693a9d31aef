//! Suggestion cache entity model.

use breezy_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use sqlx::FromRow;

/// Per-user-per-day cache of the latest generated suggestion for one kind.
///
/// At most one row exists per (`user_id`, `kind`, `for_date`); rows are
/// created by the upsert on first generation and never deleted by this
/// subsystem -- a new day simply addresses a new row.
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionCacheRecord {
    pub id: DbId,
    pub user_id: DbId,
    /// `"allergy"` or `"outfit"`.
    pub kind: String,
    /// Calendar date in UTC+8 identifying "today" for budget purposes.
    pub for_date: NaiveDate,
    /// Generated payload: a JSON array of tips (allergy) or a
    /// `{top, outer, bottom, note}` object (outfit).
    pub result: serde_json::Value,
    /// Generator invocations for this key so far. Seeded at 1 on insert,
    /// incremented by exactly 1 per successful generation.
    pub calls_today: i32,
    /// Time of the most recent successful generation.
    pub generated_at: Timestamp,
}
