//! The suggestion orchestrator: cache lookup, budget decision, generation.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use breezy_core::prompt::{
    build_allergy_prompt, build_outfit_prompt, EnvironmentSnapshot, FeedbackSnapshot,
};
use breezy_core::suggestion::{
    decide_refresh, parse_allergy_tips, parse_outfit_advice, suggestion_day, BudgetAction,
    SuggestionKind, MAX_SUGGESTION_CALLS_PER_DAY,
};
use breezy_core::types::DbId;
use breezy_db::models::suggestion_cache::SuggestionCacheRecord;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    /// The request carried no Gemini API key. Rejected before any I/O.
    #[error("Missing Gemini API key")]
    MissingCredential,

    /// Gemini answered with a non-2xx status. Carries the upstream status
    /// code and a truncated body for diagnostics.
    #[error("Gemini API error ({status})")]
    Upstream { status: u16, detail: String },

    /// Gemini was unreachable or timed out.
    #[error("Suggestion generator unavailable: {0}")]
    Unavailable(String),

    /// The cache store failed.
    #[error("Suggestion store error: {0}")]
    Store(String),
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Per-user-per-day suggestion cache.
///
/// `upsert` must be a single atomic create-or-increment: concurrent
/// generations for the same key may both run, but no counter increment may
/// ever be lost.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Load the record for one (user, kind, day) key, if any.
    async fn find(
        &self,
        user_id: DbId,
        kind: SuggestionKind,
        day: NaiveDate,
    ) -> Result<Option<SuggestionCacheRecord>, SuggestionError>;

    /// Record a successful generation: create with `calls_today = 1` or
    /// replace the result and increment the counter by exactly 1.
    async fn upsert(
        &self,
        user_id: DbId,
        kind: SuggestionKind,
        day: NaiveDate,
        result: &serde_json::Value,
    ) -> Result<SuggestionCacheRecord, SuggestionError>;
}

/// The external text generator.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Produce raw suggestion text for a prompt. Single attempt, no retry.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, SuggestionError>;
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Result of one suggestion request.
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    /// The suggestion payload: a JSON array of tips (allergy) or a
    /// `{top, outer, bottom, note}` object (outfit).
    pub result: serde_json::Value,
    /// Whether the payload came from the cache rather than a fresh call.
    pub from_cache: bool,
    /// Set when a requested refresh was denied because the daily budget is
    /// exhausted; the payload is the stale cached result.
    pub refresh_limit_reached: bool,
}

/// Per-request coordinator for the daily suggestion cache.
pub struct SuggestionService {
    store: Arc<dyn SuggestionStore>,
    generator: Arc<dyn SuggestionGenerator>,
}

impl SuggestionService {
    /// Build the service from its injected collaborators.
    pub fn new(store: Arc<dyn SuggestionStore>, generator: Arc<dyn SuggestionGenerator>) -> Self {
        Self { store, generator }
    }

    /// Handle one suggestion request.
    ///
    /// `history` is the caller-supplied feedback window, newest first. At
    /// most one store mutation happens (on successful generation); the
    /// cache-serve and deny paths mutate nothing, and a generator failure
    /// leaves any pre-existing record untouched.
    pub async fn request_suggestion(
        &self,
        kind: SuggestionKind,
        user_id: DbId,
        api_key: &str,
        env: &EnvironmentSnapshot,
        history: &[FeedbackSnapshot],
        force_refresh: bool,
    ) -> Result<SuggestionOutcome, SuggestionError> {
        // 1. Precondition: a credential must be present before any I/O.
        if api_key.trim().is_empty() {
            return Err(SuggestionError::MissingCredential);
        }

        // 2. Load today's cache record (today = calendar date in UTC+8).
        let day = suggestion_day(Utc::now());
        let record = self.store.find(user_id, kind, day).await?;

        // 3. Budget decision.
        let action = decide_refresh(
            record.as_ref().map(|r| r.calls_today),
            force_refresh,
            MAX_SUGGESTION_CALLS_PER_DAY,
        );

        // 4. Serve from cache, flagged stale when the refresh was denied.
        if let Some(record) = record {
            match action {
                BudgetAction::ServeCache => {
                    return Ok(SuggestionOutcome {
                        result: record.result,
                        from_cache: true,
                        refresh_limit_reached: false,
                    });
                }
                BudgetAction::DenyRefreshServeStale => {
                    tracing::info!(user_id, kind = %kind, "Refresh budget exhausted, serving stale cache");
                    return Ok(SuggestionOutcome {
                        result: record.result,
                        from_cache: true,
                        refresh_limit_reached: true,
                    });
                }
                BudgetAction::Generate => {}
            }
        }

        // 5. Generate, then persist with the atomic counter increment. An
        // empty generation still caches (and counts): re-asking the model
        // for the same inputs would just reproduce the empty answer.
        let prompt = match kind {
            SuggestionKind::Allergy => build_allergy_prompt(history, env),
            SuggestionKind::Outfit => build_outfit_prompt(history, env),
        };
        let raw = self.generator.generate(api_key, &prompt).await?;
        let result = match kind {
            SuggestionKind::Allergy => serde_json::json!(parse_allergy_tips(&raw)),
            SuggestionKind::Outfit => serde_json::json!(parse_outfit_advice(&raw)),
        };

        let stored = self.store.upsert(user_id, kind, day, &result).await?;
        tracing::info!(
            user_id,
            kind = %kind,
            calls_today = stored.calls_today,
            "Generated fresh suggestion"
        );

        Ok(SuggestionOutcome {
            result,
            from_cache: false,
            refresh_limit_reached: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory store mirroring the SQL upsert semantics, with call counters.
    #[derive(Default)]
    struct MockStore {
        records: Mutex<HashMap<(DbId, &'static str, NaiveDate), SuggestionCacheRecord>>,
        find_calls: AtomicUsize,
        upsert_calls: AtomicUsize,
    }

    impl MockStore {
        fn seed(&self, user_id: DbId, kind: SuggestionKind, calls_today: i32, result: serde_json::Value) {
            let day = suggestion_day(Utc::now());
            self.records.lock().unwrap().insert(
                (user_id, kind.as_str(), day),
                SuggestionCacheRecord {
                    id: 1,
                    user_id,
                    kind: kind.as_str().to_string(),
                    for_date: day,
                    result,
                    calls_today,
                    generated_at: Utc::now(),
                },
            );
        }

        fn calls_today(&self, user_id: DbId, kind: SuggestionKind) -> Option<i32> {
            let day = suggestion_day(Utc::now());
            self.records
                .lock()
                .unwrap()
                .get(&(user_id, kind.as_str(), day))
                .map(|r| r.calls_today)
        }
    }

    #[async_trait]
    impl SuggestionStore for MockStore {
        async fn find(
            &self,
            user_id: DbId,
            kind: SuggestionKind,
            day: NaiveDate,
        ) -> Result<Option<SuggestionCacheRecord>, SuggestionError> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&(user_id, kind.as_str(), day))
                .cloned())
        }

        async fn upsert(
            &self,
            user_id: DbId,
            kind: SuggestionKind,
            day: NaiveDate,
            result: &serde_json::Value,
        ) -> Result<SuggestionCacheRecord, SuggestionError> {
            self.upsert_calls.fetch_add(1, Ordering::SeqCst);
            let mut records = self.records.lock().unwrap();
            let record = records
                .entry((user_id, kind.as_str(), day))
                .and_modify(|r| {
                    r.result = result.clone();
                    r.calls_today += 1;
                    r.generated_at = Utc::now();
                })
                .or_insert_with(|| SuggestionCacheRecord {
                    id: 1,
                    user_id,
                    kind: kind.as_str().to_string(),
                    for_date: day,
                    result: result.clone(),
                    calls_today: 1,
                    generated_at: Utc::now(),
                });
            Ok(record.clone())
        }
    }

    /// Scripted generator with a call counter.
    struct MockGenerator {
        reply: Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    impl MockGenerator {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SuggestionGenerator for MockGenerator {
        async fn generate(&self, _api_key: &str, _prompt: &str) -> Result<String, SuggestionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(SuggestionError::Upstream {
                    status,
                    detail: "upstream says no".to_string(),
                }),
            }
        }
    }

    fn service(
        store: Arc<MockStore>,
        generator: Arc<MockGenerator>,
    ) -> SuggestionService {
        SuggestionService::new(store, generator)
    }

    const FIVE_TIPS: &str = "tip one\ntip two\ntip three\ntip four\ntip five";

    #[tokio::test]
    async fn missing_credential_touches_nothing() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let result = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "   ",
                &EnvironmentSnapshot::default(),
                &[],
                false,
            )
            .await;

        assert_matches!(result, Err(SuggestionError::MissingCredential));
        assert_eq!(store.find_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.upsert_calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_request_generates_and_creates_record() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                false,
            )
            .await
            .unwrap();

        assert!(!outcome.from_cache);
        assert!(!outcome.refresh_limit_reached);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.calls_today(1, SuggestionKind::Allergy), Some(1));
        assert_eq!(
            outcome.result,
            serde_json::json!(["tip one", "tip two", "tip three", "tip four", "tip five"])
        );
    }

    #[tokio::test]
    async fn force_refresh_on_empty_cache_still_generates_once() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        svc.request_suggestion(
            SuggestionKind::Allergy,
            1,
            "key",
            &EnvironmentSnapshot::default(),
            &[],
            true,
        )
        .await
        .unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.calls_today(1, SuggestionKind::Allergy), Some(1));
    }

    #[tokio::test]
    async fn cached_record_is_served_verbatim_without_generation() {
        let store = Arc::new(MockStore::default());
        let cached = serde_json::json!(["stored tip"]);
        store.seed(1, SuggestionKind::Allergy, 2, cached.clone());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                false,
            )
            .await
            .unwrap();

        assert!(outcome.from_cache);
        assert!(!outcome.refresh_limit_reached);
        assert_eq!(outcome.result, cached);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.upsert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_within_budget_replaces_result_and_increments() {
        let store = Arc::new(MockStore::default());
        store.seed(1, SuggestionKind::Allergy, 1, serde_json::json!(["old tip"]));
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                true,
            )
            .await
            .unwrap();

        assert!(!outcome.from_cache);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.calls_today(1, SuggestionKind::Allergy), Some(2));
        assert_ne!(outcome.result, serde_json::json!(["old tip"]));
    }

    #[tokio::test]
    async fn refresh_at_budget_serves_stale_and_flags_limit() {
        let store = Arc::new(MockStore::default());
        let stale = serde_json::json!(["stale tip"]);
        store.seed(1, SuggestionKind::Allergy, MAX_SUGGESTION_CALLS_PER_DAY, stale.clone());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                true,
            )
            .await
            .unwrap();

        assert!(outcome.from_cache);
        assert!(outcome.refresh_limit_reached);
        assert_eq!(outcome.result, stale);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            store.calls_today(1, SuggestionKind::Allergy),
            Some(MAX_SUGGESTION_CALLS_PER_DAY)
        );
    }

    #[tokio::test]
    async fn sequential_generations_count_exactly() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying(FIVE_TIPS));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        // First call creates the record, second refresh fills the budget.
        for _ in 0..2 {
            svc.request_suggestion(
                SuggestionKind::Outfit,
                9,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                true,
            )
            .await
            .unwrap();
        }

        assert_eq!(store.calls_today(9, SuggestionKind::Outfit), Some(2));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn generator_failure_leaves_store_untouched() {
        let store = Arc::new(MockStore::default());
        let old = serde_json::json!(["previous tip"]);
        store.seed(1, SuggestionKind::Allergy, 1, old.clone());
        let generator = Arc::new(MockGenerator::failing(503));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let result = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                true,
            )
            .await;

        assert_matches!(result, Err(SuggestionError::Upstream { status: 503, .. }));
        assert_eq!(store.upsert_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.calls_today(1, SuggestionKind::Allergy), Some(1));
        // The stale result is still there, unreplaced.
        let day = suggestion_day(Utc::now());
        let record = store.find(1, SuggestionKind::Allergy, day).await.unwrap().unwrap();
        assert_eq!(record.result, old);
    }

    #[tokio::test]
    async fn empty_generation_is_cached_and_counts() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying("   \n  \n"));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Allergy,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                false,
            )
            .await
            .unwrap();

        assert_eq!(outcome.result, serde_json::json!([]));
        assert_eq!(store.calls_today(1, SuggestionKind::Allergy), Some(1));
        assert_eq!(store.upsert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn outfit_generation_parses_positionally() {
        let store = Arc::new(MockStore::default());
        let generator = Arc::new(MockGenerator::replying("Linen shirt\nLight cardigan"));
        let svc = service(Arc::clone(&store), Arc::clone(&generator));

        let outcome = svc
            .request_suggestion(
                SuggestionKind::Outfit,
                1,
                "key",
                &EnvironmentSnapshot::default(),
                &[],
                false,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.result,
            serde_json::json!({
                "top": "Linen shirt",
                "outer": "Light cardigan",
                "bottom": "",
                "note": "",
            })
        );
    }
}
