//! Repository for the `feedback` table.

use sqlx::PgPool;

use breezy_core::types::DbId;

use crate::models::feedback::{CreateFeedback, Feedback};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, feedback_date, env_aqi, env_temp_min, env_temp_max, \
                        allergy_feel, allergy_impact, allergy_symptoms, outfit_top, \
                        outfit_outer, outfit_bottom, temp_feel, desired_change, \
                        outfit_rating, created_at";

/// Provides data access for user feedback submissions.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a feedback row for a user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback
                (user_id, feedback_date, env_aqi, env_temp_min, env_temp_max,
                 allergy_feel, allergy_impact, allergy_symptoms, outfit_top,
                 outfit_outer, outfit_bottom, temp_feel, desired_change, outfit_rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(user_id)
            .bind(input.feedback_date)
            .bind(input.env_aqi)
            .bind(input.env_temp_min)
            .bind(input.env_temp_max)
            .bind(&input.allergy_feel)
            .bind(input.allergy_impact)
            .bind(&input.allergy_symptoms)
            .bind(&input.outfit_top)
            .bind(&input.outfit_outer)
            .bind(&input.outfit_bottom)
            .bind(&input.temp_feel)
            .bind(&input.desired_change)
            .bind(input.outfit_rating)
            .fetch_one(pool)
            .await
    }

    /// The user's most recent submissions, newest first.
    ///
    /// This is the generator's history window: callers pass the prompt
    /// builder's cap as `limit`.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
