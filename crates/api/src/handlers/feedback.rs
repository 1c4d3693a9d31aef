//! Handlers for the `/feedback` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use breezy_core::prompt::MAX_HISTORY_LINES;
use breezy_db::models::feedback::{CreateFeedback, Feedback};
use breezy_db::repositories::FeedbackRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /feedback`. Every report field is optional --
/// users answer only the questions that apply to their day.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub feedback_date: Option<NaiveDate>,
    pub env_aqi: Option<f64>,
    pub env_temp_min: Option<f64>,
    pub env_temp_max: Option<f64>,
    pub allergy_feel: Option<String>,
    #[validate(range(min = 0, max = 10, message = "allergyImpact must be between 0 and 10"))]
    pub allergy_impact: Option<i32>,
    #[serde(default)]
    pub allergy_symptoms: Vec<String>,
    pub outfit_top: Option<String>,
    pub outfit_outer: Option<String>,
    pub outfit_bottom: Option<String>,
    pub temp_feel: Option<String>,
    pub desired_change: Option<String>,
    #[validate(range(min = 1, max = 5, message = "outfitRating must be between 1 and 5"))]
    pub outfit_rating: Option<i32>,
}

/// POST /api/feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let create = CreateFeedback {
        feedback_date: input.feedback_date,
        env_aqi: input.env_aqi,
        env_temp_min: input.env_temp_min,
        env_temp_max: input.env_temp_max,
        allergy_feel: input.allergy_feel,
        allergy_impact: input.allergy_impact,
        allergy_symptoms: input.allergy_symptoms,
        outfit_top: input.outfit_top,
        outfit_outer: input.outfit_outer,
        outfit_bottom: input.outfit_bottom,
        temp_feel: input.temp_feel,
        desired_change: input.desired_change,
        outfit_rating: input.outfit_rating,
    };

    let feedback = FeedbackRepo::create(&state.pool, auth.user_id, &create).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// GET /api/feedback/recent
///
/// The authenticated user's most recent submissions, newest first --
/// the same window the suggestion prompts embed.
pub async fn list_recent(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Feedback>>> {
    let items =
        FeedbackRepo::list_recent(&state.pool, auth.user_id, MAX_HISTORY_LINES as i64).await?;
    Ok(Json(items))
}
