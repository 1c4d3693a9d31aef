//! Feedback entity model and DTOs.

use breezy_core::prompt::FeedbackSnapshot;
use breezy_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// One self-reported comfort/allergy/outfit submission.
///
/// All report fields are optional: users skip questions, and older rows
/// predate newer form fields.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: DbId,
    pub user_id: DbId,
    pub feedback_date: Option<NaiveDate>,
    pub env_aqi: Option<f64>,
    pub env_temp_min: Option<f64>,
    pub env_temp_max: Option<f64>,
    pub allergy_feel: Option<String>,
    /// Self-reported allergy impact, out of 10.
    pub allergy_impact: Option<i32>,
    pub allergy_symptoms: Vec<String>,
    pub outfit_top: Option<String>,
    pub outfit_outer: Option<String>,
    pub outfit_bottom: Option<String>,
    pub temp_feel: Option<String>,
    pub desired_change: Option<String>,
    /// Outfit comfort rating, out of 5.
    pub outfit_rating: Option<i32>,
    pub created_at: Timestamp,
}

impl Feedback {
    /// Flatten this row into the prompt-building view consumed by
    /// `breezy-core`. The submission date falls back to `created_at`.
    pub fn snapshot(&self) -> FeedbackSnapshot {
        let date = self
            .feedback_date
            .map(|d| d.to_string())
            .or_else(|| Some(self.created_at.date_naive().to_string()));
        FeedbackSnapshot {
            date,
            env_aqi: self.env_aqi,
            env_temp_min: self.env_temp_min,
            env_temp_max: self.env_temp_max,
            allergy_feel: self.allergy_feel.clone(),
            allergy_impact: self.allergy_impact,
            allergy_symptoms: self.allergy_symptoms.clone(),
            outfit_top: self.outfit_top.clone(),
            outfit_outer: self.outfit_outer.clone(),
            outfit_bottom: self.outfit_bottom.clone(),
            temp_feel: self.temp_feel.clone(),
            desired_change: self.desired_change.clone(),
            outfit_rating: self.outfit_rating,
        }
    }
}

/// DTO for inserting a feedback row.
#[derive(Debug, Default)]
pub struct CreateFeedback {
    pub feedback_date: Option<NaiveDate>,
    pub env_aqi: Option<f64>,
    pub env_temp_min: Option<f64>,
    pub env_temp_max: Option<f64>,
    pub allergy_feel: Option<String>,
    pub allergy_impact: Option<i32>,
    pub allergy_symptoms: Vec<String>,
    pub outfit_top: Option<String>,
    pub outfit_outer: Option<String>,
    pub outfit_bottom: Option<String>,
    pub temp_feel: Option<String>,
    pub desired_change: Option<String>,
    pub outfit_rating: Option<i32>,
}
