//! Handlers for the `/suggestions` resource.
//!
//! These endpoints speak the dashboard's `{success: ...}` envelope rather
//! than the `{error, code}` shape the rest of the API uses: the cards
//! render `success: false` bodies directly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use breezy_core::prompt::{EnvironmentSnapshot, FeedbackSnapshot, MAX_HISTORY_LINES};
use breezy_core::suggestion::{OutfitAdvice, SuggestionKind};
use breezy_db::repositories::FeedbackRepo;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::suggestions::{SuggestionError, SuggestionOutcome};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body shared by both suggestion endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// The user's own Gemini API key; never stored or logged.
    #[serde(default, alias = "credential")]
    pub api_key: String,
    #[serde(default)]
    pub env: EnvironmentInput,
    #[serde(default)]
    pub force_refresh: bool,
}

/// Today's environment as sent by the dashboard. All fields optional;
/// `rainPop` and `weatherDesc` only matter for outfit suggestions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInput {
    pub aqi: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub rain_pop: Option<f64>,
    pub weather_desc: Option<String>,
}

impl From<EnvironmentInput> for EnvironmentSnapshot {
    fn from(input: EnvironmentInput) -> Self {
        Self {
            aqi: input.aqi,
            temp_min: input.temp_min,
            temp_max: input.temp_max,
            rain_pop: input.rain_pop,
            weather_desc: input.weather_desc,
        }
    }
}

/// Success body for `POST /suggestions/allergy`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergySuggestionResponse {
    pub success: bool,
    /// Up to five tip sentences, possibly fewer (or none) when the model
    /// under-delivered.
    pub tips: Vec<String>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_limit_reached: Option<bool>,
}

/// Success body for `POST /suggestions/outfit`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSuggestionResponse {
    pub success: bool,
    pub top: String,
    pub outer: String,
    pub bottom: String,
    pub note: String,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_limit_reached: Option<bool>,
}

/// Failure body for both endpoints.
#[derive(Debug, Serialize)]
pub struct SuggestionFailure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// [`SuggestionError`] rendered as the dashboard failure envelope.
pub struct SuggestionApiError(pub SuggestionError);

impl From<SuggestionError> for SuggestionApiError {
    fn from(err: SuggestionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SuggestionApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self.0 {
            SuggestionError::MissingCredential => (
                StatusCode::BAD_REQUEST,
                "Missing Gemini API key".to_string(),
                None,
            ),
            SuggestionError::Upstream { status, detail } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Gemini API error".to_string(),
                Some(detail),
            ),
            SuggestionError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Suggestion generator unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate suggestion".to_string(),
                    None,
                )
            }
            SuggestionError::Store(msg) => {
                tracing::error!(error = %msg, "Suggestion store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate suggestion".to_string(),
                    None,
                )
            }
        };

        let body = SuggestionFailure {
            success: false,
            error,
            detail,
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/suggestions/allergy
pub async fn allergy(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SuggestionRequest>,
) -> Result<Json<AllergySuggestionResponse>, SuggestionApiError> {
    let outcome = run_suggestion(&state, auth, SuggestionKind::Allergy, input).await?;

    let tips: Vec<String> = serde_json::from_value(outcome.result).unwrap_or_default();
    Ok(Json(AllergySuggestionResponse {
        success: true,
        tips,
        from_cache: outcome.from_cache,
        refresh_limit_reached: outcome.refresh_limit_reached.then_some(true),
    }))
}

/// POST /api/suggestions/outfit
pub async fn outfit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SuggestionRequest>,
) -> Result<Json<OutfitSuggestionResponse>, SuggestionApiError> {
    let outcome = run_suggestion(&state, auth, SuggestionKind::Outfit, input).await?;

    let advice: OutfitAdvice = serde_json::from_value(outcome.result).unwrap_or_default();
    Ok(Json(OutfitSuggestionResponse {
        success: true,
        top: advice.top,
        outer: advice.outer,
        bottom: advice.bottom,
        note: advice.note,
        from_cache: outcome.from_cache,
        refresh_limit_reached: outcome.refresh_limit_reached.then_some(true),
    }))
}

/// Shared flow: credential precondition, history window, orchestrator call.
async fn run_suggestion(
    state: &AppState,
    auth: AuthUser,
    kind: SuggestionKind,
    input: SuggestionRequest,
) -> Result<SuggestionOutcome, SuggestionApiError> {
    // The orchestrator re-checks this, but rejecting here keeps the
    // feedback-history query off the missing-credential path entirely.
    if input.api_key.trim().is_empty() {
        return Err(SuggestionError::MissingCredential.into());
    }

    let history = FeedbackRepo::list_recent(&state.pool, auth.user_id, MAX_HISTORY_LINES as i64)
        .await
        .map_err(|e| SuggestionError::Store(e.to_string()))?;
    let snapshots: Vec<FeedbackSnapshot> = history.iter().map(|fb| fb.snapshot()).collect();

    let outcome = state
        .suggestions
        .request_suggestion(
            kind,
            auth.user_id,
            &input.api_key,
            &input.env.into(),
            &snapshots,
            input.force_refresh,
        )
        .await?;
    Ok(outcome)
}
