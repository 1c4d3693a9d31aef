//! Handlers for the `/profile` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use breezy_core::error::CoreError;
use breezy_db::models::user::{UpdateProfile, User};
use breezy_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Profile payload returned by GET and PUT.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub gender: String,
    pub date_of_birth: String,
    pub preferred_styles: Vec<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            preferred_styles: user.preferred_styles,
        }
    }
}

/// Request body for `PUT /profile`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub preferred_styles: Option<Vec<String>>,
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(user.into()))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let update = UpdateProfile {
        username: input.username,
        gender: input.gender,
        date_of_birth: input.date_of_birth,
        preferred_styles: input.preferred_styles,
    };

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(user.into()))
}
