//! Route definitions for the `/suggestions` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::suggestion;
use crate::state::AppState;

/// Routes mounted at `/suggestions`.
///
/// ```text
/// POST /allergy -> allergy
/// POST /outfit  -> outfit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/allergy", post(suggestion::allergy))
        .route("/outfit", post(suggestion::outfit))
}
