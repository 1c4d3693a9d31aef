//! Route definitions for the `/feedback` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// POST /        -> create_feedback
/// GET  /recent  -> list_recent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feedback::create_feedback))
        .route("/recent", get(feedback::list_recent))
}
