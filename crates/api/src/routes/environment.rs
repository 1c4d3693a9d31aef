//! Route definitions for the AQI/weather proxy endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::environment;
use crate::state::AppState;

/// Proxy routes merged directly into the `/api` tree.
///
/// ```text
/// GET /aqi          -> get_aqi
/// GET /aqi/nearest  -> get_nearest_aqi
/// GET /weather      -> get_weather
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/aqi", get(environment::get_aqi))
        .route("/aqi/nearest", get(environment::get_nearest_aqi))
        .route("/weather", get(environment::get_weather))
}
